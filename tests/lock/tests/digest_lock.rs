//! Digest lock tests: golden values for the canonical layout and its hash.
//!
//! A change to any of these values changes every stored reference file.
//! Update the goldens only together with a deliberate format change.

use sha2::{Digest as _, Sha512};
use xsdigest_kernel::array::NdArray;
use xsdigest_kernel::digest::hash::{sha512_hex, SHA512_HEX_LEN};
use xsdigest_kernel::digest::{digest_records, Digest, DigestBuilder};
use xsdigest_kernel::key::{key_path, Category, DomainType, Moment};
use xsdigest_kernel::record::ResultRecord;

const TWO_DOMAIN_LAYOUT: &str = "domain=1 type=transport\n[1.0]\n[0.1]\n\
                                 domain=1 type=chi\n[1.0]\n[0.1]\n\
                                 domain=2 type=transport\n[1.0]\n[0.1]\n\
                                 domain=2 type=chi\n[1.0]\n[0.1]\n";

const TWO_DOMAIN_SHA512: &str = "da96ee30ff9db8189000c8fbb73fbbab82c6aafde5f3c3cc2075e58f0804106a\
                                 e82bbbb6bcf1848c485993345064a789626c412d001cf836a9e5ea7bc8a11fcb";

fn unit_record(id: u32, category: Category) -> ResultRecord {
    ResultRecord::new(
        DomainType::Material,
        id,
        category,
        NdArray::vector(vec![1.0]),
        NdArray::vector(vec![0.1]),
    )
    .unwrap()
}

fn two_domain_records() -> Vec<ResultRecord> {
    [1, 2]
        .into_iter()
        .flat_map(|id| [Category::Transport, Category::Chi].map(|c| unit_record(id, c)))
        .collect()
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn two_domain_layout_is_locked() {
    let digest = digest_records(&two_domain_records(), false);
    assert_eq!(digest, Digest::Raw(TWO_DOMAIN_LAYOUT.to_string()));
}

#[test]
fn two_domain_hash_is_locked() {
    let digest = digest_records(&two_domain_records(), true);
    assert_eq!(digest.as_str(), TWO_DOMAIN_SHA512);
    assert_eq!(digest.as_str().len(), SHA512_HEX_LEN);
    assert_eq!(sha512_hex(TWO_DOMAIN_LAYOUT.as_bytes()), TWO_DOMAIN_SHA512);
}

#[test]
fn kernel_hash_agrees_with_sha2() {
    let direct = hex::encode(Sha512::digest(TWO_DOMAIN_LAYOUT.as_bytes()));
    assert_eq!(direct, TWO_DOMAIN_SHA512);
    assert_eq!(sha512_hex(b""), hex::encode(Sha512::digest(b"")));
}

#[test]
fn matrix_record_layout_is_locked() {
    let record = ResultRecord::new(
        DomainType::Cell,
        21,
        Category::NuScatterMatrix,
        NdArray::new(vec![2, 2], vec![0.5, 0.25, 0.0, 1.0]).unwrap(),
        NdArray::new(vec![2, 2], vec![0.01, 0.02, 0.0, 6.25e-7]).unwrap(),
    )
    .unwrap();
    let mut builder = DigestBuilder::new();
    builder.push(&record);
    assert_eq!(
        builder.buffer(),
        "domain=21 type=nu-scatter matrix\n\
         [[0.5, 0.25], [0.0, 1.0]]\n\
         [[0.01, 0.02], [0.0, 6.25e-7]]\n"
    );
}

// ---------------------------------------------------------------------------
// Key paths
// ---------------------------------------------------------------------------

#[test]
fn key_paths_are_locked() {
    assert_eq!(
        key_path(DomainType::Material, 1, Category::Transport, Moment::Average),
        "material/1/transport/average"
    );
    assert_eq!(
        key_path(DomainType::Universe, 0, Category::NuFission, Moment::StdDev),
        "universe/0/nu-fission/std. dev."
    );
    assert_eq!(
        key_path(DomainType::Cell, 7, Category::ScatterMatrix, Moment::Average),
        "cell/7/scatter matrix/average"
    );
}

#[test]
fn every_category_name_round_trips() {
    for category in Category::ALL {
        let parsed: Category = category.as_str().parse().unwrap();
        assert_eq!(parsed, *category);
    }
}
