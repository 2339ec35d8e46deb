use super::*;

use proptest::prelude::*;

/// Direct evaluation of the checksum definition, independent of the
/// incremental update path.
pub(super) fn reference_digest(data: &[u8]) -> RollingDigest {
    let n = data.len();
    let mut a: u32 = 0;
    let mut b: u32 = 0;
    for (i, &byte) in data.iter().enumerate() {
        let x = i32::from(byte as i8) as u32;
        a = a.wrapping_add(x);
        b = b.wrapping_add(((n - i) as u32).wrapping_mul(x));
    }
    RollingDigest::new(a, b, n)
}

pub(super) fn random_data_and_window() -> impl Strategy<Value = (Vec<u8>, usize)> {
    prop::collection::vec(any::<u8>(), 1..=256).prop_flat_map(|data| {
        let len = data.len();
        (Just(data), 1..=len)
    })
}

pub(super) fn chunked_sequences() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..=64), 1..=8)
}
