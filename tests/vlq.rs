//! Property-based tests for variable-length quantities.

use flpsplit::vlq;
use proptest::prelude::*;

proptest! {
    #[test]
    fn roundtrip(value in any::<u64>()) {
        let bytes = vlq::encode(value);
        prop_assert_eq!(vlq::decode(&bytes, 0).unwrap(), (value, bytes.len()));
    }

    #[test]
    fn minimal(value in any::<u64>()) {
        let bytes = vlq::encode(value);
        let last = *bytes.last().unwrap();

        prop_assert_eq!(last & 0x80, 0);
        prop_assert!(bytes[..bytes.len() - 1].iter().all(|b| b & 0x80 != 0));
        // only a zero value may end in an all-zero group
        prop_assert!(last != 0 || bytes.len() == 1);

        let bits = u64::BITS - value.leading_zeros();
        prop_assert_eq!(bytes.len(), (bits as usize).div_ceil(7).max(1));
        prop_assert_eq!(bytes.len(), vlq::encoded_len(value));
    }

    #[test]
    fn decode_ignores_trailing_bytes(value in any::<u64>(), tail in prop::collection::vec(any::<u8>(), 0..8)) {
        let mut bytes = vec![0xAA];
        bytes.extend(vlq::encode(value));
        let len = bytes.len() - 1;
        bytes.extend(tail);
        prop_assert_eq!(vlq::decode(&bytes, 1).unwrap(), (value, len));
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..16), offset in 0usize..20) {
        let _ = vlq::decode(&bytes, offset);
    }
}
