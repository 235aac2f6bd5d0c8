use num_bigint::BigInt;
use proptest::prelude::*;

use ont_script::num::{int_from_bytes, int_to_bytes};
use ont_script::{Address, Script};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn int_bytes_roundtrip(val in any::<i128>()) {
        let n = BigInt::from(val);
        prop_assert_eq!(int_from_bytes(&int_to_bytes(&n)), n);
    }

    #[test]
    fn pushes_parse_back(parts in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..300), 0..8)) {
        let mut script = Script::new();
        for part in &parts {
            script.append_push_data(part).unwrap();
        }
        let chunks = script.chunks().unwrap();
        prop_assert_eq!(chunks.len(), parts.len());
        for (chunk, part) in chunks.iter().zip(&parts) {
            prop_assert_eq!(chunk.data.as_ref(), Some(part));
        }
    }

    #[test]
    fn chunk_parsing_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = Script::from_bytes(&data).chunks();
    }

    #[test]
    fn address_base58_roundtrip(bytes in prop::array::uniform20(any::<u8>())) {
        let addr = Address::new(bytes);
        let parsed = Address::from_base58(&addr.to_base58()).unwrap();
        prop_assert_eq!(parsed, addr);
        prop_assert!(addr.to_base58().starts_with('A'));
    }
}
