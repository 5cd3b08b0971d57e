use proptest::prelude::*;

use elect_types::{explorer_tx_url, ChainId, Leader, TxHash, TxStatus};

proptest! {
    /// Every leader id outside {1, 2} maps to NOBODY.
    #[test]
    fn unknown_leader_ids_are_nobody(id in any::<u64>().prop_filter("known ids", |id| *id != 1 && *id != 2)) {
        prop_assert_eq!(Leader::from_id(id), Leader::Nobody);
    }

    /// Explorer links end with the full hash.
    #[test]
    fn kovan_links_carry_the_hash(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        let url = explorer_tx_url(ChainId::new(42), &hash).unwrap();
        let suffix = format!("/tx/{}", hash);
        prop_assert!(url.ends_with(&suffix));
    }

    /// Only receipt status 1 counts as success.
    #[test]
    fn receipt_status_success_iff_one(code in any::<u64>()) {
        prop_assert_eq!(TxStatus::from_code(code).is_success(), code == 1);
    }
}

