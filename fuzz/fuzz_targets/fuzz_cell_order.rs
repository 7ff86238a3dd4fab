#![no_main]

use std::cmp::Ordering;

use beacon_i18n::Collator;
use beacon_widgets::table::{CellKey, SortDirection, compare_keys, sort_order};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|cells: Vec<String>| {
    if cells.len() > 64 || cells.iter().any(|c| c.len() > 256) {
        return;
    }
    let collator = Collator::new();
    let keys: Vec<CellKey> = cells.iter().map(|c| CellKey::parse(c)).collect();

    // Comparator must be antisymmetric or sorting is meaningless.
    for a in &keys {
        for b in &keys {
            assert_eq!(
                compare_keys(a, b, &collator),
                compare_keys(b, a, &collator).reverse(),
                "antisymmetry broken for {a:?} / {b:?}"
            );
        }
    }

    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let order = sort_order(&keys, direction, &collator);

        // Must be a permutation.
        let mut seen = order.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..keys.len()).collect::<Vec<_>>());

        // Adjacent pairs must respect the direction.
        for pair in order.windows(2) {
            let ord = direction.apply(compare_keys(&keys[pair[0]], &keys[pair[1]], &collator));
            assert_ne!(ord, Ordering::Greater, "out of order at {pair:?}");
        }
    }
});
