#![no_main]

use beacon_i18n::{Bundle, Catalog};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    if source.len() > 8192 {
        return;
    }

    // Parsing must never panic.
    let Ok(bundle) = Bundle::parse("xx", source) else {
        return;
    };

    // Every parsed key must be reachable through a catalog.
    let mut catalog = Catalog::new("xx");
    catalog.add_bundle("xx", bundle.clone());
    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, _)) = line.split_once('=') {
            let key = key.trim();
            assert_eq!(catalog.get("xx", key), bundle.get(key));
            assert!(bundle.get(key).is_some(), "parsed key {key:?} missing");
            let _ = catalog.format("xx", key, &[("name", "value")]);
        }
    }
});
