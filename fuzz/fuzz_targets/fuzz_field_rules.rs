#![no_main]

use beacon_widgets::{FieldError, FieldKind, Messages, ValidationRules};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 4096 {
        return;
    }

    let rules = ValidationRules::default();
    let messages = Messages::english();
    for field in FieldKind::ALL {
        let result = rules.check(field, text);

        // Surrounding whitespace never changes the verdict.
        let padded = format!("  {text}\t");
        assert_eq!(result, rules.check(field, &padded));

        if text.trim().is_empty() {
            assert_eq!(result, Err(FieldError::Required));
        }
        if let Err(err) = result {
            assert!(!err.message(field, &messages).is_empty());
        }
    }
});
