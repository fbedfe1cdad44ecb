#![no_main]

use libfuzzer_sys::fuzz_target;
use pfxmeta_lib::{is_valid_container, parse_certificate};

fuzz_target!(|data: &[u8]| {
    // Prevalidation must never panic or error, only answer.
    let _ = is_valid_container(data);

    // Full parsing must fail cleanly on arbitrary input. On the off chance
    // the input parses, exercise the renderers and the CNPJ invariant.
    if let Ok(meta) = parse_certificate(data, Some("password")) {
        let _ = pfxmeta_lib::display_text(&meta);
        let _ = pfxmeta_lib::to_json(&meta);
        if let Some(cnpj) = &meta.cnpj {
            assert_eq!(cnpj.len(), 14);
            assert!(cnpj.bytes().all(|b| b.is_ascii_digit()));
        }
    }
});
