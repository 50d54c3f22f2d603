#![no_main]

use digit_probe::config::ProbeConfig;
use digit_probe::input::{parse_digits, parse_integers, reduce_modulo};
use digit_probe::report::analyze;
use digit_probe::sequence::SymbolSequence;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Any text yields a valid digit sequence, possibly empty
    if let Ok(seq) = SymbolSequence::digits(parse_digits(&text)) {
        let _ = analyze(&seq, &ProbeConfig::quick());
    }

    let alphabet = data.first().map(|&b| b as u32 + 1).unwrap_or(10);
    if let Ok((symbols, _)) = reduce_modulo(&parse_integers(&text), alphabet) {
        assert!(symbols.iter().all(|&s| s < alphabet));
    }
});
