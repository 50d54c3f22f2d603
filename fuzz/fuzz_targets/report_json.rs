#![no_main]

use digit_probe::report::AnalysisReport;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed reports must surface as errors, never panics
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = AnalysisReport::from_json(text);
    }
});
