#![no_main]

use libfuzzer_sys::fuzz_target;
use nontrivial_param::{analyze, AnalysisConfig, DwarfProvider};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either be rejected or analyzed without panicking
    if let Ok(provider) = DwarfProvider::from_bytes(data) {
        let _ = analyze(&provider, &AnalysisConfig::default(), std::io::sink());
    }
});
