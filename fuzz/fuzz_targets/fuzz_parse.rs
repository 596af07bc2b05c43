#![no_main]

use libfuzzer_sys::fuzz_target;
use wgslx_ast::FrontEnd;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Lexing, parsing and resolution should never panic on any input.
        let _ = wgslx_reader::Reader.parse(source);
    }
});
