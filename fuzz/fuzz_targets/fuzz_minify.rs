#![no_main]

use libfuzzer_sys::fuzz_target;
use wgslx_ast::FrontEnd;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    // Anything the front end accepts must minify into source it accepts too.
    if let Ok(output) = wgslx::minify(source, &wgslx::Config::default()) {
        if let Err(err) = wgslx_reader::Reader.parse(&output.wgsl) {
            panic!("minified output does not resolve: {err}\n{}", output.wgsl);
        }
    }
});
