#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use packsmith::domain::entities::ModuleKind;
use packsmith::TomlModuleLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Manifest parsing must reject bad input with an error, never a panic
        let loader = TomlModuleLoader::default();
        let _ = loader.parse_str(content, Path::new("module.toml"), ModuleKind::Pack);
    }
});
