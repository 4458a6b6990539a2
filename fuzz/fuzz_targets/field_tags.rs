#![no_main]

use ferrous_inject::tag::lookup;
use ferrous_inject::FieldTag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(tag) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing arbitrary annotations must never panic.
    let parsed = FieldTag::parse(tag);
    if let Some(parsed) = parsed {
        assert_eq!(lookup(tag, "inject-name"), Some(parsed.name));
    }
});
