#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::{json, Value};

use loghint_hints::PlaceholderResolver;

fuzz_target!(|data: &[u8]| {
    if let Ok(template) = std::str::from_utf8(data) {
        let event = json!({
            "host": "10.0.0.1",
            "port": 8080,
            "container": {"id": "abc", "name": "web"},
            "labels": ["a", "b"]
        });
        let resolver = PlaceholderResolver::with_data(&event);
        let _ = resolver.resolve(&Value::String(template.to_owned()));
    }
});
