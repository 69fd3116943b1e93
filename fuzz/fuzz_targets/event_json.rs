#![no_main]

use libfuzzer_sys::fuzz_target;

use loghint_core::event::DiscoveryEvent;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(event) = DiscoveryEvent::from_json(content) {
            let _ = event.host();
            let _ = event.hints();
        }
    }
});
