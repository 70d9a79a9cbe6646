#![no_main]

use bacwire_core::Frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(frame) = Frame::decode(data) {
        if let Ok(bytes) = frame.encode_to_vec() {
            assert_eq!(bytes.len(), data.len());
        }
    }
});
