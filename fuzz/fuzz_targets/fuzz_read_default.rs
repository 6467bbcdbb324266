#![no_main]
use libfuzzer_sys::fuzz_target;
use rfc4180::{Options, RecordStream, from_slice};

fuzz_target!(|data: &[u8]| {
    if let Ok(reader) = from_slice(data, &Options::default()) {
        for _ in RecordStream::new(reader) {}
    }
});
