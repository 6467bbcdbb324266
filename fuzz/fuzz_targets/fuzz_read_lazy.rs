#![no_main]
use libfuzzer_sys::fuzz_target;
use rfc4180::{LineBuffer, Options, ReadOutcome, Reader};

fuzz_target!(|input: (u8, &[u8])| {
    let (chunk, data) = input;
    let opts = Options::default()
        .with_lazy_quotes(true)
        .with_trim_leading_space(false)
        .with_comment(Some('#'));
    let lines = LineBuffer::with_chunk_size(data, chunk as usize + 1);
    let Ok(mut reader) = Reader::with_line_buffer(lines, opts) else {
        return;
    };
    loop {
        match reader.next_outcome() {
            ReadOutcome::End => break,
            // every record consumes at least one physical line
            _ => assert!(reader.line() >= reader.record_number()),
        }
    }
});
