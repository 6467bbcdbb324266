#![no_main]
use libfuzzer_sys::{arbitrary, fuzz_target};
use arbitrary::Arbitrary;
use rfc4180::{Options, read_all};

const MAX_ROWS: usize = 8;

#[derive(Arbitrary, Debug)]
struct Table {
    rows: Vec<Vec<String>>,
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fuzz_target!(|table: Table| {
    let width = match table.rows.first() {
        Some(r) if !r.is_empty() => r.len(),
        _ => return,
    };
    let rows: Vec<Vec<String>> = table
        .rows
        .into_iter()
        .take(MAX_ROWS)
        .filter(|r| r.len() == width)
        // CRLF inside a field reads back as LF
        .map(|r| r.into_iter().map(|f| f.replace('\r', "")).collect())
        .collect();

    let mut csv = String::new();
    for row in &rows {
        let line: Vec<String> = row.iter().map(|f| quote(f)).collect();
        csv.push_str(&line.join(","));
        csv.push_str("\r\n");
    }

    match read_all(&csv, &Options::default()) {
        Ok(decoded) => {
            if decoded != rows {
                panic!("Field roundtrip mismatch!\nCSV: {csv:?}\nExpected: {rows:?}\nDecoded: {decoded:?}");
            }
        }
        Err(e) => panic!("Failed to read quoted table!\nCSV: {csv:?}\nError: {e}"),
    }
});
