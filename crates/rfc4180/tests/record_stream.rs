use rfc4180::{BomStrip, Error, Options, RecordStream, from_slice};

fn stream<'a>(input: &'a str, opts: &Options) -> RecordStream<BomStrip<&'a [u8]>> {
    RecordStream::new(from_slice(input.as_bytes(), opts).unwrap())
}

#[test]
fn skips_and_collects_field_count_errors() {
    let input = "a,b,c\n1,2,3\n4,5\n6,7,8\n9\n";
    let mut s = stream(input, &Options::default());
    let records: Vec<_> = s.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(records, vec![vec!["a", "b", "c"], vec!["1", "2", "3"], vec!["6", "7", "8"]]);
    assert!(s.has_errors());
    let errors = s.into_errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].record, vec!["4", "5"]);
    assert_eq!(errors[0].record_number, 3);
    assert_eq!(errors[1].record, vec!["9"]);
    assert_eq!(errors[1].line, 5);
}

#[test]
fn broken_file_yields_all_good_records() {
    let mut input = String::from("id,name,qty\n");
    for i in 0..20 {
        if i % 2 == 0 {
            input.push_str(&format!("{i},item {i},{}\n", i * 10));
        } else {
            input.push_str(&format!("{i},item {i}\n"));
        }
    }
    let mut s = stream(&input, &Options::default());
    let good = s.by_ref().filter_map(Result::ok).count();
    assert_eq!(good, 11);
    assert_eq!(s.errors().len(), 10);
}

#[test]
fn strict_mode_propagates_field_count_errors() {
    let opts = Options::default().with_strict(true);
    let mut s = stream("a,b\n1\n2,3\n", &opts);
    assert!(s.next().unwrap().is_ok());
    assert!(matches!(s.next(), Some(Err(Error::FieldCount(_)))));
    assert_eq!(s.next().unwrap().unwrap(), vec!["2", "3"]);
    assert!(s.next().is_none());
    assert!(!s.has_errors());
}

#[test]
fn fatal_error_ends_stream() {
    let mut s = stream("a,b\nc,d\"\ne,f\n", &Options::default());
    assert!(s.next().unwrap().is_ok());
    assert!(matches!(s.next(), Some(Err(Error::Parse(_)))));
    assert!(s.next().is_none());
    assert!(s.next().is_none());
}

#[test]
fn first_record_becomes_header() {
    let input = "sku,name\nA-1,widget\nB-2\nC-3,gadget\n";
    let mut rows = stream(input, &Options::default()).with_headers();
    let first = rows.next().unwrap().unwrap();
    assert_eq!(
        first,
        vec![
            ("sku".to_string(), "A-1".to_string()),
            ("name".to_string(), "widget".to_string())
        ]
    );
    assert_eq!(rows.headers(), Some(&["sku".to_string(), "name".to_string()][..]));
    let second = rows.next().unwrap().unwrap();
    assert_eq!(second[0].1, "C-3");
    assert!(rows.next().is_none());
    assert_eq!(rows.errors().len(), 1);
}

#[test]
fn given_headers_key_every_record() {
    let headers = vec!["x".to_string(), "y".to_string()];
    let mut rows = stream("1,2\n3,4\n", &Options::default()).with_given_headers(headers);
    assert_eq!(rows.next().unwrap().unwrap()[1], ("y".to_string(), "2".to_string()));
    assert_eq!(rows.next().unwrap().unwrap()[0], ("x".to_string(), "3".to_string()));
    assert!(rows.next().is_none());
    assert!(!rows.has_errors());
}

#[test]
fn given_headers_fix_the_field_count() {
    let headers = vec!["x".to_string(), "y".to_string()];
    let mut rows = stream("1,2,3\n4,5\n6,7\n", &Options::default()).with_given_headers(headers);
    let yielded: Vec<_> = rows.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(yielded.len(), 2);
    assert_eq!(yielded[0][0], ("x".to_string(), "4".to_string()));
    assert_eq!(yielded[1][1], ("y".to_string(), "7".to_string()));
    assert_eq!(rows.reader().expected_fields(), 2);
    let errors = rows.into_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].record, vec!["1", "2", "3"]);
    assert_eq!(errors[0].expected, 2);
}

#[test]
fn preset_field_count_wins_over_given_headers() {
    let headers = vec!["x".to_string(), "y".to_string()];
    let opts = Options::default().with_expected_fields(3);
    let mut rows = stream("1,\"a\nb\",3\n4,5\n", &opts).with_given_headers(headers);
    assert!(rows.next().is_none());
    let errors = rows.into_errors();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].record, vec!["1", "a\nb", "3"]);
    assert_eq!(errors[0].expected, 2);
    assert_eq!(errors[0].start_line, 1);
    assert_eq!(errors[0].line, 2);
    assert_eq!(errors[1].expected, 3);
    assert_eq!(errors[1].start_line, 3);
}

#[test]
fn header_only_input_yields_nothing() {
    let mut rows = stream("a,b\n", &Options::default()).with_headers();
    assert!(rows.next().is_none());
    assert_eq!(rows.headers().map(<[String]>::len), Some(2));
}
