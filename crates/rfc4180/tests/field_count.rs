use rfc4180::{Error, Options, ReadOutcome, Reader};

const SHORT_THIRD: &str = "\"xxx\",\"yyy\",\"zzz\"\r\n\"xxx\",\"yyy\",\"zzz\"\r\n\"xxx\",\"zzz\"\r\n\"xxx\",\"yyy\",\"zzz\"\r\n";

#[test]
fn detects_wrong_number_of_fields() {
    let mut reader = Reader::new(SHORT_THIRD.as_bytes(), Options::default()).unwrap();
    assert_eq!(reader.read_record().unwrap().unwrap(), vec!["xxx", "yyy", "zzz"]);
    assert_eq!(reader.read_record().unwrap().unwrap(), vec!["xxx", "yyy", "zzz"]);
    let err = reader.read_record().unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(
        err.to_string(),
        "record 3 on line 3: wrong number of fields (expected 3, found 2)"
    );
    let Error::FieldCount(e) = err else {
        panic!("expected field count error");
    };
    assert_eq!(e.record, vec!["xxx", "zzz"]);
    assert_eq!(e.expected, 3);
    assert_eq!((e.start_line, e.line, e.record_number), (3, 3, 3));
}

#[test]
fn continues_after_wrong_number_of_fields() {
    let mut reader = Reader::new(SHORT_THIRD.as_bytes(), Options::default()).unwrap();
    reader.read_record().unwrap();
    reader.read_record().unwrap();
    assert!(matches!(reader.read_record(), Err(Error::FieldCount(_))));
    assert_eq!(reader.read_record().unwrap().unwrap(), vec!["xxx", "yyy", "zzz"]);
    assert_eq!(reader.read_record().unwrap(), None);
}

#[test]
fn first_record_defines_shape() {
    let mut reader = Reader::new(&b"a,b\n1,2,3\n4,5\n"[..], Options::default()).unwrap();
    assert_eq!(reader.expected_fields(), 0);
    reader.read_record().unwrap();
    assert_eq!(reader.expected_fields(), 2);
    assert!(reader.read_record().is_err());
    assert_eq!(reader.read_record().unwrap().unwrap(), vec!["4", "5"]);
}

#[test]
fn preset_field_count_applies_to_first_record() {
    let opts = Options::default().with_expected_fields(2);
    let mut reader = Reader::new(&b"a,b,c\nd,e\n"[..], opts).unwrap();
    match reader.read_record() {
        Err(Error::FieldCount(e)) => {
            assert_eq!(e.expected, 2);
            assert_eq!(e.record, vec!["a", "b", "c"]);
        }
        other => panic!("expected field count error, got {other:?}"),
    }
    assert_eq!(reader.read_record().unwrap().unwrap(), vec!["d", "e"]);
}

#[test]
fn multi_line_record_reports_start_and_end_lines() {
    let mut reader = Reader::new(&b"a,b\n\"x\ny\"\n"[..], Options::default()).unwrap();
    reader.read_record().unwrap();
    let Err(Error::FieldCount(e)) = reader.read_record() else {
        panic!("expected field count error");
    };
    assert_eq!((e.start_line, e.line), (2, 3));
    assert_eq!(e.record, vec!["x\ny"]);
}

#[test]
fn outcomes_are_tagged() {
    let mut reader = Reader::new(&b"a,b\n1\n\"q\"x\n"[..], Options::default()).unwrap();
    assert!(matches!(reader.next_outcome(), ReadOutcome::Record(r) if r == ["a", "b"]));
    assert!(matches!(reader.next_outcome(), ReadOutcome::FieldCount(e) if e.record == ["1"]));
    assert!(matches!(reader.next_outcome(), ReadOutcome::Fatal(Error::Parse(_))));

    let mut reader = Reader::new(&b"a\n"[..], Options::default()).unwrap();
    assert!(matches!(reader.next_outcome(), ReadOutcome::Record(_)));
    assert!(matches!(reader.next_outcome(), ReadOutcome::End));
}

#[test]
fn records_iterator_continues_past_field_count_and_stops_on_fatal() {
    let input = b"a,b\n1,2\n3\n\"x\"y\n5,6\n";
    let mut reader = Reader::new(&input[..], Options::default()).unwrap();
    let items: Vec<_> = reader.records().collect();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].as_ref().unwrap(), &vec!["a", "b"]);
    assert_eq!(items[1].as_ref().unwrap(), &vec!["1", "2"]);
    assert!(matches!(items[2], Err(Error::FieldCount(_))));
    assert!(matches!(items[3], Err(Error::Parse(_))));
}
