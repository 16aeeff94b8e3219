use crate::error::ExtractError;
use crate::extract::{CsvTokenizer, Segment};

fn seg(text: &str, quoted: bool) -> Segment {
    Segment {
        text: text.to_string(),
        quoted,
    }
}

#[test]
fn simple_columns() {
    let csv = CsvTokenizer::default();
    assert_eq!(csv.columns("a,a").unwrap(), ["a", "a"]);
    assert_eq!(csv.columns("a,a,,").unwrap(), ["a", "a", "", ""]);
}

#[test]
fn quoted_json_column_is_unescaped() {
    let csv = CsvTokenizer::default();
    assert_eq!(
        csv.columns(r#""{\"data1\":1232,\"data2\":\"\"}""#).unwrap(),
        [r#"{"data1":1232,"data2":""}"#]
    );
    assert_eq!(
        csv.columns(r#""{\"data1\":1232,\"data2\":\"\"}","asdf""#).unwrap(),
        [r#"{"data1":1232,"data2":""}"#, "asdf"]
    );
}

#[test]
fn mixed_row_with_quoted_fields() {
    let row = r#"11603FEA-FB08-4E17-A037-74F1975B02E5,11603FEA-FB08-4E17-A037-74F1975B02E5,,"{\"data1\":1232,\"data2\":\"\"}","{\"data 3\":[1, 2, 3]}","another string""#;
    assert_eq!(
        CsvTokenizer::new().columns(row).unwrap(),
        [
            "11603FEA-FB08-4E17-A037-74F1975B02E5",
            "11603FEA-FB08-4E17-A037-74F1975B02E5",
            "",
            r#"{"data1":1232,"data2":""}"#,
            r#"{"data 3":[1, 2, 3]}"#,
            "another string",
        ]
    );
}

#[test]
fn separator_inside_quotes_is_not_split() {
    assert_eq!(
        CsvTokenizer::new().columns(r#"1,"hello, world",3"#).unwrap(),
        ["1", "hello, world", "3"]
    );
}

#[test]
fn tokenize_marks_quoted_segments() {
    let csv = CsvTokenizer::new();
    assert_eq!(
        csv.tokenize(r#"1232, "test , ""#).unwrap(),
        [seg("1232, ", false), seg("test , ", true)]
    );
    assert_eq!(
        csv.tokenize(r#""test ,",1232"#).unwrap(),
        [seg("test ,", true), seg(",1232", false)]
    );
}

#[test]
fn tokenize_keeps_empty_quoted_segments() {
    assert_eq!(
        CsvTokenizer::new().tokenize(r#"a,"",b"#).unwrap(),
        [seg("a,", false), seg("", true), seg(",b", false)]
    );
}

#[test]
fn unmatched_quote_is_an_error() {
    let err = CsvTokenizer::new().columns(r#"a,"b,c"#).unwrap_err();
    assert!(matches!(err, ExtractError::UnmatchedQuote { ref row } if row == r#"a,"b,c"#));
}

#[test]
fn custom_separator_and_quote() {
    let csv = CsvTokenizer {
        separator: ';',
        quote: '\'',
        escape: '\\',
    };
    assert_eq!(csv.columns("x;'y;z';w").unwrap(), ["x", "y;z", "w"]);
}
