use anyhow::Result;
use ironseq::*;

#[test]
fn every_failure_has_a_kind() {
    let cases: Vec<(SeqError, ErrorKind)> = vec![
        (SeqError::ArgumentNull { param: "f" }, ErrorKind::ArgumentNull),
        (SeqError::Argument { message: "m".into() }, ErrorKind::Argument),
        (
            SeqError::Format {
                message: "m".into(),
                position: 3,
            },
            ErrorKind::Format,
        ),
        (
            SeqError::ArgumentOutOfRange {
                param: "count",
                value: "-1".into(),
            },
            ErrorKind::ArgumentOutOfRange,
        ),
        (SeqError::InvalidOperation { message: "m".into() }, ErrorKind::InvalidOperation),
        (SeqError::MultipleElements { index: 1 }, ErrorKind::MultipleElements),
        (SeqError::KeyNotFound { key: "k".into() }, ErrorKind::KeyNotFound),
        (SeqError::Unsupported { operation: "reset" }, ErrorKind::Unsupported),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind(), kind, "{err}");
    }
}

#[test]
fn messages_name_the_offending_value() {
    let err = SeqError::ArgumentOutOfRange {
        param: "count",
        value: "-4".into(),
    };
    assert_eq!(err.to_string(), "argument out of range: count = -4");
    assert_eq!(ErrorKind::MultipleElements.to_string(), "multiple-elements");
}

#[test]
fn negative_counts_report_the_parameter() {
    let err = Sequence::from_vec(vec![1]).take(-7).err();
    assert!(matches!(
        err,
        Some(SeqError::ArgumentOutOfRange { param: "count", ref value }) if value == "-7"
    ));
}

#[test]
fn predicates_match_kinds() -> Result<()> {
    let mut single_pass = Sequence::from_iter_once(vec![1, 2]);
    single_pass.count()?;
    let err = single_pass.count().err();
    assert!(err.as_ref().is_some_and(SeqError::is_invalid_operation));

    let err = Sequence::from_vec(vec![5, 5]).single().err();
    assert!(err.as_ref().is_some_and(SeqError::is_multiple_elements));

    let err = Sequence::from_vec(vec![5]).skip(-1).err();
    assert!(err.as_ref().is_some_and(SeqError::is_out_of_range));
    Ok(())
}

#[test]
fn json_errors_convert_from_serde() {
    let err: SeqError = serde_json::from_str::<serde_json::Value>("{").map_err(SeqError::from).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Json);
}

#[test]
fn errors_flow_into_anyhow() {
    fn run() -> Result<u8> {
        Ok(Sequence::<u8>::empty().element_at(0)?)
    }
    let err = run().unwrap_err();
    assert!(err.downcast_ref::<SeqError>().is_some_and(SeqError::is_out_of_range));
}
