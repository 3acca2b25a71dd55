#![cfg(feature = "lambda")]

use anyhow::Result;
use ironseq::testing::*;
use ironseq::*;
use serde_json::{json, Value};

fn people_json() -> Result<Vec<Value>> {
    Ok(sample_people().iter().map(serde_json::to_value).collect::<serde_json::Result<_>>()?)
}

#[test]
fn arithmetic_and_precedence() -> Result<()> {
    let f = as_callable(Some("x => 1 + x * 2 - 6 / 3"))?;
    assert_eq!(f.call(&[json!(4)])?, json!(7));

    let g = as_callable(Some("(a, b) => (a + b) % 4"))?;
    assert_eq!(g.arity(), 2);
    assert_eq!(g.params(), ["a", "b"]);
    assert_eq!(g.call(&[json!(3), json!(6)])?, json!(1));

    let half = as_callable(Some("x => x / 2"))?;
    assert_eq!(half.call(&[json!(5)])?, json!(2.5));
    Ok(())
}

#[test]
fn zero_parameter_lambdas_are_constants() -> Result<()> {
    let answer = as_callable(Some("() => 40 + 2"))?;
    assert_eq!(answer.arity(), 0);
    assert_eq!(answer.call(&[])?, json!(42));
    Ok(())
}

#[test]
fn members_indexes_and_strings() -> Result<()> {
    let f = as_callable(Some("r => r.tags[1] + '!' + r.tags.length"))?;
    assert_eq!(f.call(&[json!({"tags": ["a", "b"]})])?, json!("b!2"));

    let missing = as_callable(Some("r => r.nope.deeper"))?;
    assert_eq!(missing.call(&[json!({})])?, Value::Null);

    let quoted = as_callable(Some(r#"s => s == "it's""#))?;
    assert!(quoted.test(&[json!("it's")])?);
    Ok(())
}

#[test]
fn logic_short_circuits_and_yields_operands() -> Result<()> {
    let fallback = as_callable(Some("x => x.name || 'anon'"))?;
    assert_eq!(fallback.call(&[json!({"name": "zoe"})])?, json!("zoe"));
    assert_eq!(fallback.call(&[json!({"name": ""})])?, json!("anon"));

    // the right side would fail if it ran
    let guarded = as_callable(Some("x => x != null && x.n * 2 > 3"))?;
    assert!(!guarded.test(&[Value::Null])?);
    assert!(guarded.test(&[json!({"n": 2})])?);
    Ok(())
}

#[test]
fn comparisons_follow_json_ordering() -> Result<()> {
    let lt = as_callable(Some("(a, b) => a < b"))?;
    assert!(lt.test(&[json!(1), json!(1.5)])?);
    assert!(lt.test(&[json!("apple"), json!("banana")])?);
    assert!(lt.test(&[Value::Null, json!(0)])?);

    let (a, b) = (json!({"a": 1}), json!({"b": 1}));
    assert!(lt.test(&[a.clone(), b.clone()])?);
    assert!(!lt.test(&[b, a])?);

    let eq = as_callable(Some("(a, b) => a == b"))?;
    assert!(eq.test(&[json!(2), json!(2.0)])?);
    assert!(!eq.test(&[json!("2"), json!(2)])?);
    Ok(())
}

#[test]
fn ternary_and_unary_operators() -> Result<()> {
    let sign = as_callable(Some("n => n < 0 ? -n : !n ? 'zero' : n"))?;
    assert_eq!(sign.call(&[json!(-3)])?, json!(3));
    assert_eq!(sign.call(&[json!(0)])?, json!("zero"));
    assert_eq!(sign.call(&[json!(5)])?, json!(5));
    Ok(())
}

#[test]
fn lambdas_drive_sequence_operators() -> Result<()> {
    let parisians = as_callable(Some("p => p.city == 'Paris'"))?;
    let label = as_callable(Some("(p, i) => i + ':' + p.name"))?;
    let names = Sequence::from_vec(people_json()?)
        .try_filter(parisians.predicate())
        .try_map(label.selector())
        .to_vec()?;
    assert_eq!(names, vec![json!("0:Brian"), json!("1:Erin")]);
    Ok(())
}

#[test]
fn lambda_selector_feeds_ordering() -> Result<()> {
    let age = as_callable(Some("p => p.age"))?;
    let oldest = Sequence::from_vec(people_json()?)
        .try_map(age.selector())
        .order_with(Comparer::json())
        .to_vec()?;
    assert_eq!(oldest, vec![json!(23), json!(29), json!(29), json!(36), json!(41)]);
    Ok(())
}

#[test]
fn missing_expression_is_argument_null() {
    assert_error_kind(&as_callable(None), ErrorKind::ArgumentNull);
    assert_error_kind(&as_callable(Some("  ")), ErrorKind::ArgumentNull);
}

#[test]
fn lexical_errors_are_format_errors_with_offsets() {
    let err = as_callable(Some("x => x # 1")).err();
    assert!(matches!(err, Some(SeqError::Format { position: 7, .. })));
    assert_error_kind(&as_callable(Some("x => 'open")), ErrorKind::Format);
}

#[test]
fn structural_errors_are_argument_errors() {
    for source in ["x => ", "x x", "(a, a) => a", "x => y", "x => (x", "=> 1", "x => x 1"] {
        assert_error_kind(&as_callable(Some(source)), ErrorKind::Argument);
    }
}

#[test]
fn deeply_nested_expressions_are_rejected() -> Result<()> {
    let parens = format!("x => {}x{}", "(".repeat(200_000), ")".repeat(200_000));
    assert_error_kind(&as_callable(Some(&parens)), ErrorKind::Argument);

    let chain = format!("x => x{}", " + x".repeat(10_000));
    assert_error_kind(&as_callable(Some(&chain)), ErrorKind::Argument);

    let negations = format!("x => {}x", "-".repeat(10_000));
    assert_error_kind(&as_callable(Some(&negations)), ErrorKind::Argument);

    let members = format!("x => x{}", ".a".repeat(10_000));
    assert_error_kind(&as_callable(Some(&members)), ErrorKind::Argument);

    let modest = format!("x => {}x{}", "(".repeat(40), " + 1)".repeat(40));
    assert_eq!(as_callable(Some(&modest))?.call(&[json!(2)])?, json!(42));
    Ok(())
}

#[test]
fn type_errors_surface_when_evaluated() -> Result<()> {
    let f = as_callable(Some("x => x * 'a'"))?;
    assert_error_kind(&f.call(&[json!(2)]), ErrorKind::InvalidOperation);

    let mut seq = Sequence::from_vec(vec![json!(1), json!([])]).try_map(as_callable(Some("x => -x"))?.selector());
    assert_error_kind(&seq.to_vec(), ErrorKind::InvalidOperation);
    Ok(())
}

#[test]
fn display_shows_the_source() -> Result<()> {
    let f = Lambda::compile("x => x.id")?;
    assert_eq!(f.to_string(), "x => x.id");
    Ok(())
}
