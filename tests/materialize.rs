use anyhow::Result;
use ironseq::testing::*;
use ironseq::*;
use serde_json::{json, Value};
use std::collections::HashMap;

#[test]
fn round_trip_through_a_vector_is_identical() -> Result<()> {
    let first = Sequence::range(1, 20)?.to_vec()?;
    let second = Sequence::from_vec(first.clone()).to_vec()?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn to_map_keeps_the_last_item_per_key() -> Result<()> {
    let mut seq = Sequence::from_keyed(vec![("a", 1), ("b", 2), ("a", 3)]);
    let expected: HashMap<&str, i32> = [("a", 3), ("b", 2)].into_iter().collect();
    assert_eq!(seq.to_map()?, expected);
    Ok(())
}

#[test]
fn to_dictionary_rejects_duplicate_keys() -> Result<()> {
    let mut people = Sequence::from_vec(sample_people());
    let ages = people.to_dictionary(|p: &Person| p.name.clone(), |p: &Person| p.age)?;
    assert_eq!(ages.get("Chloe"), Some(&29));

    let by_age = people.to_dictionary(|p: &Person| p.age, |p: &Person| p.name.clone());
    assert_error_kind(&by_age, ErrorKind::KeyNotFound);
    Ok(())
}

#[test]
fn to_set_drops_duplicates() -> Result<()> {
    let set = Sequence::from_vec(word_list()).to_set()?;
    assert_eq!(set.len(), 6);
    assert!(set.contains("cranberry"));
    Ok(())
}

#[test]
fn keyed_array_overwrites_in_place() -> Result<()> {
    let mut seq = Sequence::from_vec(vec!["x1", "y", "x2", "z"]);
    let arr = seq.to_array_with(|_, item: &&str, _| item.starts_with('x').then(|| ArrayKey::from("x")))?;
    let entries: Vec<(ArrayKey, &str)> = arr.into_entries();
    assert_eq!(
        entries,
        vec![
            (ArrayKey::from("x"), "x2"),
            (ArrayKey::Index(0), "y"),
            (ArrayKey::Index(1), "z"),
        ]
    );
    Ok(())
}

#[test]
fn integer_keys_collide_with_later_integer_keys() -> Result<()> {
    let mut seq = Sequence::from_keyed(vec![(0_usize, 'a'), (1, 'b'), (0, 'c')]);
    let arr = seq.to_array_keyed()?;
    assert_eq!(arr.len(), 2);
    assert_eq!(arr.get(&ArrayKey::Index(0)), Some(&'c'));
    assert!(arr.is_list());
    Ok(())
}

#[test]
fn the_last_integer_slot_stops_further_appends() -> Result<()> {
    let mut top = Sequence::from_vec(vec![1, 2]);
    let arr = top.to_array_with(|_, _: &i32, _| Some(ArrayKey::Index(usize::MAX)))?;
    assert_eq!(arr.len(), 1);
    assert_eq!(arr.get(&ArrayKey::Index(usize::MAX)), Some(&2));

    let mut mixed = Sequence::from_vec(vec![1, 2]);
    let appended = mixed.to_array_with(|_, n: &i32, _| (*n == 1).then_some(ArrayKey::Index(usize::MAX)));
    assert_error_kind(&appended, ErrorKind::ArgumentOutOfRange);

    let mut arr = KeyedArray::new();
    arr.insert(ArrayKey::Index(usize::MAX - 1), 'a');
    assert_eq!(arr.push('b')?, ArrayKey::Index(usize::MAX));
    assert_error_kind(&arr.push('c'), ErrorKind::ArgumentOutOfRange);
    Ok(())
}

#[test]
fn json_shape_depends_on_keys() -> Result<()> {
    assert_eq!(Sequence::from_vec(vec![1, 2, 3]).to_json()?, "[1,2,3]");
    assert_eq!(Sequence::from_vec(vec![1, 2, 3]).to_json_keyed()?, "[1,2,3]");

    let skipped = Sequence::from_vec(vec![1, 2, 3]).skip(1)?.to_json_keyed()?;
    assert_eq!(skipped, r#"{"1":2,"2":3}"#);

    let named = Sequence::from_keyed(vec![("b", true), ("a", false)]).to_json_keyed()?;
    assert_eq!(named, r#"{"b":true,"a":false}"#);
    Ok(())
}

#[test]
fn json_options_select_shape_and_layout() -> Result<()> {
    let mut seq = Sequence::from_keyed(vec![("k", 1)]);
    let compact = seq.to_json_with(JsonOptions::default())?;
    assert_eq!(compact, "[1]");

    let pretty = seq.to_json_with(JsonOptions {
        pretty: true,
        keyed: true,
    })?;
    assert_eq!(pretty, "{\n  \"k\": 1\n}");
    Ok(())
}

#[test]
fn records_serialize_through_serde() -> Result<()> {
    let text = Sequence::from_vec(sample_people())
        .filter(|p: &Person, _| p.city == "Berlin")
        .to_json()?;
    let parsed: Vec<Person> = serde_json::from_str(&text)?;
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].name, "Dmitri");
    Ok(())
}

#[test]
fn from_json_keys_follow_the_document() -> Result<()> {
    let mut array = from_json("[10, 20]")?;
    assert_eq!(
        array.to_entries()?,
        vec![(ArrayKey::Index(0), json!(10)), (ArrayKey::Index(1), json!(20))]
    );

    let mut object = from_json(r#"{"b": 1, "a": 2}"#)?;
    let keys: Vec<String> = object.keys().map(|k: &ArrayKey, _| k.to_string()).to_vec()?;
    assert_eq!(keys, vec!["b", "a"]);

    assert_eq!(from_json("null")?.count()?, 0);
    assert_eq!(from_json("\"solo\"")?.to_vec()?, vec![json!("solo")]);
    Ok(())
}

#[test]
fn from_json_reports_malformed_text() {
    assert_error_kind(&from_json("[1,"), ErrorKind::Json);
}

#[test]
fn json_round_trip_keeps_named_slots() -> Result<()> {
    let source = r#"{"x":1,"y":[true,null]}"#;
    let text = from_json(source)?.to_json_keyed()?;
    let reparsed: Value = serde_json::from_str(&text)?;
    assert_eq!(reparsed, serde_json::from_str::<Value>(source)?);
    Ok(())
}

#[test]
fn keyed_array_feeds_back_into_a_sequence() -> Result<()> {
    let mut arr = KeyedArray::new();
    arr.insert(ArrayKey::from("first"), 1);
    arr.push(2)?;
    let mut seq = arr.into_sequence().map(|n: &i32, _| n * 100);
    assert_eq!(
        seq.to_entries()?,
        vec![(ArrayKey::from("first"), 100), (ArrayKey::Index(0), 200)]
    );
    Ok(())
}
