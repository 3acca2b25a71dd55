use anyhow::Result;
use ironseq::testing::*;
use ironseq::*;

#[test]
fn sequence_assertions_drive_the_query() -> Result<()> {
    let doubled = Sequence::from_vec(vec![1, 2, 3]).map(|x: &i32, _| x * 2);
    assert_sequence_eq(doubled, &[2, 4, 6]);

    let tail = Sequence::from_keyed(vec![("a", 1), ("b", 2), ("c", 3)]).skip(1)?;
    assert_entries_eq(tail, &[("b", 2), ("c", 3)]);
    Ok(())
}

#[test]
#[should_panic(expected = "sequence ended early")]
fn a_short_sequence_fails_the_ordered_assertion() {
    assert_sequence_eq(vec![1, 2], &[1, 2, 3]);
}

#[test]
#[should_panic(expected = "unexpected extra item")]
fn a_long_sequence_fails_the_ordered_assertion() {
    assert_sequence_eq(vec![1, 2, 3], &[1, 2]);
}

#[test]
fn unordered_assertion_counts_duplicates() {
    let shuffled = Sequence::from_vec(vec![3, 1, 2, 2]).randomize(7);
    assert_sequence_unordered_eq(shuffled, &[2, 1, 2, 3]);
}

#[test]
#[should_panic(expected = "multisets differ")]
fn unordered_assertion_rejects_a_changed_multiplicity() {
    assert_sequence_unordered_eq(vec![1, 2, 2], &[1, 1, 2]);
}

#[test]
fn grouping_assertion_checks_keys_and_members() {
    let pairs = SequenceBuilder::new()
        .extend([("x", 1), ("x", 2)])
        .push(("y", 3))
        .push(("x", 4))
        .build();

    let groups = pairs.group_by_select(|kv: &(&'static str, i32)| kv.0, |kv: &(&'static str, i32)| kv.1);
    assert_groupings_eq(groups, &[("x", vec![1, 2, 4]), ("y", vec![3])]);
}

#[test]
fn predicate_assertions_accept_any_source() -> Result<()> {
    let doubled = Sequence::from_vec(vec![2, 4, 6, 8]).map(|x: &i32, _| x * 2);
    assert_all(doubled.try_clone()?, |x| x % 4 == 0);
    assert_any(doubled.try_clone()?, |x| *x > 10);
    assert_none(doubled, |x| *x < 0);

    assert_all("abc", |c| c.is_alphabetic());
    Ok(())
}

#[test]
#[should_panic(expected = "fails the predicate")]
fn assert_all_names_the_failing_item() {
    assert_all(vec![2, 3, 4], |x| x % 2 == 0);
}

#[test]
fn builder_numbers_items_in_push_order() -> Result<()> {
    let builder = SequenceBuilder::new().push(0).repeat(7, 2).extend(1..=3);
    assert_eq!(builder.len(), 6);
    assert!(!builder.is_empty());

    let mut seq = builder.build();
    assert_eq!(seq.to_entries()?, vec![(0, 0), (1, 7), (2, 7), (3, 1), (4, 2), (5, 3)]);
    // resettable: a second pass sees the same items
    assert_eq!(seq.count()?, 6);
    Ok(())
}

#[test]
fn keyed_builder_keeps_duplicate_keys() -> Result<()> {
    let seq = SequenceBuilder::keyed()
        .entries("b", [2, 20])
        .entry("a", 1)
        .build()
        .map(|v: &i32, _| v * 10);

    assert_entries_eq(seq, &[("b", 20), ("b", 200), ("a", 10)]);
    Ok(())
}

#[test]
fn single_pass_builder_refuses_a_second_drive() -> Result<()> {
    let mut seq = SequenceBuilder::new().extend(["a", "b", "c"]).build_single_pass();
    assert_eq!(seq.to_vec()?, vec!["a", "b", "c"]);
    assert_error_kind(&seq.to_vec(), ErrorKind::InvalidOperation);
    Ok(())
}

#[test]
fn seeded_ints_repeat_for_the_same_seed() -> Result<()> {
    let mut first = seeded_ints(100, 0, 1000, 5);
    let values = first.to_vec()?;
    assert_eq!(values.len(), 100);
    assert_all(values.clone(), |v| (0..1000).contains(v));

    assert_sequence_eq(seeded_ints(100, 0, 1000, 5), &values);
    assert_eq!(first.to_vec()?, values);

    let other = seeded_ints(100, 0, 1000, 6).to_vec()?;
    assert_ne!(other, values);
    Ok(())
}

#[test]
fn seeded_ints_accept_a_reversed_range() {
    assert_all(seeded_ints(50, 10, -10, 1), |v| (-10..10).contains(v));
}

#[test]
fn fixtures_cover_join_edges() -> Result<()> {
    let people = sample_people();
    let orders = sample_orders();

    assert_any(orders.as_slice(), |o| people.iter().all(|p| p.id != o.customer_id));
    assert_all(orders.as_slice(), |o| o.amount > 0.0);
    assert_any(people, |p| p.city == "Berlin");

    let distinct = Sequence::from_vec(word_list()).distinct().count()?;
    assert_eq!(distinct, 6);
    Ok(())
}

#[test]
fn debug_operators_pass_elements_through() {
    let seen = CallCounter::new();
    let hits = seen.clone();

    let traced = Sequence::from_vec(vec![5, 6, 7])
        .debug_inspect("source")
        .debug_inspect_with("with", move |_| hits.hit())
        .debug_count("count")
        .debug_sample(1, "sample");

    assert_sequence_eq(traced, &[5, 6, 7]);
    assert_eq!(seen.count(), 3);
}

#[test]
fn call_counter_clones_share_a_count() {
    let counter = CallCounter::new();
    let shared = counter.clone();
    shared.hit();
    shared.hit();
    assert_eq!(counter.count(), 2);

    counter.reset();
    assert_eq!(shared.count(), 0);
}

#[test]
fn error_kind_assertion() {
    assert_error_kind(&Sequence::<i32>::empty().first(), ErrorKind::InvalidOperation);
}

#[test]
#[should_panic(expected = "got Ok")]
fn error_kind_assertion_rejects_success() {
    assert_error_kind(&Sequence::from_vec(vec![1]).first(), ErrorKind::InvalidOperation);
}
