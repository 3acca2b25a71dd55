use anyhow::Result;
use ironseq::testing::*;
use ironseq::*;

#[test]
fn groups_come_out_in_first_seen_key_order() -> Result<()> {
    let groups = Sequence::from_vec(vec![1, 2, 1, 3, 2]).group_by(|n: &i32| *n).to_vec()?;
    assert_groupings_eq(groups.clone(), &[(1, vec![1, 1]), (2, vec![2, 2]), (3, vec![3])]);
    let keys: Vec<i32> = groups.iter().map(|g| *g.key()).collect();
    assert_eq!(keys, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn grouped_sequence_is_keyed_by_group_key() -> Result<()> {
    let mut seq = Sequence::from_vec(sample_people()).group_by_select(|p: &Person| p.city.clone(), |p: &Person| p.id);
    let entries: Vec<(String, Vec<u32>)> = seq
        .to_entries()?
        .into_iter()
        .map(|(key, group)| (key, group.to_vec()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("London".to_string(), vec![1, 3]),
            ("Paris".to_string(), vec![2, 5]),
            ("Berlin".to_string(), vec![4]),
        ]
    );
    Ok(())
}

#[test]
fn group_by_with_custom_equality() -> Result<()> {
    let same_initial = EqualityComparer::from_selector(|c: &char| c.to_ascii_lowercase());
    let groups = Sequence::from_vec(vec!["Apple", "avocado", "Banana", "apricot"])
        .group_by_with(|w: &&str| w.chars().next().unwrap_or(' '), same_initial)
        .to_vec()?;
    assert_eq!(groups.len(), 2);
    assert_eq!(*groups[0].key(), 'A');
    assert_eq!(groups[0].as_slice(), &["Apple", "avocado", "apricot"]);
    Ok(())
}

#[test]
fn grouping_items_form_a_sequence() -> Result<()> {
    let group = Grouping::new("evens", vec![2, 4, 6]);
    assert_eq!(group.items().sum()?, 12);
    assert_eq!(group.len(), 3);
    assert!(!group.is_empty());
    Ok(())
}

#[test]
fn join_pairs_matching_items_and_drops_the_rest() -> Result<()> {
    let rows = Sequence::from_vec(sample_people())
        .join(
            sample_orders(),
            |p: &Person| p.id,
            |o: &Order| o.customer_id,
            |p: &Person, o: &Order| format!("{}:{}", p.name, o.product),
        )
        .to_entries()?;
    assert_eq!(
        rows,
        vec![
            (0, "Ada:keyboard".to_string()),
            (1, "Ada:mouse".to_string()),
            (2, "Brian:monitor".to_string()),
            (3, "Dmitri:desk".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn join_orders_by_outer_group_then_outer_item() -> Result<()> {
    let outer = Sequence::from_vec(vec![(1, 'a'), (2, 'b'), (1, 'c')]);
    let rows = outer
        .join(
            vec![(1, 'x'), (2, 'y')],
            |o: &(i32, char)| o.0,
            |i: &(i32, char)| i.0,
            |o: &(i32, char), i: &(i32, char)| (o.1, i.1),
        )
        .to_vec()?;
    assert_eq!(rows, vec![('a', 'x'), ('c', 'x'), ('b', 'y')]);
    Ok(())
}

#[test]
fn group_join_gives_unmatched_outer_items_an_empty_group() -> Result<()> {
    let totals = Sequence::from_vec(sample_people())
        .group_join(
            sample_orders(),
            |p: &Person| p.id,
            |o: &Order| o.customer_id,
            |p: &Person, orders: &Grouping<u32, Order>| {
                (p.name.clone(), orders.len(), orders.as_slice().iter().map(|o| o.amount).sum::<f64>())
            },
        )
        .to_vec()?;
    assert_eq!(
        totals,
        vec![
            ("Ada".to_string(), 2, 68.75),
            ("Brian".to_string(), 1, 199.0),
            ("Chloe".to_string(), 0, 0.0),
            ("Dmitri".to_string(), 1, 320.0),
            ("Erin".to_string(), 0, 0.0),
        ]
    );
    Ok(())
}

#[test]
fn group_join_group_key_is_the_outer_key() -> Result<()> {
    let keys = Sequence::from_vec(vec![7, 8])
        .group_join(Vec::<i32>::new(), |n: &i32| n % 2, |n: &i32| n % 2, |_: &i32, g: &Grouping<i32, i32>| *g.key())
        .to_vec()?;
    assert_eq!(keys, vec![1, 0]);
    Ok(())
}

#[test]
fn joins_are_deferred_and_repeatable() -> Result<()> {
    let counter = CallCounter::new();
    let hits = counter.clone();
    let mut seq = Sequence::from_vec(vec![1, 2]).join(
        vec![2, 2, 3],
        move |n: &i32| {
            hits.hit();
            *n
        },
        |n: &i32| *n,
        |a: &i32, b: &i32| a + b,
    );
    assert_eq!(counter.count(), 0);
    assert_eq!(seq.to_vec()?, vec![4, 4]);
    assert_eq!(seq.to_vec()?, vec![4, 4]);
    assert_eq!(counter.count(), 2);
    Ok(())
}

#[test]
fn lookup_answers_key_queries() -> Result<()> {
    let by_city = Sequence::from_vec(sample_people()).to_lookup(|p: &Person| p.city.clone())?;
    assert_eq!(by_city.len(), 3);
    assert!(by_city.contains_key(&"Paris".to_string()));
    assert_eq!(by_city.get(&"London".to_string()).count()?, 2);
    assert_eq!(by_city.get(&"Rome".to_string()).count()?, 0);
    assert_error_kind(&by_city.try_get(&"Rome".to_string()), ErrorKind::KeyNotFound);

    let keys: Vec<&String> = by_city.keys().collect();
    assert_eq!(keys, vec!["London", "Paris", "Berlin"]);
    Ok(())
}

#[test]
fn lookup_can_be_walked_as_a_sequence() -> Result<()> {
    let lookup = Sequence::from_vec(word_list()).to_lookup(|w: &&str| w.len())?;
    let mut sizes = lookup.into_sequence().map(|g: &Grouping<usize, &str>, _| g.len());
    assert_eq!(sizes.to_entries()?, vec![(5, 2), (6, 3), (7, 1), (9, 2)]);
    Ok(())
}
