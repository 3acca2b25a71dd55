//! Property-based tests for the sequence operators.

use ironseq::*;
use proptest::prelude::*;

fn small_vec() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-20_i32..20, 0..40)
}

proptest! {
    #[test]
    fn prop_round_trip_is_identity(items in small_vec()) {
        let first = Sequence::from_vec(items.clone()).to_vec()?;
        let second = Sequence::from_vec(first.clone()).to_vec()?;
        prop_assert_eq!(&first, &items);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_sort_is_stable(items in prop::collection::vec((0_u8..5, any::<u16>()), 0..40)) {
        let tagged: Vec<(u8, u16, usize)> = items.iter().enumerate().map(|(i, (k, v))| (*k, *v, i)).collect();

        let ascending = Sequence::from_vec(tagged.clone()).order_by(|t: &(u8, u16, usize)| t.0).to_vec()?;
        let mut expected = tagged.clone();
        expected.sort_by_key(|t| t.0);
        prop_assert_eq!(&ascending, &expected);

        let descending = Sequence::from_vec(tagged.clone()).order_by_descending(|t: &(u8, u16, usize)| t.0).to_vec()?;
        let mut expected = tagged;
        expected.sort_by(|a, b| b.0.cmp(&a.0));
        prop_assert_eq!(descending, expected);
    }

    #[test]
    fn prop_distinct_keeps_first_occurrences(items in small_vec()) {
        let out = Sequence::from_vec(items.clone()).distinct().to_vec()?;
        let mut expected: Vec<i32> = Vec::new();
        for item in items {
            if !expected.contains(&item) {
                expected.push(item);
            }
        }
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn prop_groups_partition_the_input_in_first_seen_order(items in small_vec()) {
        let groups = Sequence::from_vec(items.clone()).group_by(|n: &i32| n.rem_euclid(4)).to_vec()?;
        let total: usize = groups.iter().map(Grouping::len).sum();
        prop_assert_eq!(total, items.len());

        let keys: Vec<i32> = groups.iter().map(|g| *g.key()).collect();
        let expected_keys = Sequence::from_vec(items.clone()).map(|n: &i32, _| n.rem_euclid(4)).distinct().to_vec()?;
        prop_assert_eq!(keys, expected_keys);

        for group in &groups {
            let expected: Vec<i32> = items.iter().copied().filter(|n| n.rem_euclid(4) == *group.key()).collect();
            prop_assert_eq!(group.to_vec(), expected);
        }
    }

    #[test]
    fn prop_take_then_skip_rebuilds_the_input(items in small_vec(), n in 0_usize..50) {
        let mut head = Sequence::from_vec(items.clone()).take(n)?.to_vec()?;
        let tail = Sequence::from_vec(items.clone()).skip(n)?.to_vec()?;
        prop_assert_eq!(head.len(), n.min(items.len()));
        head.extend(tail);
        prop_assert_eq!(head, items);
    }

    #[test]
    fn prop_filter_does_not_disturb_its_source(items in small_vec()) {
        let base = Sequence::from_vec(items);
        let first = base.try_clone()?.filter(|n: &i32, _| *n > 0).to_vec()?;
        let second = base.try_clone()?.filter(|n: &i32, _| *n > 0).to_vec()?;
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_zip_length_is_the_shorter_side(a in small_vec(), b in small_vec()) {
        let n = Sequence::from_vec(a.clone()).zip_pairs(b.clone()).count()?;
        prop_assert_eq!(n, a.len().min(b.len()));
    }

    #[test]
    fn prop_except_and_intersect_split_the_first_side(a in small_vec(), b in small_vec()) {
        let kept = Sequence::from_vec(a.clone()).except(b.clone()).to_vec()?;
        prop_assert!(kept.iter().all(|x| !b.contains(x)));

        let shared = Sequence::from_vec(a.clone()).intersect(b.clone()).to_vec()?;
        prop_assert!(shared.iter().all(|x| a.contains(x) && b.contains(x)));
        let distinct_shared = Sequence::from_vec(shared.clone()).distinct().count()?;
        prop_assert_eq!(distinct_shared, shared.len());
    }

    #[test]
    fn prop_randomize_is_a_seeded_permutation(items in small_vec(), seed in any::<u64>()) {
        let once = Sequence::from_vec(items.clone()).randomize(seed).to_vec()?;
        let twice = Sequence::from_vec(items.clone()).randomize(seed).to_vec()?;
        prop_assert_eq!(&once, &twice);

        let mut sorted = once;
        sorted.sort_unstable();
        let mut expected = items;
        expected.sort_unstable();
        prop_assert_eq!(sorted, expected);
    }
}
