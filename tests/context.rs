use anyhow::Result;
use ironseq::*;

#[test]
fn index_and_edge_flags_follow_the_loop() -> Result<()> {
    let mut seq = Sequence::from_vec(vec!['a', 'b', 'c']);
    let seen = seq.iterate(Vec::new(), (), |item: &char, ctx| {
        let entry = (*item, ctx.index(), ctx.is_first(), ctx.is_last());
        ctx.result_mut().push(entry);
        Ok(())
    })?;
    assert_eq!(
        seen,
        vec![('a', 0, true, false), ('b', 1, false, false), ('c', 2, false, true)]
    );
    Ok(())
}

#[test]
fn single_element_is_first_and_last() -> Result<()> {
    let mut seq = Sequence::once(7);
    let flags = seq.iterate(None, (), |_: &i32, ctx| {
        let flags = (ctx.is_first(), ctx.is_last());
        ctx.set_result(Some(flags));
        Ok(())
    })?;
    assert_eq!(flags, Some((true, true)));
    Ok(())
}

#[test]
fn keys_are_visible_to_callbacks() -> Result<()> {
    let mut seq = Sequence::from_keyed(vec![("x", 1), ("y", 2)]);
    let keys = seq.iterate(String::new(), (), |_: &i32, ctx| {
        let key = *ctx.key();
        ctx.result_mut().push_str(key);
        Ok(())
    })?;
    assert_eq!(keys, "xy");
    Ok(())
}

#[test]
fn next_value_reaches_only_the_following_element() -> Result<()> {
    let mut seq = Sequence::from_vec(vec![1, 2, 3, 4]);
    let seen = seq.iterate(Vec::new(), 0, |item: &i32, ctx| {
        let prev = ctx.previous_value().copied();
        ctx.result_mut().push(prev);
        if item % 2 == 1 {
            ctx.set_next_value(*item * 100);
        }
        Ok(())
    })?;
    assert_eq!(seen, vec![None, Some(100), None, Some(300)]);
    Ok(())
}

#[test]
fn carried_value_persists_across_elements() -> Result<()> {
    let mut seq = Sequence::from_vec(vec![5, 1, 4]);
    let running = seq.iterate(Vec::new(), 0, |item: &i32, ctx| {
        *ctx.value_mut() += item;
        let total = *ctx.value();
        ctx.result_mut().push(total);
        Ok(())
    })?;
    assert_eq!(running, vec![5, 6, 10]);
    Ok(())
}

#[test]
fn cancel_stops_after_current_element_and_keeps_result() -> Result<()> {
    let mut seq = Sequence::from_vec(vec![1, 2, 3, 4, 5]);
    let sum = seq.iterate(0, (), |item: &i32, ctx| {
        *ctx.result_mut() += item;
        if *item == 3 {
            ctx.cancel();
        }
        Ok(())
    })?;
    assert_eq!(sum, 6);
    Ok(())
}

#[test]
fn cancel_inside_map_ends_the_lazy_sequence() -> Result<()> {
    let mut seq = Sequence::from_vec(vec![10, 20, 30, 40]).map(|n: &i32, ctx| {
        if ctx.index() == 1 {
            ctx.cancel();
        }
        n / 10
    });
    assert_eq!(seq.to_vec()?, vec![1, 2]);
    Ok(())
}

#[test]
fn callback_errors_propagate_out_of_iterate() {
    let mut seq = Sequence::from_vec(vec![1, 2, 3]);
    let result = seq.iterate(0, (), |item: &i32, ctx| {
        if *item == 2 {
            return Err(SeqError::Argument {
                message: "two".into(),
            });
        }
        *ctx.result_mut() += item;
        Ok(())
    });
    assert!(result.is_err_and(|e| e.kind() == ErrorKind::Argument));
}

#[test]
fn indexes_restart_in_each_operator() -> Result<()> {
    let mut seq = Sequence::from_vec(vec![1, 2, 3, 4, 5, 6])
        .filter(|n: &i32, _| n % 2 == 0)
        .map(|n: &i32, ctx| (*n, ctx.index()));
    assert_eq!(seq.to_vec()?, vec![(2, 0), (4, 1), (6, 2)]);
    Ok(())
}

#[test]
fn empty_sequence_never_calls_the_action() -> Result<()> {
    let mut seq = Sequence::<i32>::empty();
    let calls = seq.iterate(0, (), |_, ctx| {
        *ctx.result_mut() += 1;
        Ok(())
    })?;
    assert_eq!(calls, 0);
    Ok(())
}
