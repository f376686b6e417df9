//! Property-based tests using proptest
//!
//! Random operation sequences are replayed against a plain-vector model;
//! the heap must agree with the model at every step.

use proptest::prelude::*;

use fibonacci_heap::{FibonacciHeap, NodeHandle};

/// Push/extract soup: the cached minimum must equal the model's minimum
/// after every operation.
fn check_push_extract(ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap = FibonacciHeap::new();
    let mut model: Vec<i32> = Vec::new();

    for (should_extract, value) in ops {
        if should_extract && !heap.is_empty() {
            let (priority, _item) = heap.extract_min().expect("heap is non-empty");
            let position = model
                .iter()
                .position(|&p| p == priority)
                .expect("extracted priority exists in the model");
            let model_min = *model.iter().min().unwrap();
            prop_assert_eq!(priority, model_min);
            model.remove(position);
        } else {
            heap.insert(value, value).expect("integer priorities are valid");
            model.push(value);
        }

        prop_assert_eq!(heap.len(), model.len());
        prop_assert_eq!(heap.is_empty(), model.is_empty());
        prop_assert_eq!(
            heap.peek_min().map(|(p, _)| *p),
            model.iter().min().copied()
        );
    }
    Ok(())
}

/// Extraction drains in non-decreasing priority order and yields exactly the
/// multiset that went in.
fn check_extraction_order(values: Vec<i32>) -> Result<(), TestCaseError> {
    let mut heap = FibonacciHeap::new();
    for &value in &values {
        heap.insert(value, value).expect("integer priorities are valid");
    }

    let mut drained = Vec::with_capacity(values.len());
    while let Ok((priority, _)) = heap.extract_min() {
        drained.push(priority);
    }

    let mut expected = values;
    expected.sort_unstable();
    prop_assert_eq!(drained, expected);
    Ok(())
}

/// Random decreases through handles keep min-heap order along every parent
/// edge, observed through the cached minimum and the final drain order.
fn check_decrease_key(
    initial: Vec<i32>,
    decreases: Vec<(usize, i32)>,
) -> Result<(), TestCaseError> {
    let mut heap = FibonacciHeap::new();
    let mut handles: Vec<NodeHandle> = Vec::new();
    let mut priorities: Vec<i32> = Vec::new();

    for &priority in &initial {
        handles.push(heap.insert(priority, priority).expect("valid priority"));
        priorities.push(priority);
    }
    // one extraction so consolidation builds real trees to cut from
    if let Some(min_handle) = heap.min_handle() {
        heap.extract_min().expect("heap is non-empty");
        let position = handles
            .iter()
            .position(|&h| h == min_handle)
            .expect("minimum handle was issued by insert");
        priorities.remove(position);
        handles.remove(position);
    }

    for (index, new_priority) in decreases {
        if handles.is_empty() {
            break;
        }
        let index = index % handles.len();
        heap.decrease_key(handles[index], new_priority)
            .expect("valid priority");
        // non-decreasing targets are ignored by contract
        if new_priority < priorities[index] {
            priorities[index] = new_priority;
        }

        prop_assert_eq!(
            heap.peek_min().map(|(p, _)| *p),
            priorities.iter().min().copied()
        );
    }

    let mut drained = Vec::new();
    while let Ok((priority, _)) = heap.extract_min() {
        drained.push(priority);
    }
    priorities.sort_unstable();
    prop_assert_eq!(drained, priorities);
    Ok(())
}

/// Union adopts the lower minimum, sums the lengths, and drains as the merge
/// of both original sequences in sorted order.
fn check_union(left: Vec<i32>, right: Vec<i32>) -> Result<(), TestCaseError> {
    let mut heap1 = FibonacciHeap::new();
    let mut heap2 = FibonacciHeap::new();
    for &value in &left {
        heap1.insert(value, value).expect("valid priority");
    }
    for &value in &right {
        heap2.insert(value, value).expect("valid priority");
    }

    let min1 = heap1.peek_min().map(|(p, _)| *p);
    let min2 = heap2.peek_min().map(|(p, _)| *p);
    let expected_min = [min1, min2].into_iter().flatten().min();

    heap1.union(heap2);
    prop_assert_eq!(heap1.peek_min().map(|(p, _)| *p), expected_min);
    prop_assert_eq!(heap1.len(), left.len() + right.len());

    let mut drained = Vec::new();
    while let Ok((priority, _)) = heap1.extract_min() {
        drained.push(priority);
    }
    let mut expected: Vec<i32> = left.into_iter().chain(right).collect();
    expected.sort_unstable();
    prop_assert_eq!(drained, expected);
    Ok(())
}

/// Deleting a random subset leaves exactly the sorted complement.
fn check_delete(values: Vec<i32>, victims: Vec<usize>) -> Result<(), TestCaseError> {
    let mut heap = FibonacciHeap::new();
    let mut handles = Vec::new();
    for &value in &values {
        handles.push(heap.insert(value, value).expect("valid priority"));
    }

    let mut removed = vec![false; values.len()];
    for victim in victims {
        if handles.is_empty() {
            break;
        }
        let index = victim % handles.len();
        if removed[index] {
            continue;
        }
        let (priority, _) = heap.delete(handles[index]).expect("live handle");
        prop_assert_eq!(priority, values[index]);
        removed[index] = true;
    }

    let mut drained = Vec::new();
    while let Ok((priority, _)) = heap.extract_min() {
        drained.push(priority);
    }
    let mut expected: Vec<i32> = values
        .iter()
        .zip(&removed)
        .filter(|(_, &gone)| !gone)
        .map(|(&p, _)| p)
        .collect();
    expected.sort_unstable();
    prop_assert_eq!(drained, expected);
    Ok(())
}

proptest! {
    #[test]
    fn push_extract_invariant(ops in prop::collection::vec((any::<bool>(), -100i32..100), 0..100)) {
        check_push_extract(ops)?;
    }

    #[test]
    fn extraction_order_invariant(values in prop::collection::vec(-100i32..100, 0..100)) {
        check_extraction_order(values)?;
    }

    #[test]
    fn decrease_key_invariant(
        initial in prop::collection::vec(-100i32..100, 1..50),
        decreases in prop::collection::vec((0usize..50, -200i32..100), 0..30)
    ) {
        check_decrease_key(initial, decreases)?;
    }

    #[test]
    fn union_invariant(
        left in prop::collection::vec(-100i32..100, 0..50),
        right in prop::collection::vec(-100i32..100, 0..50)
    ) {
        check_union(left, right)?;
    }

    #[test]
    fn delete_invariant(
        values in prop::collection::vec(-100i32..100, 1..50),
        victims in prop::collection::vec(0usize..50, 0..20)
    ) {
        check_delete(values, victims)?;
    }
}
