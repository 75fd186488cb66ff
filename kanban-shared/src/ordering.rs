/// Pure ordering helpers shared by the server and the client
///
/// Siblings (lists of a board, cards of a list) are ordered by an integer
/// `position`, ascending. Positions are not required to be dense: appending
/// uses `max + 1` and single moves assign positions directly, so gaps and
/// occasional ties are normal. Only a full re-sequence ([`dense_order`])
/// produces `0..n-1`.
///
/// Nothing here touches the database; [`crate::position`] wraps these in
/// transactions.

use std::collections::HashSet;

/// Error type for order computations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// Requested id is not a child of the container
    #[error("Id {0} does not belong to this container")]
    UnknownId(i32),

    /// Requested id appears more than once
    #[error("Id {0} appears more than once")]
    DuplicateId(i32),

    /// No position is left after the container's last child
    #[error("No position left after {0}; reorder the container to compact it")]
    Exhausted(i32),
}

/// Largest position a client may assign directly
///
/// Anything above it is reserved for appends, so a container whose last
/// child sits at this position can still take more appended children.
pub const MAX_POSITION: i32 = 1_000_000_000;

/// Position for an item appended after `positions`
///
/// Empty → `0`, otherwise `max + 1`. Fails with [`OrderError::Exhausted`]
/// when `max` is already `i32::MAX`.
///
/// ```
/// use kanban_shared::ordering::next_position;
///
/// assert_eq!(next_position([]), Ok(0));
/// assert_eq!(next_position([0, 4, 1]), Ok(5));
/// assert!(next_position([i32::MAX]).is_err());
/// ```
pub fn next_position<I>(positions: I) -> Result<i32, OrderError>
where
    I: IntoIterator<Item = i32>,
{
    match positions.into_iter().max() {
        None => Ok(0),
        Some(max) => max.checked_add(1).ok_or(OrderError::Exhausted(max)),
    }
}

/// Dense re-sequencing of a container
///
/// `current` holds the container's child ids in their present order and
/// `requested` the order asked for. Returns `(id, position)` pairs with
/// positions `0..n-1`: requested ids first, then any omitted children in
/// their previous relative order.
///
/// ```
/// use kanban_shared::ordering::dense_order;
///
/// let order = dense_order(&[10, 11, 12], &[12, 10]).unwrap();
/// assert_eq!(order, vec![(12, 0), (10, 1), (11, 2)]);
/// ```
pub fn dense_order(current: &[i32], requested: &[i32]) -> Result<Vec<(i32, i32)>, OrderError> {
    let members: HashSet<i32> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(requested.len());

    for &id in requested {
        if !members.contains(&id) {
            return Err(OrderError::UnknownId(id));
        }
        if !seen.insert(id) {
            return Err(OrderError::DuplicateId(id));
        }
    }

    let omitted = current.iter().copied().filter(|id| !seen.contains(id));

    Ok(requested
        .iter()
        .copied()
        .chain(omitted)
        .zip(0..)
        .collect())
}

/// Moves `dragged` into the slot `target` occupies in `order`
///
/// The dragged id is removed and re-inserted at the target's original
/// index, so dragging forward lands after the target and dragging backward
/// lands before it. Returns `None` when either id is absent or they are the
/// same id.
///
/// ```
/// use kanban_shared::ordering::move_to_slot;
///
/// assert_eq!(move_to_slot(&[1, 2, 3, 4], 4, 2), Some(vec![1, 4, 2, 3]));
/// assert_eq!(move_to_slot(&[1, 2, 3, 4], 1, 3), Some(vec![2, 3, 1, 4]));
/// ```
pub fn move_to_slot(order: &[i32], dragged: i32, target: i32) -> Option<Vec<i32>> {
    if dragged == target {
        return None;
    }

    let from = order.iter().position(|&id| id == dragged)?;
    let to = order.iter().position(|&id| id == target)?;

    let mut reordered = order.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);

    Some(reordered)
}

/// Sorts `(id, position)` pairs the way containers are read back
///
/// Ties on position fall back to id so reads are deterministic.
pub fn sort_by_position<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (i32, i32),
{
    items.sort_by_key(|item| key(item));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_position() {
        assert_eq!(next_position(Vec::new()), Ok(0));
        assert_eq!(next_position([0]), Ok(1));
        assert_eq!(next_position([0, 1]), Ok(2));
        // Gaps are preserved, never filled
        assert_eq!(next_position([0, 7, 3]), Ok(8));
    }

    #[test]
    fn test_next_position_at_upper_bound() {
        assert_eq!(next_position([MAX_POSITION]), Ok(MAX_POSITION + 1));
        assert_eq!(next_position([3, i32::MAX - 1]), Ok(i32::MAX));
        assert_eq!(next_position([3, i32::MAX]), Err(OrderError::Exhausted(i32::MAX)));
    }

    #[test]
    fn test_dense_order_full_permutation() {
        let order = dense_order(&[1, 2, 3, 4], &[4, 3, 2, 1]).unwrap();
        assert_eq!(order, vec![(4, 0), (3, 1), (2, 2), (1, 3)]);
    }

    #[test]
    fn test_dense_order_keeps_omitted_children() {
        let order = dense_order(&[1, 2, 3, 4, 5], &[5, 2]).unwrap();
        assert_eq!(order, vec![(5, 0), (2, 1), (1, 2), (3, 3), (4, 4)]);
    }

    #[test]
    fn test_dense_order_rejects_foreign_and_duplicate_ids() {
        assert_eq!(dense_order(&[1, 2], &[2, 9]), Err(OrderError::UnknownId(9)));
        assert_eq!(dense_order(&[1, 2], &[2, 2]), Err(OrderError::DuplicateId(2)));
    }

    #[test]
    fn test_dense_order_empty() {
        assert!(dense_order(&[], &[]).unwrap().is_empty());
        assert_eq!(dense_order(&[3], &[]).unwrap(), vec![(3, 0)]);
    }

    #[test]
    fn test_move_to_slot() {
        let order = [10, 20, 30];

        assert_eq!(move_to_slot(&order, 30, 10), Some(vec![30, 10, 20]));
        assert_eq!(move_to_slot(&order, 10, 30), Some(vec![20, 30, 10]));
        assert_eq!(move_to_slot(&order, 20, 30), Some(vec![10, 30, 20]));
    }

    #[test]
    fn test_move_to_slot_noop_cases() {
        assert_eq!(move_to_slot(&[1, 2], 1, 1), None);
        assert_eq!(move_to_slot(&[1, 2], 3, 1), None);
        assert_eq!(move_to_slot(&[1, 2], 1, 3), None);
    }

    #[test]
    fn test_sort_by_position_breaks_ties_by_id() {
        let mut items = vec![(7, 1), (3, 1), (5, 0)];
        sort_by_position(&mut items, |&(id, position)| (position, id));
        assert_eq!(items, vec![(5, 0), (3, 1), (7, 1)]);
    }
}
