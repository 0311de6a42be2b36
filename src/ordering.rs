use std::cmp::Ordering;

/// Something that occupies a slot in a dense `0..n` sequence.
pub trait Ordered {
    fn order(&self) -> usize;
    fn set_order(&mut self, order: usize);
    /// Secondary sort key used when two items claim the same order.
    fn tie_key(&self) -> u64;
}

/// Renumbers every group of `items` so each group's orders become `0..n`.
///
/// Items are ranked by current order, then by `tie_key`, then by their position
/// in the slice. Returns how many items had their order changed, so running it
/// over an already dense collection returns 0.
pub fn renumber<T, K, F>(items: &mut [T], group_of: F) -> usize
where
    T: Ordered,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut positions: Vec<usize> = (0..items.len()).collect();
    positions.sort_by(|&a, &b| {
        group_of(&items[a])
            .cmp(&group_of(&items[b]))
            .then_with(|| rank(&items[a], &items[b]))
    });

    let mut changed = 0;
    let mut current: Option<K> = None;
    let mut next = 0;
    for idx in positions {
        let key = group_of(&items[idx]);
        if current.as_ref() != Some(&key) {
            current = Some(key);
            next = 0;
        }
        if items[idx].order() != next {
            items[idx].set_order(next);
            changed += 1;
        }
        next += 1;
    }
    changed
}

/// Renumbers only the items accepted by `member`, leaving the rest untouched.
pub fn renumber_group<T, P>(items: &mut [T], member: P) -> usize
where
    T: Ordered,
    P: Fn(&T) -> bool,
{
    let mut positions: Vec<usize> = (0..items.len())
        .filter(|&idx| member(&items[idx]))
        .collect();
    positions.sort_by(|&a, &b| rank(&items[a], &items[b]));

    let mut changed = 0;
    for (next, idx) in positions.into_iter().enumerate() {
        if items[idx].order() != next {
            items[idx].set_order(next);
            changed += 1;
        }
    }
    changed
}

/// True when `orders` is exactly a permutation of `0..len`.
pub fn is_dense<I>(orders: I) -> bool
where
    I: IntoIterator<Item = usize>,
{
    let mut orders: Vec<usize> = orders.into_iter().collect();
    orders.sort_unstable();
    orders.iter().enumerate().all(|(expected, &order)| expected == order)
}

/// Highest order in use, if any.
pub fn max_order<'a, T, I>(items: I) -> Option<usize>
where
    T: Ordered + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(Ordered::order).max()
}

/// Comparator for display: order first, tie key second.
pub fn rank<T: Ordered>(a: &T, b: &T) -> Ordering {
    a.order()
        .cmp(&b.order())
        .then_with(|| a.tie_key().cmp(&b.tie_key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u64,
        group: u8,
        order: usize,
    }

    impl Ordered for Item {
        fn order(&self) -> usize {
            self.order
        }

        fn set_order(&mut self, order: usize) {
            self.order = order;
        }

        fn tie_key(&self) -> u64 {
            self.id
        }
    }

    fn item(id: u64, group: u8, order: usize) -> Item {
        Item { id, group, order }
    }

    fn orders_of(items: &[Item], group: u8) -> Vec<(u64, usize)> {
        let mut out: Vec<(u64, usize)> = items
            .iter()
            .filter(|i| i.group == group)
            .map(|i| (i.id, i.order))
            .collect();
        out.sort_by_key(|&(_, order)| order);
        out
    }

    #[test]
    fn closes_gaps_per_group() {
        let mut items = vec![
            item(1, 0, 4),
            item(2, 1, 7),
            item(3, 0, 0),
            item(4, 1, 2),
            item(5, 0, 9),
        ];
        let changed = renumber(&mut items, |i| i.group);
        assert_eq!(changed, 4);
        assert_eq!(orders_of(&items, 0), vec![(3, 0), (1, 1), (5, 2)]);
        assert_eq!(orders_of(&items, 1), vec![(4, 0), (2, 1)]);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let mut items = vec![item(1, 0, 3), item(2, 0, 3), item(3, 0, 1)];
        renumber(&mut items, |i| i.group);
        let snapshot = items.clone();
        assert_eq!(renumber(&mut items, |i| i.group), 0);
        assert_eq!(items, snapshot);
    }

    #[test]
    fn ties_fall_back_to_id() {
        let mut items = vec![item(9, 0, 1), item(2, 0, 1), item(5, 0, 0)];
        renumber(&mut items, |i| i.group);
        assert_eq!(orders_of(&items, 0), vec![(5, 0), (2, 1), (9, 2)]);
    }

    #[test]
    fn group_renumber_leaves_other_groups_alone() {
        let mut items = vec![item(1, 0, 5), item(2, 1, 5), item(3, 0, 2)];
        let changed = renumber_group(&mut items, |i| i.group == 0);
        assert_eq!(changed, 2);
        assert_eq!(orders_of(&items, 0), vec![(3, 0), (1, 1)]);
        assert_eq!(items[1].order, 5);
    }

    #[test]
    fn density_check() {
        assert!(is_dense(Vec::<usize>::new()));
        assert!(is_dense(vec![2, 0, 1]));
        assert!(!is_dense(vec![0, 0, 1]));
        assert!(!is_dense(vec![0, 2]));
        assert!(!is_dense(vec![1]));
    }

    #[test]
    fn max_order_of_empty_is_none() {
        let items: Vec<Item> = Vec::new();
        assert_eq!(max_order(&items), None);
        let items = vec![item(1, 0, 3), item(2, 0, 7)];
        assert_eq!(max_order(&items), Some(7));
    }
}
