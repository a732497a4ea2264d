//! Attendance normalization and roster-vs-event aggregation.
//!
//! Everything here is pure: callers fetch roster and events, these functions
//! join them in memory.

use std::collections::HashMap;
use std::hash::Hash;

pub mod aggregation;
pub mod demographics;
pub mod normalizer;
pub mod sweep;
pub mod timesheet;

/// `part / whole * 100` rounded to `decimals`; an empty whole yields `0.0`.
pub fn percentage(part: usize, whole: usize, decimals: i32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, decimals)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Groups items by key, keeping groups and members in first-encountered order.
pub(crate) fn group_in_order<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> Vec<(K, Vec<&'a T>)>
where
    T: 'a,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_guards_empty_whole() {
        assert_eq!(percentage(0, 0, 2), 0.0);
        assert_eq!(percentage(5, 0, 1), 0.0);
    }

    #[test]
    fn percentage_rounds_to_requested_precision() {
        assert_eq!(percentage(2, 3, 2), 66.67);
        assert_eq!(percentage(2, 3, 1), 66.7);
        assert_eq!(percentage(1, 8, 2), 12.5);
        assert_eq!(percentage(3, 3, 2), 100.0);
    }

    #[test]
    fn groups_keep_first_encountered_order() {
        let items = ["b1", "a1", "b2", "c1", "a2"];
        let groups = group_in_order(items.iter(), |s| s.chars().next().unwrap());

        let keys: Vec<char> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!['b', 'a', 'c']);
        assert_eq!(groups[0].1, vec![&"b1", &"b2"]);
    }
}
