// Copyright 2025 Oxide Computer Company

use std::hash::Hash;

use indexmap::IndexMap;

/// The union of keys from two collections, each key paired with the value
/// found on either side.
///
/// Keys from `a` come first in their original order, followed by keys only
/// present in `b`. When a key repeats within one side, the first occurrence
/// wins.
#[derive(Debug)]
pub struct Paired<K, V> {
    entries: IndexMap<K, (Option<V>, Option<V>)>,
}

impl<K, V> Paired<K, V>
where
    K: Hash + Eq,
{
    pub fn new<I, I2>(a: I, b: I2) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        I2: IntoIterator<Item = (K, V)>,
    {
        let mut entries = IndexMap::<K, (Option<V>, Option<V>)>::new();

        for (k, v) in a {
            entries.entry(k).or_insert((None, None)).0.get_or_insert(v);
        }
        for (k, v) in b {
            entries.entry(k).or_insert((None, None)).1.get_or_insert(v);
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> IntoIterator for Paired<K, V> {
    type Item = (K, (Option<V>, Option<V>));
    type IntoIter = indexmap::map::IntoIter<K, (Option<V>, Option<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {

    use crate::setops::Paired;

    #[test]
    fn test_pairing() {
        let a = [(1, "a"), (2, "b")];
        let b = [(3, "c"), (1, "aa")];

        let paired = Paired::new(a, b).into_iter().collect::<Vec<_>>();

        assert_eq!(
            paired,
            vec![
                (1, (Some("a"), Some("aa"))),
                (2, (Some("b"), None)),
                (3, (None, Some("c"))),
            ]
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let a = [("id", 1), ("id", 2)];
        let b: [(&str, i32); 0] = [];

        let paired = Paired::new(a, b).into_iter().collect::<Vec<_>>();

        assert_eq!(paired, vec![("id", (Some(1), None))]);
    }

    #[test]
    fn test_empty() {
        let a: [(u8, u8); 0] = [];
        let paired = Paired::new(a, a);
        assert!(paired.is_empty());
        assert_eq!(paired.len(), 0);
    }
}
