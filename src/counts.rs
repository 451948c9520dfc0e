//! Term counters that remember the order terms were first seen
//!
//! The vocabulary files are written in accumulation order, so a plain hashmap is not enough: the
//! map only points into a vector of entries, and iteration always walks the vector.
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};

/// Farmhash behind the Hasher trait
///
/// farmhash can't stream, so each `write` is hashed on its own and folded into the state with
/// a rotate and xor. Not the same value as hashing the concatenation, but stable for equal keys.
pub struct FarmHashLie(u64);

impl Default for FarmHashLie {
    #[inline]
    fn default() -> FarmHashLie { FarmHashLie(0) }
}

impl Hasher for FarmHashLie {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0 ^= farmhash::hash64(bytes).rotate_left(5);
    }
}

pub type Farm = BuildHasherDefault<FarmHashLie>;
pub type FarmMap<X, Y> = HashMap<X, Y, Farm>;

/// Occurrence counts of strings, iterated in first-seen order
#[derive(Default, Debug, Clone)]
pub struct Counts {
    slots: FarmMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Counts {
    pub fn new() -> Self {
        Counts::default()
    }

    /// Count one more occurrence of a term
    pub fn add(&mut self, term: &str) {
        self.add_n(term, 1);
    }

    /// Count `n` more occurrences of a term
    pub fn add_n(&mut self, term: &str, n: u64) {
        if let Some(&slot) = self.slots.get(term) {
            self.entries[slot].1 += n;
        } else {
            self.slots.insert(term.to_owned(), self.entries.len());
            self.entries.push((term.to_owned(), n));
        }
    }

    /// How many times the term was counted (0 if never)
    pub fn get(&self, term: &str) -> u64 {
        self.slots.get(term).map(|&slot| self.entries[slot].1).unwrap_or(0)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all terms
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|&(ref term, count)| (term.as_str(), count))
    }

    /// Keep only the terms counted at least `min_count` times, still in first-seen order
    pub fn retain_at_least(&self, min_count: u64) -> Vec<(String, u64)> {
        self.entries.iter()
            .filter(|&&(_, count)| count >= min_count)
            .cloned()
            .collect()
    }
}

impl<'a> Extend<&'a str> for Counts {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for term in iter {
            self.add(term);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_in_first_seen_order() {
        let mut counts = Counts::new();
        counts.extend(vec!["b", "a", "b", "c", "a", "b"]);
        let seen: Vec<(&str, u64)> = counts.iter().collect();
        assert_eq!(seen, vec![("b", 3), ("a", 2), ("c", 1)]);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get("zebra"), 0);
    }

    #[test]
    fn threshold_keeps_order_and_drops_rare_terms() {
        let mut counts = Counts::new();
        counts.extend(vec!["x", "y", "y", "z", "z", "z"]);
        assert_eq!(
            counts.retain_at_least(2),
            vec![("y".to_string(), 2), ("z".to_string(), 3)]
        );
        assert_eq!(counts.retain_at_least(0).len(), 3);
        assert!(counts.retain_at_least(4).is_empty());
    }

    #[test]
    fn distinct_terms_do_not_collide() {
        let mut counts = Counts::new();
        for i in 0..2000 {
            counts.add(&format!("term{}", i));
        }
        assert_eq!(counts.len(), 2000);
        assert_eq!(counts.get("term1999"), 1);
    }
}
