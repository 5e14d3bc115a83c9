use crate::models::VerseReference;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Two one-directional lookup tables between the references of two
/// versifications.
///
/// When several entries share a source reference, each direction keeps the
/// lowest target by [`VerseReference::mapping_cmp`], so the result does not
/// depend on the order of the mapping data.
#[derive(Debug, Clone, Default)]
pub struct BidirectionalVerseMap {
    forward: HashMap<VerseReference, VerseReference>,
    backward: HashMap<VerseReference, VerseReference>,
}

impl BidirectionalVerseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_prefer_lowest(&mut self, left: VerseReference, right: VerseReference) {
        insert_lowest(&mut self.forward, left.clone(), right.clone());
        insert_lowest(&mut self.backward, right, left);
    }

    pub fn lookup_forward(&self, left: &VerseReference) -> Option<&VerseReference> {
        self.forward.get(left)
    }

    pub fn lookup_backward(&self, right: &VerseReference) -> Option<&VerseReference> {
        self.backward.get(right)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn backward_len(&self) -> usize {
        self.backward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.backward.is_empty()
    }
}

fn insert_lowest(
    table: &mut HashMap<VerseReference, VerseReference>,
    key: VerseReference,
    value: VerseReference,
) {
    match table.entry(key) {
        Entry::Occupied(mut existing) => {
            if value.mapping_cmp(existing.get()) == Ordering::Less {
                existing.insert(value);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kjv(book: &str, chapter: u32, verse: u32) -> VerseReference {
        VerseReference::new("KJV", book, chapter, verse)
    }

    fn synodal(book: &str, chapter: u32, verse: u32) -> VerseReference {
        VerseReference::new("Synodal", book, chapter, verse)
    }

    #[test]
    fn test_pair_reachable_both_ways() {
        let mut map = BidirectionalVerseMap::new();
        map.insert_prefer_lowest(kjv("Ps", 9, 21), synodal("Ps", 10, 1));

        assert_eq!(map.lookup_forward(&kjv("Ps", 9, 21)), Some(&synodal("Ps", 10, 1)));
        assert_eq!(map.lookup_backward(&synodal("Ps", 10, 1)), Some(&kjv("Ps", 9, 21)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.backward_len(), 1);
    }

    #[test]
    fn test_lookup_has_no_fallback() {
        let mut map = BidirectionalVerseMap::new();
        map.insert_prefer_lowest(kjv("Gen", 3, 1), synodal("Exod", 4, 2));

        assert!(map.lookup_forward(&kjv("Gen", 3, 0)).is_none());
        // keys carry the scheme, so a right-hand reference is not a forward key
        assert!(map.lookup_forward(&synodal("Exod", 4, 2)).is_none());
    }

    #[test]
    fn test_lowest_target_wins_in_either_order() {
        let mut ascending = BidirectionalVerseMap::new();
        ascending.insert_prefer_lowest(kjv("Gen", 3, 16), synodal("Exod", 4, 16));
        ascending.insert_prefer_lowest(kjv("Gen", 3, 16), synodal("Exod", 4, 17));

        let mut descending = BidirectionalVerseMap::new();
        descending.insert_prefer_lowest(kjv("Gen", 3, 16), synodal("Exod", 4, 17));
        descending.insert_prefer_lowest(kjv("Gen", 3, 16), synodal("Exod", 4, 16));

        for map in [&ascending, &descending] {
            assert_eq!(map.lookup_forward(&kjv("Gen", 3, 16)), Some(&synodal("Exod", 4, 16)));
            assert_eq!(map.lookup_backward(&synodal("Exod", 4, 16)), Some(&kjv("Gen", 3, 16)));
            assert_eq!(map.lookup_backward(&synodal("Exod", 4, 17)), Some(&kjv("Gen", 3, 16)));
        }
    }

    #[test]
    fn test_chapter_outranks_verse() {
        let mut map = BidirectionalVerseMap::new();
        map.insert_prefer_lowest(kjv("Ps", 9, 21), synodal("Ps", 10, 1));
        map.insert_prefer_lowest(kjv("Ps", 9, 21), synodal("Ps", 9, 40));

        assert_eq!(map.lookup_forward(&kjv("Ps", 9, 21)), Some(&synodal("Ps", 9, 40)));
    }

    #[test]
    fn test_directions_resolve_independently() {
        let mut map = BidirectionalVerseMap::new();
        // Gen.3.16 wins forward for itself but loses the backward slot of Exod.4.16
        map.insert_prefer_lowest(kjv("Gen", 3, 16), synodal("Exod", 4, 16));
        map.insert_prefer_lowest(kjv("Gen", 3, 15), synodal("Exod", 4, 16));

        assert_eq!(map.lookup_forward(&kjv("Gen", 3, 16)), Some(&synodal("Exod", 4, 16)));
        assert_eq!(map.lookup_forward(&kjv("Gen", 3, 15)), Some(&synodal("Exod", 4, 16)));
        assert_eq!(map.lookup_backward(&synodal("Exod", 4, 16)), Some(&kjv("Gen", 3, 15)));
    }

    #[test]
    fn test_reinserting_losing_pair_is_noop() {
        let mut map = BidirectionalVerseMap::new();
        map.insert_prefer_lowest(kjv("Gen", 3, 16), synodal("Exod", 4, 16));
        map.insert_prefer_lowest(kjv("Gen", 3, 16), synodal("Exod", 4, 17));
        map.insert_prefer_lowest(kjv("Gen", 3, 16), synodal("Exod", 4, 17));

        assert_eq!(map.lookup_forward(&kjv("Gen", 3, 16)), Some(&synodal("Exod", 4, 16)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.backward_len(), 2);
    }

    #[test]
    fn test_empty_map() {
        let map = BidirectionalVerseMap::new();
        assert!(map.is_empty());
        assert!(map.lookup_backward(&synodal("Gen", 1, 1)).is_none());
    }

    proptest! {
        #[test]
        fn prop_insertion_order_does_not_change_winner(
            targets in proptest::collection::vec((1u32..6, 0u32..30), 1..20)
        ) {
            let source = kjv("Gen", 3, 16);
            let refs: Vec<VerseReference> = targets
                .iter()
                .map(|(chapter, verse)| synodal("Exod", *chapter, *verse))
                .collect();
            let lowest = refs.iter().min_by(|a, b| a.mapping_cmp(b)).unwrap().clone();

            let mut in_order = BidirectionalVerseMap::new();
            for target in &refs {
                in_order.insert_prefer_lowest(source.clone(), target.clone());
            }
            let mut reversed = BidirectionalVerseMap::new();
            for target in refs.iter().rev() {
                reversed.insert_prefer_lowest(source.clone(), target.clone());
            }

            prop_assert_eq!(in_order.lookup_forward(&source), Some(&lowest));
            prop_assert_eq!(reversed.lookup_forward(&source), Some(&lowest));
            for target in &refs {
                prop_assert_eq!(in_order.lookup_backward(target), Some(&source));
            }
        }

        #[test]
        fn prop_backward_keeps_lowest_source(
            sources in proptest::collection::vec((1u32..6, 1u32..30), 1..20)
        ) {
            let target = synodal("Ps", 10, 1);
            let refs: Vec<VerseReference> = sources
                .iter()
                .map(|(chapter, verse)| kjv("Ps", *chapter, *verse))
                .collect();
            let lowest = refs.iter().min_by(|a, b| a.mapping_cmp(b)).unwrap().clone();

            let mut map = BidirectionalVerseMap::new();
            for source in refs.iter().rev() {
                map.insert_prefer_lowest(source.clone(), target.clone());
            }

            prop_assert_eq!(map.lookup_backward(&target), Some(&lowest));
        }
    }
}
