//! Key → visual element handles.
//!
//! The host mounts one element per stack item.  Identity is the item key,
//! never its position, so a rebuilt deck keeps each card's handle (and its
//! last render) even when indices shift.

use std::collections::{HashMap, HashSet};

use super::simulator::CardRender;
use super::stack::StackItem;

/// The engine-side handle for one mounted card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardElement {
    /// Parameters from the most recent frame; `None` until the first frame.
    pub render: Option<CardRender>,
}

#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: HashMap<String, CardElement>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount keys that appeared and unmount keys that left.  Returns
    /// `(mounted, unmounted)` counts.
    pub fn sync(&mut self, items: &[StackItem]) -> (usize, usize) {
        let live: HashSet<&str> = items.iter().map(StackItem::key).collect();

        let before = self.elements.len();
        self.elements.retain(|key, _| live.contains(key.as_str()));
        let unmounted = before - self.elements.len();

        let mut mounted = 0;
        for key in live {
            if !self.elements.contains_key(key) {
                self.elements.insert(key.to_string(), CardElement::default());
                mounted += 1;
            }
        }
        (mounted, unmounted)
    }

    pub fn get(&self, key: &str) -> Option<&CardElement> {
        self.elements.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut CardElement> {
        self.elements.get_mut(key)
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.elements.contains_key(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::note::Note;
    use crate::core::stack::build_stack;

    #[test]
    fn sync_is_incremental_and_keyed() {
        let mut reg = ElementRegistry::new();
        let notes = vec![Note::new("b", "", 2), Note::new("a", "", 1)];
        assert_eq!(reg.sync(&build_stack(&notes)), (12, 0));

        reg.get_mut("a").unwrap().render = Some(CardRender::default());

        // A new newest note shifts every index and consumes a filler.
        let notes = vec![Note::new("c", "", 3), Note::new("b", "", 2), Note::new("a", "", 1)];
        assert_eq!(reg.sync(&build_stack(&notes)), (1, 1));
        assert!(reg.get("a").unwrap().render.is_some());
        assert!(!reg.contains("empty-9"));
        assert_eq!(reg.len(), 12);
    }
}
