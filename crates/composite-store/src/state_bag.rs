//! Sub-state registry keyed by a stable tag
//!
//! For applications whose set of sub-states is not known statically. Each
//! slot is addressed by a tag value (usually a fieldless enum) and holds one
//! value; a bag never contains an empty slot. Bags are immutable: replacing a
//! sub-state builds a new bag.

use crate::error::StoreError;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct StateBag<K: Ord, V> {
    slots: Arc<BTreeMap<K, V>>,
}

impl<K, V> StateBag<K, V>
where
    K: Ord + Copy + Debug,
    V: Clone,
{
    /// Build a bag from `(tag, value)` pairs
    ///
    /// Fails on the first slot without a value instead of dropping it.
    pub fn new<I>(entries: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        let mut slots = BTreeMap::new();
        for (kind, value) in entries {
            let value = value.ok_or_else(|| StoreError::MissingSubState(format!("{:?}", kind)))?;
            slots.insert(kind, value);
        }
        Ok(Self {
            slots: Arc::new(slots),
        })
    }

    pub fn get(&self, kind: K) -> Option<&V> {
        self.slots.get(&kind)
    }

    pub fn contains(&self, kind: K) -> bool {
        self.slots.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.slots.keys().copied()
    }

    /// New bag with one slot replaced (or added)
    pub fn with(&self, kind: K, value: V) -> Self {
        self.replace([(kind, Some(value))])
    }

    /// New bag with the given slots merged in; `None` removes a slot
    pub fn replace<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        let mut slots = self.slots.as_ref().clone();
        for (kind, value) in entries {
            match value {
                Some(value) => {
                    slots.insert(kind, value);
                }
                None => {
                    slots.remove(&kind);
                }
            }
        }
        Self {
            slots: Arc::new(slots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Kind {
        Call,
        Permissions,
        Navigation,
    }

    #[test]
    fn test_absent_value_fails_construction() {
        let result: Result<StateBag<Kind, &str>, _> = StateBag::new([
            (Kind::Call, Some("connected")),
            (Kind::Permissions, None),
        ]);

        assert_eq!(
            result,
            Err(StoreError::MissingSubState("Permissions".to_string()))
        );
    }

    #[test]
    fn test_with_replaces_one_slot_and_keeps_original() {
        let bag = StateBag::new([
            (Kind::Call, Some("connecting")),
            (Kind::Navigation, Some("setup")),
        ])
        .unwrap();

        let updated = bag.with(Kind::Call, "connected");

        assert_eq!(updated.get(Kind::Call), Some(&"connected"));
        assert_eq!(updated.get(Kind::Navigation), Some(&"setup"));
        assert_eq!(bag.get(Kind::Call), Some(&"connecting"));
    }

    #[test]
    fn test_replace_removes_absent_entries() {
        let bag = StateBag::new([
            (Kind::Call, Some(1)),
            (Kind::Permissions, Some(2)),
        ])
        .unwrap();

        let updated = bag.replace([(Kind::Permissions, None), (Kind::Navigation, Some(3))]);

        assert!(!updated.contains(Kind::Permissions));
        assert_eq!(updated.kinds().collect::<Vec<_>>(), vec![Kind::Call, Kind::Navigation]);
        assert_eq!(updated.len(), 2);
    }
}
