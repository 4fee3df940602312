//! Core record trait that every stored collection element implements.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::hash::Hash;

/// Trait that all records stored in a collection must implement.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use ecofinds_store::Record;
///
/// #[derive(Clone, Serialize, Deserialize)]
/// pub struct Review {
///     pub id: String,
///     pub stars: u8,
/// }
///
/// impl Record for Review {
///     type Id = String;
///
///     fn record_id(&self) -> Self::Id {
///         self.id.clone()
///     }
///
///     fn entity_name() -> &'static str {
///         "review"
///     }
/// }
/// ```
pub trait Record: Send + Sync + Serialize + DeserializeOwned + Clone {
    /// Type of the record's id.
    type Id: Display + Clone + Send + Sync + Eq + Hash + 'static;

    /// Return the record's id.
    ///
    /// Collections hold at most one record per id; lookups, merges and
    /// removals all go through this.
    fn record_id(&self) -> Self::Id;

    /// Entity kind used in logs and `Error::NotFound`.
    fn entity_name() -> &'static str;

    /// Optional: validate the record before it is written.
    ///
    /// `CollectionStore::write_collection` refuses the whole write if any
    /// record fails.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Find a record by id in a decoded collection.
pub fn find_by_id<'a, T: Record>(records: &'a [T], id: &T::Id) -> Option<&'a T> {
    records.iter().find(|r| &r.record_id() == id)
}

/// Remove every record with the given id. Returns how many were removed.
pub fn remove_by_id<T: Record>(records: &mut Vec<T>, id: &T::Id) -> usize {
    let before = records.len();
    records.retain(|r| &r.record_id() != id);
    before - records.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Serialize, Deserialize)]
    struct TestRecord {
        id: u32,
        value: String,
    }

    impl Record for TestRecord {
        type Id = u32;

        fn record_id(&self) -> Self::Id {
            self.id
        }

        fn entity_name() -> &'static str {
            "test"
        }
    }

    fn records() -> Vec<TestRecord> {
        vec![
            TestRecord {
                id: 1,
                value: "a".to_string(),
            },
            TestRecord {
                id: 2,
                value: "b".to_string(),
            },
        ]
    }

    #[test]
    fn test_find_by_id() {
        let records = records();
        assert_eq!(
            find_by_id(&records, &2).map(|r| r.value.as_str()),
            Some("b")
        );
        assert!(find_by_id(&records, &3).is_none());
    }

    #[test]
    fn test_remove_by_id() {
        let mut records = records();
        assert_eq!(remove_by_id(&mut records, &1), 1);
        assert_eq!(remove_by_id(&mut records, &1), 0);
        assert_eq!(records.len(), 1);
        assert_eq!(TestRecord::entity_name(), "test");
    }
}
