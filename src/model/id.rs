//! Newtype ids for type-safe record references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Defines a UUID-backed id newtype.
///
/// Fresh ids are UUIDv7, so they sort by creation time and two records
/// created within the same millisecond still get distinct ids.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new time-ordered id.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|e| {
                    Error::ValidationError(format!("invalid {} id {:?}: {}", $entity, s, e))
                })
            }
        }
    };
}

define_id!(
    /// Identifies a registered user.
    UserId,
    "user"
);

define_id!(
    /// Identifies a product listing.
    ProductId,
    "product"
);

define_id!(
    /// Groups the purchase records written by one checkout.
    OrderId,
    "order"
);

impl UserId {
    /// Owner of the built-in sample catalog.
    pub const SAMPLE: UserId = UserId(Uuid::nil());
}
