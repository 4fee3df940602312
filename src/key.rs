//! Storage key layout.

use std::fmt;

use crate::error::{Error, Result};
use crate::model::UserId;

/// Prefix of per-user cart keys.
const USER_CART_PREFIX: &str = "cart_";

/// Every key the marketplace reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    /// `users`: list of User
    Users,
    /// `products`: list of Product
    Products,
    /// `purchases`: list of Purchase
    Purchases,
    /// `cart`: the single device-wide cart
    SharedCart,
    /// `cart_<userId>`: one cart per user
    UserCart(UserId),
    /// `currentUser`: the signed-in user (a single record, not a list)
    CurrentUser,
}

impl CollectionKey {
    /// Build the storage key string.
    pub fn storage_key(&self) -> String {
        match self {
            CollectionKey::Users => "users".to_string(),
            CollectionKey::Products => "products".to_string(),
            CollectionKey::Purchases => "purchases".to_string(),
            CollectionKey::SharedCart => "cart".to_string(),
            CollectionKey::UserCart(id) => format!("{}{}", USER_CART_PREFIX, id),
            CollectionKey::CurrentUser => "currentUser".to_string(),
        }
    }

    /// Parse a storage key back into its layout entry.
    ///
    /// # Errors
    ///
    /// `Error::ValidationError` for keys outside the layout.
    pub fn parse(key: &str) -> Result<Self> {
        match key {
            "users" => Ok(CollectionKey::Users),
            "products" => Ok(CollectionKey::Products),
            "purchases" => Ok(CollectionKey::Purchases),
            "cart" => Ok(CollectionKey::SharedCart),
            "currentUser" => Ok(CollectionKey::CurrentUser),
            other => match other.strip_prefix(USER_CART_PREFIX) {
                Some(id) => Ok(CollectionKey::UserCart(id.parse()?)),
                None => Err(Error::ValidationError(format!(
                    "unknown collection key: {}",
                    other
                ))),
            },
        }
    }

    /// True for keys holding a list (everything except the session marker).
    pub fn is_list(&self) -> bool {
        !matches!(self, CollectionKey::CurrentUser)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}
