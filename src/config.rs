//! Runtime configuration for the marketplace store and the mock API.
//!
//! Built with chained `with_*` calls, or read from the environment:
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `ECOFINDS_CART_SCOPE` | `per_user`, `shared` | `per_user` |
//! | `ECOFINDS_MAX_UPLOAD_BYTES` | integer | 5 MiB |
//! | `ECOFINDS_SEED_CATALOG` | `true`, `false` | `true` |
//! | `ECOFINDS_SIMULATED_LATENCY` | `default`, `off`, milliseconds | `default` |
//!
//! ```
//! use ecofinds_store::config::{CartScope, LatencyPolicy, StoreConfig};
//!
//! let config = StoreConfig::default()
//!     .with_cart_scope(CartScope::Shared)
//!     .with_latency(LatencyPolicy::None);
//! assert_eq!(config.cart_scope, CartScope::Shared);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::key::CollectionKey;
use crate::model::UserId;

/// Upload limit for listing images (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Which key holds a user's cart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CartScope {
    /// One cart per user under `cart_<userId>`.
    #[default]
    PerUser,
    /// A single device-wide cart under `cart`, cleared on logout.
    Shared,
}

impl CartScope {
    /// Storage key of `user_id`'s cart under this scope.
    pub fn cart_key(&self, user_id: UserId) -> CollectionKey {
        match self {
            CartScope::PerUser => CollectionKey::UserCart(user_id),
            CartScope::Shared => CollectionKey::SharedCart,
        }
    }
}

impl FromStr for CartScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_user" | "per-user" | "peruser" => Ok(CartScope::PerUser),
            "shared" => Ok(CartScope::Shared),
            other => Err(Error::ConfigError(format!(
                "invalid cart scope '{}': expected 'per_user' or 'shared'",
                other
            ))),
        }
    }
}

/// Calls exposed by the mock API, used to look up simulated latency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    Register,
    Login,
    GetProducts,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    GetCart,
    AddToCart,
    RemoveFromCart,
    ClearCart,
    Checkout,
    GetPurchases,
    UpdateProfile,
}

impl ApiOperation {
    pub const ALL: [ApiOperation; 13] = [
        ApiOperation::Register,
        ApiOperation::Login,
        ApiOperation::GetProducts,
        ApiOperation::CreateProduct,
        ApiOperation::UpdateProduct,
        ApiOperation::DeleteProduct,
        ApiOperation::GetCart,
        ApiOperation::AddToCart,
        ApiOperation::RemoveFromCart,
        ApiOperation::ClearCart,
        ApiOperation::Checkout,
        ApiOperation::GetPurchases,
        ApiOperation::UpdateProfile,
    ];

    /// Round-trip delay the mock server simulates for this call.
    pub fn default_delay(&self) -> Duration {
        let ms = match self {
            ApiOperation::Register | ApiOperation::Login => 500,
            ApiOperation::GetProducts => 300,
            ApiOperation::CreateProduct | ApiOperation::UpdateProduct => 500,
            ApiOperation::DeleteProduct => 300,
            ApiOperation::GetCart => 200,
            ApiOperation::AddToCart => 300,
            ApiOperation::RemoveFromCart | ApiOperation::ClearCart => 200,
            ApiOperation::Checkout => 1000,
            ApiOperation::GetPurchases => 300,
            ApiOperation::UpdateProfile => 500,
        };
        Duration::from_millis(ms)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiOperation::Register => "register",
            ApiOperation::Login => "login",
            ApiOperation::GetProducts => "get_products",
            ApiOperation::CreateProduct => "create_product",
            ApiOperation::UpdateProduct => "update_product",
            ApiOperation::DeleteProduct => "delete_product",
            ApiOperation::GetCart => "get_cart",
            ApiOperation::AddToCart => "add_to_cart",
            ApiOperation::RemoveFromCart => "remove_from_cart",
            ApiOperation::ClearCart => "clear_cart",
            ApiOperation::Checkout => "checkout",
            ApiOperation::GetPurchases => "get_purchases",
            ApiOperation::UpdateProfile => "update_profile",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulated network latency for `MockApi` calls.
#[derive(Clone, Debug, Default)]
pub enum LatencyPolicy {
    /// Per-operation delays of the mock server
    #[default]
    Default,

    /// Same delay for every call
    Fixed(Duration),

    /// No delay
    None,

    /// Custom per-operation policy
    PerOperation(fn(ApiOperation) -> Duration),
}

impl LatencyPolicy {
    /// Delay to sleep before `operation`.
    pub fn delay_for(&self, operation: ApiOperation) -> Duration {
        match self {
            LatencyPolicy::Default => operation.default_delay(),
            LatencyPolicy::Fixed(d) => *d,
            LatencyPolicy::None => Duration::ZERO,
            LatencyPolicy::PerOperation(f) => f(operation),
        }
    }
}

impl FromStr for LatencyPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(LatencyPolicy::Default),
            "off" | "none" | "0" => Ok(LatencyPolicy::None),
            other => other
                .parse::<u64>()
                .map(|ms| LatencyPolicy::Fixed(Duration::from_millis(ms)))
                .map_err(|_| {
                    Error::ConfigError(format!(
                        "invalid simulated latency '{}': expected 'default', 'off' or milliseconds",
                        other
                    ))
                }),
        }
    }
}

/// Store and mock API settings.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Where carts live.
    pub cart_scope: CartScope,

    /// Largest image upload accepted by `ImageRef::from_upload`.
    pub max_upload_bytes: usize,

    /// Install the sample catalog when `products` has never been written.
    pub seed_catalog: bool,

    /// Simulated latency of `MockApi` calls.
    pub latency: LatencyPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            cart_scope: CartScope::PerUser,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            seed_catalog: true,
            latency: LatencyPolicy::Default,
        }
    }
}

impl StoreConfig {
    pub fn with_cart_scope(mut self, scope: CartScope) -> Self {
        self.cart_scope = scope;
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn with_seed_catalog(mut self, seed: bool) -> Self {
        self.seed_catalog = seed;
        self
    }

    pub fn with_latency(mut self, latency: LatencyPolicy) -> Self {
        self.latency = latency;
        self
    }

    /// Read settings from `ECOFINDS_*` environment variables. Unset
    /// variables keep their defaults.
    ///
    /// # Errors
    ///
    /// `Error::ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(scope) = lookup("ECOFINDS_CART_SCOPE") {
            config.cart_scope = scope.parse()?;
        }

        if let Some(limit) = lookup("ECOFINDS_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = limit.trim().parse().map_err(|_| {
                Error::ConfigError(format!("invalid ECOFINDS_MAX_UPLOAD_BYTES '{}'", limit))
            })?;
        }

        if let Some(seed) = lookup("ECOFINDS_SEED_CATALOG") {
            config.seed_catalog = parse_flag(&seed).ok_or_else(|| {
                Error::ConfigError(format!("invalid ECOFINDS_SEED_CATALOG '{}'", seed))
            })?;
        }

        if let Some(latency) = lookup("ECOFINDS_SIMULATED_LATENCY") {
            config.latency = latency.parse()?;
        }

        debug!("Loaded store config: {:?}", config);
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.cart_scope, CartScope::PerUser);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.seed_catalog);
        assert_eq!(
            config.latency.delay_for(ApiOperation::Checkout),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_from_lookup_empty_is_default() {
        let config = StoreConfig::from_lookup(lookup(&[])).expect("Failed to load config");
        assert_eq!(config.cart_scope, CartScope::PerUser);
        assert!(config.seed_catalog);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("ECOFINDS_CART_SCOPE", "shared"),
            ("ECOFINDS_MAX_UPLOAD_BYTES", "1024"),
            ("ECOFINDS_SEED_CATALOG", "false"),
            ("ECOFINDS_SIMULATED_LATENCY", "25"),
        ]))
        .expect("Failed to load config");

        assert_eq!(config.cart_scope, CartScope::Shared);
        assert_eq!(config.max_upload_bytes, 1024);
        assert!(!config.seed_catalog);
        assert_eq!(
            config.latency.delay_for(ApiOperation::Login),
            Duration::from_millis(25)
        );
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = StoreConfig::from_lookup(lookup(&[("ECOFINDS_CART_SCOPE", "global")]));
        assert!(matches!(err, Err(Error::ConfigError(_))));

        let err = StoreConfig::from_lookup(lookup(&[("ECOFINDS_SIMULATED_LATENCY", "fast")]));
        assert!(matches!(err, Err(Error::ConfigError(_))));

        let err = StoreConfig::from_lookup(lookup(&[("ECOFINDS_SEED_CATALOG", "maybe")]));
        assert!(matches!(err, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_latency_policies() {
        assert_eq!(LatencyPolicy::None.delay_for(ApiOperation::Checkout), Duration::ZERO);
        assert_eq!(
            "off".parse::<LatencyPolicy>()
                .expect("parse")
                .delay_for(ApiOperation::Register),
            Duration::ZERO
        );

        let policy = LatencyPolicy::PerOperation(|op| match op {
            ApiOperation::Checkout => Duration::from_millis(5),
            _ => Duration::from_millis(1),
        });
        assert_eq!(policy.delay_for(ApiOperation::Checkout), Duration::from_millis(5));
        assert_eq!(policy.delay_for(ApiOperation::GetCart), Duration::from_millis(1));
    }

    #[test]
    fn test_default_delays_table() {
        let ms = |op: ApiOperation| op.default_delay().as_millis();
        assert_eq!(ms(ApiOperation::Register), 500);
        assert_eq!(ms(ApiOperation::GetProducts), 300);
        assert_eq!(ms(ApiOperation::GetCart), 200);
        assert_eq!(ms(ApiOperation::AddToCart), 300);
        assert_eq!(ms(ApiOperation::Checkout), 1000);
        assert_eq!(ms(ApiOperation::UpdateProfile), 500);
        assert_eq!(ApiOperation::ALL.len(), 13);
    }

    #[test]
    fn test_cart_key_by_scope() {
        let id = UserId::generate();
        assert_eq!(CartScope::PerUser.cart_key(id), CollectionKey::UserCart(id));
        assert_eq!(CartScope::Shared.cart_key(id), CollectionKey::SharedCart);
    }
}
