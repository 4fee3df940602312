//! Promise-style mock API with simulated network latency.
//!
//! Each call sleeps for the delay its [`ApiOperation`] gets from the
//! configured [`LatencyPolicy`](crate::config::LatencyPolicy), then delegates
//! to [`Marketplace`]. Nothing is retried and nothing times out.

use serde::{Deserialize, Serialize};

use crate::backend::StorageBackend;
use crate::config::ApiOperation;
use crate::error::Result;
use crate::marketplace::Marketplace;
use crate::model::{
    Cart, Product, ProductDraft, ProductFilter, ProductId, ProductPatch, ProfileUpdate, Purchase,
    User, UserId,
};

/// Result of a successful register or login.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl AuthSession {
    fn for_user(user: User) -> Self {
        let token = format!("mock-token-{}", user.id);
        AuthSession { user, token }
    }
}

/// Simulated remote API over a [`Marketplace`].
///
/// ```
/// use ecofinds_store::backend::InMemoryBackend;
/// use ecofinds_store::config::{LatencyPolicy, StoreConfig};
/// use ecofinds_store::{Marketplace, MockApi};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> ecofinds_store::Result<()> {
/// let config = StoreConfig::default().with_latency(LatencyPolicy::None);
/// let api = MockApi::new(Marketplace::with_config(InMemoryBackend::new(), config));
///
/// let session = api.register("a@example.com", "pw", "alice").await?;
/// assert!(session.token.starts_with("mock-token-"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MockApi<B: StorageBackend> {
    market: Marketplace<B>,
}

impl<B: StorageBackend> MockApi<B> {
    pub fn new(market: Marketplace<B>) -> Self {
        MockApi { market }
    }

    pub fn marketplace(&self) -> &Marketplace<B> {
        &self.market
    }

    async fn simulate(&self, operation: ApiOperation) {
        let delay = self.market.config().latency.delay_for(operation);
        debug!("» {} (simulated latency {:?})", operation, delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<AuthSession> {
        self.simulate(ApiOperation::Register).await;
        let user = self.market.register(email, password, username).await?;
        Ok(AuthSession::for_user(user))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.simulate(ApiOperation::Login).await;
        let user = self.market.login(email, password).await?;
        Ok(AuthSession::for_user(user))
    }

    /// Browse listings. Installs the sample catalog first when
    /// `seed_catalog` is enabled and nothing has been stored yet.
    pub async fn get_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        self.simulate(ApiOperation::GetProducts).await;
        if self.market.config().seed_catalog {
            self.market.seed_sample_catalog().await?;
        }
        self.market.list_products(filter).await
    }

    pub async fn create_product(&self, owner_id: UserId, draft: ProductDraft) -> Result<Product> {
        self.simulate(ApiOperation::CreateProduct).await;
        self.market.create_product(owner_id, draft).await
    }

    pub async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<Product> {
        self.simulate(ApiOperation::UpdateProduct).await;
        self.market.update_product(id, patch).await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.simulate(ApiOperation::DeleteProduct).await;
        self.market.delete_product(id).await
    }

    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart> {
        self.simulate(ApiOperation::GetCart).await;
        self.market.get_cart(user_id).await
    }

    pub async fn add_to_cart(&self, user_id: UserId, product: &Product) -> Result<Cart> {
        self.simulate(ApiOperation::AddToCart).await;
        self.market.add_to_cart(user_id, product).await
    }

    pub async fn remove_from_cart(&self, user_id: UserId, product_id: ProductId) -> Result<Cart> {
        self.simulate(ApiOperation::RemoveFromCart).await;
        self.market.remove_from_cart(user_id, product_id).await
    }

    pub async fn clear_cart(&self, user_id: UserId) -> Result<()> {
        self.simulate(ApiOperation::ClearCart).await;
        self.market.clear_cart(user_id).await
    }

    /// Checks out the user's stored cart.
    pub async fn checkout(&self, user_id: UserId) -> Result<Vec<Purchase>> {
        self.simulate(ApiOperation::Checkout).await;
        let cart = self.market.get_cart(user_id).await?;
        self.market.checkout(&cart, user_id).await
    }

    pub async fn get_purchases(&self, user_id: UserId) -> Result<Vec<Purchase>> {
        self.simulate(ApiOperation::GetPurchases).await;
        self.market.purchases_for(user_id).await
    }

    pub async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<User> {
        self.simulate(ApiOperation::UpdateProfile).await;
        self.market.update_profile(user_id, update).await
    }
}
