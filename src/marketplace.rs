//! Marketplace operations over the stored collections.
//!
//! Every operation is a read-modify-write of whole collections through a
//! [`CollectionStore`]. Nothing is locked across the cycle, so concurrent
//! writers to the same key race and the last one wins.

use std::sync::Arc;

use chrono::Utc;

use crate::backend::StorageBackend;
use crate::catalog::sample_catalog;
use crate::config::{CartScope, StoreConfig};
use crate::error::{Error, Result};
use crate::key::CollectionKey;
use crate::model::{
    Cart, CartLineItem, ImageRef, OrderId, Product, ProductDraft, ProductFilter, ProductId,
    ProductPatch, ProfileUpdate, Purchase, PurchaseStatus, User, UserId,
};
use crate::observability::StoreMetrics;
use crate::record::{remove_by_id, Record};
use crate::store::CollectionStore;

struct MarketplaceInner<B: StorageBackend> {
    store: CollectionStore<B>,
    config: StoreConfig,
}

/// Data-access facade for the marketplace.
///
/// Cheap to clone: clones share the same store through an `Arc`.
///
/// # Example
///
/// ```
/// use ecofinds_store::backend::InMemoryBackend;
/// use ecofinds_store::Marketplace;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> ecofinds_store::Result<()> {
/// let market = Marketplace::new(InMemoryBackend::new());
///
/// let alice = market.register("alice@example.com", "secret", "alice").await?;
/// let again = market.login("alice@example.com", "secret").await?;
/// assert_eq!(alice.id, again.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Marketplace<B: StorageBackend> {
    inner: Arc<MarketplaceInner<B>>,
}

impl<B: StorageBackend> Marketplace<B> {
    /// Create a marketplace with default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    /// Create a marketplace with custom configuration.
    pub fn with_config(backend: B, config: StoreConfig) -> Self {
        Marketplace {
            inner: Arc::new(MarketplaceInner {
                store: CollectionStore::new(backend),
                config,
            }),
        }
    }

    /// Create a marketplace with custom configuration and metrics.
    pub fn with_metrics(
        backend: B,
        config: StoreConfig,
        metrics: Box<dyn StoreMetrics>,
    ) -> Self {
        Marketplace {
            inner: Arc::new(MarketplaceInner {
                store: CollectionStore::new(backend).with_metrics(metrics),
                config,
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get a reference to the underlying store (for raw collection access).
    pub fn store(&self) -> &CollectionStore<B> {
        &self.inner.store
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Register a new account and make it the session user.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: blank email, password or username
    /// - `Error::DuplicateEmail`: the email already belongs to a user
    pub async fn register(&self, email: &str, password: &str, username: &str) -> Result<User> {
        let email = email.trim();
        let mut users: Vec<User> = self.store().read_collection(CollectionKey::Users).await?;

        if users.iter().any(|u| u.email == email) {
            warn!("Registration rejected: {} already registered", email);
            return Err(Error::DuplicateEmail(email.to_string()));
        }

        let user = User::register(email, password, username)?;
        users.push(user.clone());
        self.store()
            .write_collection(CollectionKey::Users, &users)
            .await?;
        self.store()
            .write_value(CollectionKey::CurrentUser, &user)
            .await?;

        info!("✓ Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Authenticate and make the user the session user.
    ///
    /// # Errors
    ///
    /// `Error::InvalidCredentials` for an unknown email or a wrong password.
    /// Both cases look the same to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        let users: Vec<User> = self.store().read_collection(CollectionKey::Users).await?;

        let user = match users
            .into_iter()
            .find(|u| u.matches_credentials(email, password))
        {
            Some(user) => user,
            None => {
                warn!("Login rejected for {}", email);
                return Err(Error::InvalidCredentials);
            }
        };

        self.store()
            .write_value(CollectionKey::CurrentUser, &user)
            .await?;
        info!("✓ User {} logged in", user.id);
        Ok(user)
    }

    /// Clear the session marker. With a shared cart, the cart goes too.
    pub async fn logout(&self) -> Result<()> {
        self.store().remove(CollectionKey::CurrentUser).await?;
        if self.inner.config.cart_scope == CartScope::Shared {
            self.store().remove(CollectionKey::SharedCart).await?;
        }
        info!("✓ Logged out");
        Ok(())
    }

    /// The session user, if anyone is signed in.
    pub async fn current_user(&self) -> Result<Option<User>> {
        self.store().read_value(CollectionKey::CurrentUser).await
    }

    /// Edit a user's profile.
    ///
    /// The new username is copied onto every listing the user owns, and the
    /// session marker is refreshed when it holds this user.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: blank username or email
    /// - `Error::NotFound`: no such user
    /// - `Error::DuplicateEmail`: email belongs to another user
    pub async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<User> {
        update.validate()?;

        let mut users: Vec<User> = self.store().read_collection(CollectionKey::Users).await?;
        let index = users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| Error::user_not_found(user_id))?;

        let new_email = update.email.trim();
        if users.iter().any(|u| u.id != user_id && u.email == new_email) {
            warn!("Profile update rejected: {} already registered", new_email);
            return Err(Error::DuplicateEmail(new_email.to_string()));
        }

        update.apply_to(&mut users[index]);
        let user = users[index].clone();

        self.store()
            .write_collection(CollectionKey::Users, &users)
            .await?;

        let session: Option<User> = self.current_user().await?;
        if session.is_some_and(|s| s.id == user_id) {
            self.store()
                .write_value(CollectionKey::CurrentUser, &user)
                .await?;
        }

        let relabelled = self.backfill_owner_username(&user).await?;
        info!(
            "✓ Updated profile of {} ({} listing(s) relabelled)",
            user.id, relabelled
        );
        Ok(user)
    }

    async fn backfill_owner_username(&self, user: &User) -> Result<usize> {
        let mut products: Vec<Product> =
            self.store().read_collection(CollectionKey::Products).await?;

        let mut changed = 0;
        for product in products
            .iter_mut()
            .filter(|p| p.owner_id == user.id && p.owner_username != user.username)
        {
            product.owner_username = user.username.clone();
            changed += 1;
        }

        if changed > 0 {
            self.store()
                .write_collection(CollectionKey::Products, &products)
                .await?;
        }
        Ok(changed)
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    /// Listings matching `filter`. The stored collection is never modified.
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        let products: Vec<Product> = self.store().read_collection(CollectionKey::Products).await?;
        let matched = filter.apply(&products);
        debug!("Listed {} of {} product(s)", matched.len(), products.len());
        Ok(matched)
    }

    /// Publish a new listing owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: blank title or description, non-positive price
    /// - `Error::NotFound`: no such owner
    pub async fn create_product(&self, owner_id: UserId, draft: ProductDraft) -> Result<Product> {
        let users: Vec<User> = self.store().read_collection(CollectionKey::Users).await?;
        let owner = users
            .iter()
            .find(|u| u.id == owner_id)
            .ok_or_else(|| Error::user_not_found(owner_id))?;

        let product = draft.into_product(owner)?;

        let mut products: Vec<Product> =
            self.store().read_collection(CollectionKey::Products).await?;
        products.push(product.clone());
        self.store()
            .write_collection(CollectionKey::Products, &products)
            .await?;

        info!("✓ Created product {} ({})", product.title, product.id);
        Ok(product)
    }

    /// Merge `patch` into an existing listing.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: no listing with this id (it is never re-created)
    /// - `Error::ValidationError`: the merged listing is invalid
    pub async fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<Product> {
        let mut products: Vec<Product> =
            self.store().read_collection(CollectionKey::Products).await?;

        let slot = match products.iter_mut().find(|p| p.id == id) {
            Some(slot) => slot,
            None => {
                warn!("Update rejected: product {} not found", id);
                return Err(Error::product_not_found(id));
            }
        };

        let mut updated = slot.clone();
        patch.apply_to(&mut updated);
        updated.validate()?;
        *slot = updated.clone();

        self.store()
            .write_collection(CollectionKey::Products, &products)
            .await?;

        info!("✓ Updated product {}", id);
        Ok(updated)
    }

    /// Remove a listing. Removing an unknown id is a no-op.
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        let mut products: Vec<Product> =
            self.store().read_collection(CollectionKey::Products).await?;

        if remove_by_id(&mut products, &id) == 0 {
            debug!("Delete of unknown product {} ignored", id);
            return Ok(());
        }

        self.store()
            .write_collection(CollectionKey::Products, &products)
            .await?;
        info!("✓ Deleted product {}", id);
        Ok(())
    }

    /// Install the sample catalog if `products` has never been written.
    /// Returns how many listings were added.
    pub async fn seed_sample_catalog(&self) -> Result<usize> {
        if self.store().exists(CollectionKey::Products).await? {
            return Ok(0);
        }

        let catalog = sample_catalog();
        self.store()
            .write_collection(CollectionKey::Products, &catalog)
            .await?;
        info!("✓ Seeded {} sample product(s)", catalog.len());
        Ok(catalog.len())
    }

    /// Encode an uploaded image, enforcing the configured size limit.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: not an `image/*` content type
    /// - `Error::OversizedUpload`: larger than `max_upload_bytes`
    pub fn image_from_upload(&self, content_type: &str, bytes: &[u8]) -> Result<ImageRef> {
        ImageRef::from_upload(content_type, bytes, self.inner.config.max_upload_bytes).map_err(
            |e| {
                warn!("Upload rejected: {}", e);
                e
            },
        )
    }

    // ------------------------------------------------------------------
    // Cart
    // ------------------------------------------------------------------

    fn cart_key(&self, user_id: UserId) -> CollectionKey {
        self.inner.config.cart_scope.cart_key(user_id)
    }

    /// The user's cart (empty if never written).
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart> {
        let items: Vec<CartLineItem> = self
            .store()
            .read_collection(self.cart_key(user_id))
            .await?;
        Ok(Cart::from_items(items))
    }

    /// Add one unit of `product` to the user's cart.
    ///
    /// # Errors
    ///
    /// `Error::ValidationError` if the user owns the listing.
    pub async fn add_to_cart(&self, user_id: UserId, product: &Product) -> Result<Cart> {
        if !product.can_be_added_by(user_id) {
            warn!("User {} tried to add own listing {} to cart", user_id, product.id);
            return Err(Error::ValidationError(
                "cannot add your own listing to the cart".to_string(),
            ));
        }

        let mut cart = self.get_cart(user_id).await?;
        cart.add(product);
        self.write_cart(user_id, &cart).await?;

        debug!("Cart of {} now holds {} unit(s)", user_id, cart.item_count());
        Ok(cart)
    }

    /// Drop the line for `product_id`. An absent line leaves the cart as is.
    pub async fn remove_from_cart(&self, user_id: UserId, product_id: ProductId) -> Result<Cart> {
        let mut cart = self.get_cart(user_id).await?;
        if cart.remove(&product_id) {
            self.write_cart(user_id, &cart).await?;
        }
        Ok(cart)
    }

    /// Empty the user's cart.
    pub async fn clear_cart(&self, user_id: UserId) -> Result<()> {
        self.write_cart(user_id, &Cart::new()).await
    }

    async fn write_cart(&self, user_id: UserId, cart: &Cart) -> Result<()> {
        self.store()
            .write_collection(self.cart_key(user_id), cart.items())
            .await
    }

    // ------------------------------------------------------------------
    // Checkout
    // ------------------------------------------------------------------

    /// Turn every line of `cart` into a purchase record for `buyer_id`.
    ///
    /// Steps, each persisted on its own: append the purchases, remove the
    /// bought listings from `products`, clear the buyer's cart. A failure
    /// between steps leaves the earlier writes in place.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError`: empty cart
    /// - `Error::NotFound`: no such buyer
    pub async fn checkout(&self, cart: &Cart, buyer_id: UserId) -> Result<Vec<Purchase>> {
        if cart.is_empty() {
            warn!("Checkout rejected: empty cart for {}", buyer_id);
            return Err(Error::ValidationError("cart is empty".to_string()));
        }

        let users: Vec<User> = self.store().read_collection(CollectionKey::Users).await?;
        let buyer = users
            .iter()
            .find(|u| u.id == buyer_id)
            .ok_or_else(|| Error::user_not_found(buyer_id))?;

        let order_id = OrderId::generate();
        let purchase_date = Utc::now();
        let shipping_address = Some(buyer.address.clone()).filter(|a| !a.is_empty());

        let new_purchases: Vec<Purchase> = cart
            .items()
            .iter()
            .map(|item| Purchase {
                item: item.clone(),
                buyer_id,
                order_id,
                purchase_date,
                status: PurchaseStatus::Pending,
                shipping_address: shipping_address.clone(),
            })
            .collect();

        let mut purchases: Vec<Purchase> =
            self.store().read_collection(CollectionKey::Purchases).await?;
        purchases.extend(new_purchases.iter().cloned());
        self.store()
            .write_collection(CollectionKey::Purchases, &purchases)
            .await?;

        let mut products: Vec<Product> =
            self.store().read_collection(CollectionKey::Products).await?;
        products.retain(|p| !cart.contains(&p.id));
        self.store()
            .write_collection(CollectionKey::Products, &products)
            .await?;

        self.clear_cart(buyer_id).await?;

        info!(
            "✓ Checkout of order {} by {}: {} item(s), total {}",
            order_id,
            buyer_id,
            new_purchases.len(),
            cart.total()
        );
        Ok(new_purchases)
    }

    /// Purchase records of `buyer_id`, in the order they were written.
    pub async fn purchases_for(&self, buyer_id: UserId) -> Result<Vec<Purchase>> {
        let purchases: Vec<Purchase> =
            self.store().read_collection(CollectionKey::Purchases).await?;
        Ok(purchases
            .into_iter()
            .filter(|p| p.buyer_id == buyer_id)
            .collect())
    }
}
