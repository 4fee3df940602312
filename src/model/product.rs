//! Product listings, their images, and listing filters.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, UserId};
use super::user::User;
use crate::error::{Error, Result};
use crate::record::Record;

/// Fixed set of listing categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    Books,
    Furniture,
    Sports,
    Toys,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Clothing,
        Category::Books,
        Category::Furniture,
        Category::Sports,
        Category::Toys,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Books => "Books",
            Category::Furniture => "Furniture",
            Category::Sports => "Sports",
            Category::Toys => "Toys",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::ValidationError(format!("unknown category: {}", s)))
    }
}

const IMAGE_EXTENSIONS: [&str; 5] = [".jpeg", ".jpg", ".gif", ".png", ".webp"];

/// A product image: a URL (absolute or relative) or an embedded data URI.
///
/// Both variants are stored as a single string field, so the JSON layout
/// does not reveal which one it is until parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageRef {
    /// `https://...`, `http://...` or a relative asset path such as `phone1.png`.
    Url(String),
    /// `data:image/<type>;base64,<payload>`
    DataUri(String),
}

impl ImageRef {
    /// Parse and validate an image reference.
    ///
    /// URLs must use http(s) when they carry a scheme and must end in a
    /// known image extension. Data URIs must be base64-encoded `image/*`.
    ///
    /// # Errors
    ///
    /// `Error::ValidationError` for a malformed reference.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(Error::ValidationError("image reference is empty".to_string()));
        }

        if value.starts_with("data:") {
            Self::parse_data_uri(value)
        } else {
            Self::parse_url(value)
        }
    }

    /// Encode an uploaded file as a data URI.
    ///
    /// # Errors
    ///
    /// - `Error::ValidationError` if `content_type` is not a bare `image/<subtype>`
    /// - `Error::OversizedUpload` if `bytes` exceeds `limit`
    pub fn from_upload(content_type: &str, bytes: &[u8], limit: usize) -> Result<Self> {
        if !content_type.starts_with("image/") {
            return Err(Error::ValidationError(
                "please upload an image file".to_string(),
            ));
        }
        if bytes.len() > limit {
            return Err(Error::OversizedUpload {
                size: bytes.len(),
                limit,
            });
        }

        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        ImageRef::parse_data_uri(&format!("data:{};base64,{}", content_type, payload)).map_err(
            |_| Error::ValidationError(format!("unsupported image type: {:?}", content_type)),
        )
    }

    /// Re-check a reference built without [`ImageRef::parse`].
    ///
    /// # Errors
    ///
    /// `Error::ValidationError` if the string is malformed or does not match
    /// its variant.
    pub fn validate(&self) -> Result<()> {
        let parsed = ImageRef::parse(self.as_str())?;
        if parsed.is_embedded() != self.is_embedded() {
            return Err(Error::ValidationError(format!(
                "image reference has the wrong kind: {:?}",
                self.as_str()
            )));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageRef::Url(s) | ImageRef::DataUri(s) => s,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, ImageRef::DataUri(_))
    }

    fn parse_url(value: &str) -> Result<Self> {
        if value.chars().any(char::is_whitespace) {
            return Err(Error::ValidationError(format!(
                "image URL contains whitespace: {:?}",
                value
            )));
        }

        if let Some((scheme, rest)) = value.split_once("://") {
            let scheme = scheme.to_ascii_lowercase();
            if (scheme != "http" && scheme != "https") || rest.is_empty() {
                return Err(Error::ValidationError(format!(
                    "image URL must be http(s): {:?}",
                    value
                )));
            }
        }

        let lower = value.to_ascii_lowercase();
        if !IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return Err(Error::ValidationError(format!(
                "image URL must end in .jpeg, .jpg, .gif, .png or .webp: {:?}",
                value
            )));
        }

        Ok(ImageRef::Url(value.to_string()))
    }

    fn parse_data_uri(value: &str) -> Result<Self> {
        let malformed = || Error::ValidationError("malformed image data URI".to_string());

        let (header, payload) = value.split_once(',').ok_or_else(malformed)?;
        let media = header
            .strip_prefix("data:")
            .and_then(|h| h.strip_suffix(";base64"))
            .ok_or_else(malformed)?;
        let subtype = media.strip_prefix("image/").ok_or_else(malformed)?;
        if subtype.is_empty()
            || subtype
                .chars()
                .any(|c| c.is_whitespace() || c == ',' || c == ';')
        {
            return Err(malformed());
        }

        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|_| malformed())?;

        Ok(ImageRef::DataUri(value.to_string()))
    }
}

impl TryFrom<String> for ImageRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ImageRef::parse(&value)
    }
}

impl From<ImageRef> for String {
    fn from(image: ImageRef) -> Self {
        match image {
            ImageRef::Url(s) | ImageRef::DataUri(s) => s,
        }
    }
}

/// A product listing as stored in `products`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    /// Copy of the owner's username at listing time, back-filled on profile
    /// updates.
    #[serde(rename = "username")]
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether `user` may put this product in their cart. Nobody buys their own listing.
    pub fn can_be_added_by(&self, user: UserId) -> bool {
        self.owner_id != user
    }

    /// Case-insensitive substring match against title or description.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

impl Record for Product {
    type Id = ProductId;

    fn record_id(&self) -> Self::Id {
        self.id
    }

    fn entity_name() -> &'static str {
        "product"
    }

    fn validate(&self) -> Result<()> {
        validate_listing_fields(
            &self.title,
            &self.description,
            self.price,
            self.image.as_ref(),
        )
    }
}

fn validate_listing_fields(
    title: &str,
    description: &str,
    price: Decimal,
    image: Option<&ImageRef>,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::ValidationError("title is required".to_string()));
    }
    if description.trim().is_empty() {
        return Err(Error::ValidationError(
            "description is required".to_string(),
        ));
    }
    if price <= Decimal::ZERO {
        return Err(Error::ValidationError(format!(
            "price must be positive, got {}",
            price
        )));
    }
    if let Some(image) = image {
        image.validate()?;
    }
    Ok(())
}

/// Input for a new listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

impl ProductDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        price: Decimal,
    ) -> Self {
        ProductDraft {
            title: title.into(),
            description: description.into(),
            category,
            price,
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// Stamp a fresh id and owner metadata onto the draft.
    ///
    /// # Errors
    ///
    /// `Error::ValidationError` if title or description is blank, the price
    /// is not positive, or the image is malformed.
    pub fn into_product(self, owner: &User) -> Result<Product> {
        validate_listing_fields(
            &self.title,
            &self.description,
            self.price,
            self.image.as_ref(),
        )?;

        Ok(Product {
            id: ProductId::generate(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            price: self.price,
            image: self.image,
            owner_id: owner.id,
            owner_username: owner.username.clone(),
            created_at: Utc::now(),
            updated_at: None,
        })
    }
}

/// Partial edit of a listing. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<Decimal>,
    /// `Some(None)` removes the image.
    pub image: Option<Option<ImageRef>>,
}

impl ProductPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn image(mut self, image: Option<ImageRef>) -> Self {
        self.image = Some(image);
        self
    }

    /// Merge into `product` and stamp `updated_at`. Callers validate the result.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(title) = &self.title {
            product.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            product.description = description.trim().to_string();
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = &self.image {
            product.image = image.clone();
        }
        product.updated_at = Some(Utc::now());
    }
}

/// Listing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductSort {
    /// Storage order.
    #[default]
    Stored,
    /// Most recently listed first.
    Newest,
    /// Cheapest first.
    PriceAscending,
    /// Alphabetical by title, case-insensitive.
    Title,
}

/// Conjunctive listing filter.
///
/// Predicates run in a fixed order: category, then search, then owner.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductFilter {
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    /// True if `product` passes every set predicate. An empty search term
    /// matches everything.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            if !product.matches_search(term) {
                return false;
            }
        }
        if let Some(owner) = self.owner_id {
            if product.owner_id != owner {
                return false;
            }
        }
        true
    }

    /// Filter and order a collection into a new list; the input is untouched.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut matched: Vec<Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        match self.sort {
            ProductSort::Stored => {}
            ProductSort::Newest => {
                matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
            }
            ProductSort::PriceAscending => matched.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::Title => {
                matched.sort_by_key(|p| p.title.to_lowercase());
            }
        }

        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> User {
        User::register("seller@example.com", "pw", "seller").expect("register")
    }

    fn product(title: &str, description: &str, category: Category, price: i64) -> Product {
        ProductDraft::new(title, description, category, Decimal::new(price, 0))
            .into_product(&owner())
            .expect("valid draft")
    }

    #[test]
    fn test_category_roundtrip_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().ok(), Some(category));
        }
        assert!("Garden".parse::<Category>().is_err());
        assert_eq!(
            serde_json::to_string(&Category::Books).expect("serialize"),
            "\"Books\""
        );
    }

    #[test]
    fn test_image_url_validation() {
        assert!(ImageRef::parse("https://cdn.example.com/a.PNG").is_ok());
        assert!(ImageRef::parse("phone1.png").is_ok());
        assert!(ImageRef::parse("ftp://example.com/a.png").is_err());
        assert!(ImageRef::parse("https://example.com/page.html").is_err());
        assert!(ImageRef::parse("https://example.com/a b.png").is_err());
        assert!(ImageRef::parse("").is_err());
    }

    #[test]
    fn test_image_data_uri_validation() {
        let image = ImageRef::parse("data:image/png;base64,iVBORw0KGgo=").expect("valid");
        assert!(image.is_embedded());
        assert!(ImageRef::parse("data:text/plain;base64,aGk=").is_err());
        assert!(ImageRef::parse("data:image/png;base64,@@@").is_err());
        assert!(ImageRef::parse("data:image/png,raw").is_err());
    }

    #[test]
    fn test_image_from_upload() {
        let image = ImageRef::from_upload("image/gif", b"GIF89a", 1024).expect("upload");
        assert_eq!(image.as_str(), "data:image/gif;base64,R0lGODlh");
        assert_eq!(ImageRef::parse(image.as_str()).ok(), Some(image));

        let err = ImageRef::from_upload("image/png", &[0u8; 11], 10).expect_err("too big");
        assert!(matches!(err, Error::OversizedUpload { size: 11, limit: 10 }));

        let err = ImageRef::from_upload("application/pdf", b"%PDF", 1024).expect_err("not image");
        assert!(matches!(err, Error::ValidationError(_)));

        for content_type in ["image/png,x", "image/png;charset=x", "image/ png", "image/"] {
            let err = ImageRef::from_upload(content_type, b"abc", 1024).expect_err(content_type);
            assert!(matches!(err, Error::ValidationError(_)), "{}", content_type);
        }
    }

    #[test]
    fn test_image_validate_catches_unparsed_variants() {
        assert!(ImageRef::parse("lamp.jpg").expect("valid").validate().is_ok());
        assert!(ImageRef::Url("not an image".to_string()).validate().is_err());
        assert!(ImageRef::DataUri("data:image/png,x;base64,YWJj".to_string())
            .validate()
            .is_err());
        // A well-formed URL in the embedded variant is still rejected.
        assert!(ImageRef::DataUri("lamp.jpg".to_string()).validate().is_err());
    }

    #[test]
    fn test_draft_with_malformed_image_rejected() {
        let draft = ProductDraft::new("Chair", "Oak", Category::Furniture, Decimal::TEN)
            .with_image(ImageRef::Url("not an image".to_string()));
        assert!(matches!(
            draft.into_product(&owner()),
            Err(Error::ValidationError(_))
        ));
    }

    #[test]
    fn test_image_serialized_as_string() {
        let image = ImageRef::parse("book1.png").expect("valid");
        assert_eq!(
            serde_json::to_string(&image).expect("serialize"),
            "\"book1.png\""
        );
        assert!(serde_json::from_str::<ImageRef>("\"notes.txt\"").is_err());
    }

    #[test]
    fn test_draft_validation() {
        let user = owner();
        let blank = ProductDraft::new("  ", "desc", Category::Other, Decimal::ONE);
        assert!(matches!(
            blank.into_product(&user),
            Err(Error::ValidationError(_))
        ));

        let free = ProductDraft::new("Lamp", "desc", Category::Other, Decimal::ZERO);
        assert!(matches!(
            free.into_product(&user),
            Err(Error::ValidationError(_))
        ));

        let ok = ProductDraft::new(" Lamp ", " Warm light ", Category::Furniture, Decimal::TEN)
            .into_product(&user)
            .expect("valid");
        assert_eq!(ok.title, "Lamp");
        assert_eq!(ok.owner_id, user.id);
        assert_eq!(ok.owner_username, "seller");
        assert!(!ok.can_be_added_by(user.id));
        assert!(ok.can_be_added_by(UserId::generate()));
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let mut p = product("Lamp", "Warm light", Category::Furniture, 10);
        ProductPatch::default()
            .price(Decimal::new(1250, 2))
            .image(Some(ImageRef::parse("lamp.jpg").expect("valid")))
            .apply_to(&mut p);

        assert_eq!(p.title, "Lamp");
        assert_eq!(p.price, Decimal::new(1250, 2));
        assert!(p.image.is_some());
        assert!(p.updated_at.is_some());

        ProductPatch::default().image(None).apply_to(&mut p);
        assert!(p.image.is_none());

        ProductPatch::default().price(Decimal::NEGATIVE_ONE).apply_to(&mut p);
        assert!(p.validate().is_err());

        let mut q = product("Desk", "Pine", Category::Furniture, 10);
        ProductPatch::default()
            .image(Some(ImageRef::Url("desk.txt".to_string())))
            .apply_to(&mut q);
        assert!(q.validate().is_err());
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let products = vec![
            product("JavaScript Complete Guide", "Programming book", Category::Books, 45),
            product("Hiking Guide", "Trails and maps", Category::Sports, 20),
            product("Art History", "Illustrated", Category::Books, 70),
        ];

        let filter = ProductFilter::default()
            .category(Category::Books)
            .search("GUIDE");
        let matched = filter.apply(&products);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "JavaScript Complete Guide");

        // Source untouched
        assert_eq!(products.len(), 3);
    }

    #[test]
    fn test_filter_empty_search_matches_all() {
        let products = vec![
            product("A", "x", Category::Toys, 1),
            product("B", "y", Category::Toys, 2),
        ];
        assert_eq!(ProductFilter::default().search("").apply(&products).len(), 2);
    }

    #[test]
    fn test_filter_sorting() {
        let products = vec![
            product("banana", "x", Category::Other, 30),
            product("Apple", "x", Category::Other, 10),
            product("cherry", "x", Category::Other, 20),
        ];

        let by_price = ProductFilter::default()
            .sort(ProductSort::PriceAscending)
            .apply(&products);
        let prices: Vec<Decimal> = by_price.iter().map(|p| p.price).collect();
        assert_eq!(
            prices,
            vec![Decimal::new(10, 0), Decimal::new(20, 0), Decimal::new(30, 0)]
        );

        let by_title = ProductFilter::default().sort(ProductSort::Title).apply(&products);
        assert_eq!(by_title[0].title, "Apple");

        let newest = ProductFilter::default().sort(ProductSort::Newest).apply(&products);
        assert_eq!(newest[0].title, "cherry");
    }
}
