//! Purchase history records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLineItem;
use super::id::{OrderId, ProductId, UserId};
use crate::record::Record;

/// Fulfilment state of a purchase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum PurchaseStatus {
    #[default]
    Pending,
}

/// One purchased line item.
///
/// A checkout writes one record per cart line; every record of the same
/// checkout shares an `order_id`. The product fields are a snapshot taken at
/// checkout and are not touched by later edits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    #[serde(flatten)]
    pub item: CartLineItem,
    pub buyer_id: UserId,
    pub order_id: OrderId,
    pub purchase_date: DateTime<Utc>,
    #[serde(default)]
    pub status: PurchaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
}

impl Purchase {
    pub fn product_id(&self) -> ProductId {
        self.item.product.id
    }

    pub fn line_total(&self) -> Decimal {
        self.item.line_total()
    }
}

impl Record for Purchase {
    type Id = ProductId;

    fn record_id(&self) -> Self::Id {
        self.item.product.id
    }

    fn entity_name() -> &'static str {
        "purchase"
    }
}

/// Sum of line totals, e.g. for one order's records.
pub fn order_total(purchases: &[Purchase]) -> Decimal {
    purchases.iter().map(Purchase::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, ProductDraft, User};

    fn purchase(price: Decimal, quantity: u32) -> Purchase {
        let seller = User::register("s@example.com", "pw", "seller").expect("register");
        let product = ProductDraft::new("Desk Lamp", "LED", Category::Furniture, price)
            .into_product(&seller)
            .expect("valid draft");
        Purchase {
            item: CartLineItem { product, quantity },
            buyer_id: UserId::generate(),
            order_id: OrderId::generate(),
            purchase_date: Utc::now(),
            status: PurchaseStatus::Pending,
            shipping_address: Some("1 Main St".to_string()),
        }
    }

    #[test]
    fn test_order_total() {
        let records = vec![
            purchase(Decimal::new(10, 0), 2),
            purchase(Decimal::new(5, 0), 1),
        ];
        assert_eq!(order_total(&records), Decimal::new(25, 0));
    }

    #[test]
    fn test_json_layout() {
        let record = purchase(Decimal::new(45, 0), 1);
        let json = serde_json::to_value(&record).expect("serialize");

        assert_eq!(json["status"], "pending");
        assert_eq!(json["title"], "Desk Lamp");
        assert_eq!(json["quantity"], 1);
        assert!(json.get("buyerId").is_some());
        assert!(json.get("purchaseDate").is_some());
        assert_eq!(json["id"], record.product_id().to_string());

        let back: Purchase = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, record);
    }
}
