//! Basket entities
//!
//! `CustomerBasket` is the aggregate persisted per customer. It is always
//! written and read as a whole: there is no item-level update.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Opaque, caller-chosen customer identifier (primary key of a basket)
pub type CustomerId = String;

// =============================================================================
// BasketItem
// =============================================================================

/// A single line entry in a basket.
///
/// Prices and quantities are carried exactly as the caller sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketItem {
    /// Product identifier
    #[serde(rename = "productID")]
    pub product_id: String,
    /// Display name of the product
    #[serde(rename = "productName")]
    pub product_name: String,
    /// Price per unit, serialized as a JSON number
    #[serde(rename = "unitPrice", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Number of units
    pub quantity: u32,
}

impl BasketItem {
    /// Create a new line item (not validated until the basket is)
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price,
            quantity,
        }
    }

    fn validate(&self, index: usize) -> Result<(), DomainError> {
        if self.unit_price < Decimal::ZERO {
            return Err(DomainError::InvalidUnitPrice {
                index,
                message: format!("unit price must not be negative, got {}", self.unit_price),
            });
        }
        if self.quantity == 0 {
            return Err(DomainError::InvalidQuantity {
                index,
                message: "quantity must be positive".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// CustomerBasket
// =============================================================================

/// The basket stored for one customer.
///
/// # Invariants
/// - `customer_id` is non-empty
/// - `items` keeps caller order; duplicates are allowed
/// - an empty `items` list is a real basket, not an absent one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBasket {
    /// Owner of the basket
    #[serde(rename = "customerID")]
    pub customer_id: CustomerId,
    /// Line items in caller order
    #[serde(default)]
    pub items: Vec<BasketItem>,
}

impl CustomerBasket {
    /// Create a basket for a customer
    pub fn new(customer_id: impl Into<CustomerId>, items: Vec<BasketItem>) -> Self {
        Self {
            customer_id: customer_id.into(),
            items,
        }
    }

    /// Create a basket with no items
    pub fn empty(customer_id: impl Into<CustomerId>) -> Self {
        Self::new(customer_id, Vec::new())
    }

    /// Check the payload is well formed before it is handed to a store.
    ///
    /// # Errors
    /// - `DomainError::InvalidCustomerId` if the id is empty
    /// - `DomainError::InvalidUnitPrice` if any item has a negative price
    /// - `DomainError::InvalidQuantity` if any item has a zero quantity
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.customer_id.is_empty() {
            return Err(DomainError::InvalidCustomerId(
                "customerID must not be empty".to_string(),
            ));
        }

        self.items
            .iter()
            .enumerate()
            .try_for_each(|(index, item)| item.validate(index))
    }

    /// True when the basket holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn widget() -> BasketItem {
        BasketItem::new("p1", "Widget", dec!(9.99), 2)
    }

    #[test]
    fn test_valid_basket() {
        let basket = CustomerBasket::new("c1", vec![widget()]);
        assert!(basket.validate().is_ok());
    }

    #[test]
    fn test_empty_basket_is_valid() {
        let basket = CustomerBasket::empty("c1");
        assert!(basket.validate().is_ok());
        assert!(basket.is_empty());
    }

    #[test]
    fn test_empty_customer_id_rejected() {
        let basket = CustomerBasket::new("", vec![widget()]);
        assert!(matches!(basket.validate(), Err(DomainError::InvalidCustomerId(_))));

    }

    #[test]
    fn test_customer_id_is_opaque() {
        // Only emptiness is checked; whitespace is a legal id.
        assert!(CustomerBasket::new("   ", vec![]).validate().is_ok());
        assert!(CustomerBasket::new(" c1 ", vec![widget()]).validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let basket = CustomerBasket::new(
            "c1",
            vec![widget(), BasketItem::new("p2", "Gadget", dec!(-1), 1)],
        );
        assert_eq!(
            basket.validate().unwrap_err(),
            DomainError::InvalidUnitPrice {
                index: 1,
                message: "unit price must not be negative, got -1".to_string(),
            }
        );
    }

    #[test]
    fn test_zero_price_allowed() {
        let basket = CustomerBasket::new("c1", vec![BasketItem::new("p1", "Freebie", dec!(0), 1)]);
        assert!(basket.validate().is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let basket = CustomerBasket::new("c1", vec![BasketItem::new("p1", "Widget", dec!(1), 0)]);
        assert!(matches!(
            basket.validate(),
            Err(DomainError::InvalidQuantity { index: 0, .. })
        ));
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let items = vec![widget(), BasketItem::new("p2", "Gadget", dec!(5), 1), widget()];
        let basket = CustomerBasket::new("c1", items.clone());
        assert!(basket.validate().is_ok());
        assert_eq!(basket.items, items);
    }

    #[test]
    fn test_wire_format() {
        let basket = CustomerBasket::new("c1", vec![widget()]);
        let json = serde_json::to_value(&basket).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "customerID": "c1",
                "items": [{
                    "productID": "p1",
                    "productName": "Widget",
                    "unitPrice": 9.99,
                    "quantity": 2
                }]
            })
        );
    }

    #[test]
    fn test_missing_items_deserializes_as_empty() {
        let basket: CustomerBasket = serde_json::from_str(r#"{"customerID":"c1"}"#).unwrap();
        assert!(basket.is_empty());
    }

    #[test]
    fn test_price_parsed_exactly() {
        let basket: CustomerBasket = serde_json::from_str(
            r#"{"customerID":"c1","items":[{"productID":"p1","productName":"Widget","unitPrice":9.99,"quantity":2}]}"#,
        )
        .unwrap();
        assert_eq!(basket.items[0].unit_price, dec!(9.99));
    }

    #[test]
    fn test_negative_quantity_fails_to_parse() {
        let result: Result<CustomerBasket, _> = serde_json::from_str(
            r#"{"customerID":"c1","items":[{"productID":"p1","productName":"Widget","unitPrice":1,"quantity":-1}]}"#,
        );
        assert!(result.is_err());
    }
}
