//! Basket fixtures.

use basket_domain::{BasketItem, CustomerBasket};
use rust_decimal_macros::dec;

/// The single "Widget" line item used across scenarios.
pub fn sample_item() -> BasketItem {
    BasketItem::new("p1", "Widget", dec!(9.99), 2)
}

/// `{customerID: <id>, items: [Widget x2 @ 9.99]}`
pub fn widget_basket(customer_id: &str) -> CustomerBasket {
    CustomerBasket::new(customer_id, vec![sample_item()])
}

/// A basket with `count` distinct items, priced 1.00, 2.00, ...
pub fn sample_basket(customer_id: &str, count: usize) -> CustomerBasket {
    let items = (1..=count)
        .map(|n| {
            let quantity = u32::try_from(n).unwrap_or(u32::MAX);
            BasketItem::new(
                format!("p{n}"),
                format!("Product {n}"),
                rust_decimal::Decimal::from(quantity),
                quantity,
            )
        })
        .collect();
    CustomerBasket::new(customer_id, items)
}
