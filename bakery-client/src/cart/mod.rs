//! Cart state
//!
//! 购物车只存在于客户端: 每次变更后整份快照写入持久化端口, 结账时转换为
//! [`CreateOrderRequest`]。价格在加入购物车时捕获, 不再与服务器同步。

mod store;

pub use store::{CART_STORAGE_KEY, CartStore, FileCartStore, MemoryCartStore};

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::models::Cake;
use shared::money;
use shared::request::{CreateOrderRequest, DeliveryDetails, OrderItemInput};

use crate::error::ClientResult;

/// Flat delivery fee shown at checkout (KSh), never sent to the server
pub const DEFAULT_DELIVERY_FEE: i64 = 300;

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Cake record id ("cake:xyz")
    pub cake_id: String,
    pub name: String,
    /// Unit price captured when the cake was added
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    /// Single unit of a catalog cake
    pub fn from_cake(cake: &Cake) -> Self {
        Self {
            cake_id: cake.id.clone(),
            name: cake.name.clone(),
            price: cake.price,
            quantity: 1,
            image: cake.primary_image().map(str::to_string),
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn line_total(&self) -> Decimal {
        money::line_total(self.price, self.quantity)
    }
}

/// Cart mutation
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add `item.quantity` units; merges into an existing line for the same cake
    Add(CartItem),
    /// Drop the line for a cake id (no-op when absent)
    Remove(String),
    /// Overwrite the quantity; values ≤ 0 remove the line
    SetQuantity(String, i64),
    Clear,
}

/// Apply one action to a snapshot
///
/// Invariant: the result never holds a line with quantity 0.
pub fn reduce(items: &[CartItem], action: &CartAction) -> Vec<CartItem> {
    match action {
        CartAction::Add(item) => {
            if item.quantity == 0 {
                return items.to_vec();
            }
            let mut next = items.to_vec();
            match next.iter_mut().find(|line| line.cake_id == item.cake_id) {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => next.push(item.clone()),
            }
            next
        }
        CartAction::Remove(cake_id) => items
            .iter()
            .filter(|line| &line.cake_id != cake_id)
            .cloned()
            .collect(),
        CartAction::SetQuantity(cake_id, quantity) => {
            let quantity = u32::try_from((*quantity).max(0)).unwrap_or(u32::MAX);
            items
                .iter()
                .map(|line| {
                    if &line.cake_id == cake_id {
                        line.clone().with_quantity(quantity)
                    } else {
                        line.clone()
                    }
                })
                .filter(|line| line.quantity > 0)
                .collect()
        }
        CartAction::Clear => Vec::new(),
    }
}

/// Subtotal / fee / grand total as displayed on the cart page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverySummary {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

/// Cart state container over a persistence port
#[derive(Debug)]
pub struct Cart<S: CartStore> {
    items: Vec<CartItem>,
    store: S,
}

impl<S: CartStore> Cart<S> {
    /// Rehydrate from the store; an unreadable snapshot is discarded
    pub fn load(mut store: S) -> Self {
        let items = match store.load() {
            Ok(Some(items)) => items.into_iter().filter(|i| i.quantity > 0).collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cart snapshot");
                if let Err(e) = store.clear() {
                    tracing::warn!(error = %e, "Failed to remove cart snapshot");
                }
                Vec::new()
            }
        };
        Self { items, store }
    }

    /// Apply an action and persist the resulting snapshot
    ///
    /// The in-memory cart only changes once the store accepted the write.
    pub fn dispatch(&mut self, action: CartAction) -> ClientResult<()> {
        let next = reduce(&self.items, &action);
        match action {
            CartAction::Clear => self.store.clear()?,
            _ => self.store.save(&next)?,
        }
        self.items = next;
        Ok(())
    }

    pub fn add(&mut self, item: CartItem) -> ClientResult<()> {
        self.dispatch(CartAction::Add(item))
    }

    pub fn remove(&mut self, cake_id: &str) -> ClientResult<()> {
        self.dispatch(CartAction::Remove(cake_id.to_string()))
    }

    pub fn set_quantity(&mut self, cake_id: &str, quantity: i64) -> ClientResult<()> {
        self.dispatch(CartAction::SetQuantity(cake_id.to_string(), quantity))
    }

    pub fn clear(&mut self) -> ClientResult<()> {
        self.dispatch(CartAction::Clear)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ price × quantity, 2 dp
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .sum::<Decimal>()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Σ quantity
    pub fn count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn delivery_summary(&self, delivery_fee: Decimal) -> DeliverySummary {
        let subtotal = self.total();
        DeliverySummary {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }

    /// Order body for `POST /api/orders`
    ///
    /// `totalAmount` is the cart total; the delivery fee is display-only.
    pub fn to_order_request(&self, delivery: &DeliveryDetails) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: delivery.customer_name.clone(),
            phone: delivery.phone.clone(),
            email: delivery.email.clone(),
            delivery_location: delivery.delivery_location.clone(),
            items: self
                .items
                .iter()
                .map(|line| OrderItemInput {
                    cake: line.cake_id.clone(),
                    quantity: i64::from(line.quantity),
                    price: line.price,
                })
                .collect(),
            total_amount: self.total().to_f64().unwrap_or_default(),
            message: delivery.message.clone(),
            special_instructions: delivery.special_instructions.clone(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
