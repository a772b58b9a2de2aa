//! Cart and order lines
//!
//! Both kinds of line share the [`Item`] capability set. A [`CartItem`] can
//! have its quantity changed; an [`OrderItem`] is a frozen copy taken at
//! checkout and rejects every mutation.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::domain::aggregates::Product;
use crate::domain::value_objects::{ItemId, MemberId, Money, Quantity};
use crate::{CartError, Result};

pub trait Item {
    fn id(&self) -> ItemId;
    fn member_id(&self) -> MemberId;
    fn product(&self) -> &Product;
    fn quantity(&self) -> Quantity;

    fn calculate_total_price(&self) -> Result<Money> {
        self.product().price().times(self.quantity().value())
    }

    fn check_owner(&self, member_id: MemberId) -> Result<()> {
        if self.member_id() != member_id {
            return Err(CartError::ownership(member_id, format!("item {}", self.id())));
        }
        Ok(())
    }

    fn change_quantity(&mut self, quantity: u32) -> Result<()>;
}

/// Sum of the line totals of `items`.
pub fn total_price_of<I: Item>(items: &[I]) -> Result<Money> {
    items.iter().try_fold(Money::ZERO, |acc, item| acc.plus(item.calculate_total_price()?))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    id: ItemId,
    member_id: MemberId,
    product: Product,
    quantity: Quantity,
}

impl CartItem {
    pub fn new(id: ItemId, member_id: MemberId, product: Product, quantity: Quantity) -> Self {
        Self { id, member_id, product, quantity }
    }

    pub fn create(member_id: MemberId, product: Product, quantity: Quantity) -> Self {
        Self::new(ItemId::new(), member_id, product, quantity)
    }
}

impl Item for CartItem {
    fn id(&self) -> ItemId { self.id }
    fn member_id(&self) -> MemberId { self.member_id }
    fn product(&self) -> &Product { &self.product }
    fn quantity(&self) -> Quantity { self.quantity }

    fn change_quantity(&mut self, quantity: u32) -> Result<()> {
        self.quantity = Quantity::new(quantity)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderItem {
    id: ItemId,
    member_id: MemberId,
    product: Product,
    quantity: Quantity,
}

impl OrderItem {
    pub fn new(id: ItemId, member_id: MemberId, product: Product, quantity: Quantity) -> Self {
        Self { id, member_id, product, quantity }
    }

    /// Freezes a cart line into an order line with its own id.
    pub fn snapshot(cart_item: &CartItem) -> Self {
        Self::new(ItemId::new(), cart_item.member_id, cart_item.product.clone(), cart_item.quantity)
    }
}

impl Item for OrderItem {
    fn id(&self) -> ItemId { self.id }
    fn member_id(&self) -> MemberId { self.member_id }
    fn product(&self) -> &Product { &self.product }
    fn quantity(&self) -> Quantity { self.quantity }

    fn change_quantity(&mut self, _quantity: u32) -> Result<()> {
        Err(CartError::UnsupportedOperation("order items cannot change quantity"))
    }
}

macro_rules! identity_by_id {
    ($($ty:ty),*) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool { self.id == other.id }
        }
        impl Eq for $ty {}
        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state) }
        }
    )*};
}

identity_by_id!(CartItem, OrderItem);
