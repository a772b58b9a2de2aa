//! OpenSASE Cart
//!
//! Cart, coupon and order pricing core for the self-hosted storefront.
//!
//! ## Features
//! - Member carts with per-line quantity management
//! - Coupons with flat, percentage and free-delivery discounts
//! - Single-use coupon issuance per member
//! - Atomic order placement with a frozen line-item snapshot
//! - Postgres and in-memory persistence behind one unit-of-work boundary

pub mod config;
pub mod domain;
pub mod repository;
pub mod service;

#[cfg(test)]
mod test;

pub use config::{ConfigError, Settings};
pub use domain::aggregates::{
    CartItem, Coupon, DiscountCondition, DiscountPolicy, Item, Member, MemberCoupon, Order,
    OrderItem, Product,
};
pub use domain::value_objects::{
    CouponId, ItemId, MemberCouponId, MemberId, Money, OrderId, ProductId, Quantity,
};
pub use repository::{MemoryStore, PgStore, Store, UnitOfWork};
pub use service::{CartService, CatalogService, CouponService, OrderService};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Member {member_id} does not own {target}")]
    Ownership { member_id: MemberId, target: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Coupon not found: {0}")]
    CouponNotFound(CouponId),

    #[error("Member coupon not found: {0}")]
    MemberCouponNotFound(MemberCouponId),

    #[error("Coupon already used: {0}")]
    CouponAlreadyUsed(MemberCouponId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("Money arithmetic overflow")]
    Arithmetic,

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl CartError {
    pub(crate) fn ownership(member_id: MemberId, target: impl std::fmt::Display) -> Self {
        Self::Ownership { member_id, target: target.to_string() }
    }

    /// Business-rule violations caused by the caller's input, as opposed to
    /// infrastructure faults. The web layer maps these to 4xx responses.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Arithmetic | Self::InvalidRecord(_) | Self::Storage(_))
    }
}

impl From<validator::ValidationErrors> for CartError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
