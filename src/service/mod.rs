//! Application services. Each public operation runs in a single unit of work.

mod cart;
mod catalog;
pub mod commands;
mod coupon;
mod order;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use commands::{NewCoupon, NewMember, NewProduct, PlaceOrder};
pub use coupon::CouponService;
pub use order::OrderService;

use crate::domain::events::DomainEvent;

/// Logs events drained from aggregates once their unit of work has committed.
fn publish(events: Vec<DomainEvent>) {
    for event in events {
        tracing::info!(?event, "domain event");
    }
}
