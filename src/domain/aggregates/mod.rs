//! Aggregates module
pub mod coupon;
pub mod item;
pub mod member;
pub mod member_coupon;
pub mod order;
pub mod product;

pub use coupon::{Coupon, DiscountCondition, DiscountPolicy};
pub use item::{total_price_of, CartItem, Item, OrderItem};
pub use member::Member;
pub use member_coupon::MemberCoupon;
pub use order::{AppliedCoupon, Order, OrderPricing};
pub use product::Product;
