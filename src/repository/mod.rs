//! Persistence boundary
//!
//! Every repository is implemented by a store's unit of work, so a service
//! can read and write several aggregates and then commit or drop them as one.
//! Dropping a unit of work without calling [`UnitOfWork::commit`] discards
//! everything it wrote.

mod memory;
mod postgres;

pub use memory::{MemoryStore, MemoryUnitOfWork};
pub use postgres::{PgStore, PgUnitOfWork};

use async_trait::async_trait;

use crate::domain::aggregates::{CartItem, Coupon, Member, MemberCoupon, Order, Product};
use crate::domain::value_objects::{CouponId, ItemId, MemberCouponId, MemberId, OrderId, ProductId};
use crate::Result;

#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: UnitOfWork;

    async fn begin(&self) -> Result<Self::Tx>;
}

#[async_trait]
pub trait UnitOfWork:
    MemberRepository
    + ProductRepository
    + CartItemRepository
    + CouponRepository
    + MemberCouponRepository
    + OrderRepository
    + Sized
    + Send
{
    async fn commit(self) -> Result<()>;
}

#[async_trait]
pub trait MemberRepository {
    async fn find_member_by_id(&mut self, id: MemberId) -> Result<Option<Member>>;
    async fn insert_member(&mut self, member: &Member) -> Result<()>;
}

#[async_trait]
pub trait ProductRepository {
    async fn find_product_by_id(&mut self, id: ProductId) -> Result<Option<Product>>;
    async fn find_all_products(&mut self) -> Result<Vec<Product>>;
    async fn insert_product(&mut self, product: &Product) -> Result<()>;
}

#[async_trait]
pub trait CartItemRepository {
    async fn find_cart_item_by_id(&mut self, id: ItemId) -> Result<Option<CartItem>>;
    /// Returns the items that exist among `ids`, in no particular order. The
    /// returned lines stay locked until the unit of work ends.
    async fn find_cart_items_by_ids(&mut self, ids: &[ItemId]) -> Result<Vec<CartItem>>;
    async fn find_cart_items_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<CartItem>>;
    /// Stores a new line, or adds its quantity to the member's existing line
    /// for the same product. Returns the line as stored.
    async fn add_cart_item(&mut self, item: &CartItem) -> Result<CartItem>;
    /// Persists the item's current quantity.
    async fn update_cart_item(&mut self, item: &CartItem) -> Result<()>;
    async fn delete_cart_item(&mut self, id: ItemId) -> Result<bool>;
    /// Returns the ids that were actually deleted.
    async fn delete_cart_items(&mut self, ids: &[ItemId]) -> Result<Vec<ItemId>>;
}

#[async_trait]
pub trait CouponRepository {
    async fn find_coupon_by_id(&mut self, id: CouponId) -> Result<Option<Coupon>>;
    async fn insert_coupon(&mut self, coupon: &Coupon) -> Result<()>;
}

#[async_trait]
pub trait MemberCouponRepository {
    async fn find_member_coupon_by_id(&mut self, id: MemberCouponId) -> Result<Option<MemberCoupon>>;
    async fn find_unused_member_coupons_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<MemberCoupon>>;
    async fn insert_member_coupon(&mut self, member_coupon: &MemberCoupon) -> Result<()>;
    async fn insert_member_coupons(&mut self, member_coupons: &[MemberCoupon]) -> Result<()>;
    /// Flips `used` from false to true. Returns false when the coupon was
    /// already used, so two orders can never both consume it.
    async fn mark_member_coupon_used(&mut self, id: MemberCouponId) -> Result<bool>;
}

#[async_trait]
pub trait OrderRepository {
    async fn insert_order(&mut self, order: &Order) -> Result<()>;
    async fn find_order_by_id(&mut self, id: OrderId) -> Result<Option<Order>>;
    async fn find_orders_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<Order>>;
}
