//! Process-local store
//!
//! A unit of work takes the store lock for its whole lifetime and edits a
//! private copy of the tables; commit writes the copy back. Units of work are
//! therefore fully serialized, and a dropped one leaves no trace.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    CartItemRepository, CouponRepository, MemberCouponRepository, MemberRepository, OrderRepository,
    ProductRepository, Store, UnitOfWork,
};
use crate::domain::aggregates::{CartItem, Coupon, Item, Member, MemberCoupon, Order, Product};
use crate::domain::value_objects::{CouponId, ItemId, MemberCouponId, MemberId, OrderId, ProductId, Quantity};
use crate::{CartError, Result};

#[derive(Clone, Debug)]
struct CartItemRow {
    member_id: MemberId,
    product_id: ProductId,
    quantity: Quantity,
}

#[derive(Clone, Debug)]
struct MemberCouponRow {
    member_id: MemberId,
    coupon_id: CouponId,
    used: bool,
}

#[derive(Clone, Debug, Default)]
struct Tables {
    members: BTreeMap<MemberId, Member>,
    products: BTreeMap<ProductId, Product>,
    cart_items: BTreeMap<ItemId, CartItemRow>,
    coupons: BTreeMap<CouponId, Coupon>,
    member_coupons: BTreeMap<MemberCouponId, MemberCouponRow>,
    orders: BTreeMap<OrderId, Order>,
}

impl Tables {
    fn hydrate_cart_item(&self, id: ItemId, row: &CartItemRow) -> Result<CartItem> {
        let product = self.products.get(&row.product_id).cloned().ok_or(CartError::ProductNotFound(row.product_id))?;
        Ok(CartItem::new(id, row.member_id, product, row.quantity))
    }

    fn hydrate_member_coupon(&self, id: MemberCouponId, row: &MemberCouponRow) -> Result<MemberCoupon> {
        let coupon = self
            .coupons
            .get(&row.coupon_id)
            .cloned()
            .ok_or(CartError::CouponNotFound(row.coupon_id))?;
        Ok(MemberCoupon::new(id, row.member_id, coupon, row.used))
    }

    fn check_member_exists(&self, id: MemberId) -> Result<()> {
        if self.members.contains_key(&id) { Ok(()) } else { Err(CartError::MemberNotFound(id)) }
    }

    fn member_coupon_row(&self, member_coupon: &MemberCoupon) -> Result<MemberCouponRow> {
        self.check_member_exists(member_coupon.member_id())?;
        let coupon_id = member_coupon.coupon().id();
        if !self.coupons.contains_key(&coupon_id) {
            return Err(CartError::CouponNotFound(coupon_id));
        }
        Ok(MemberCouponRow { member_id: member_coupon.member_id(), coupon_id, used: member_coupon.is_used() })
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryUnitOfWork { guard, working })
    }
}

#[derive(Debug)]
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(mut self) -> Result<()> {
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for MemoryUnitOfWork {
    async fn find_member_by_id(&mut self, id: MemberId) -> Result<Option<Member>> {
        Ok(self.working.members.get(&id).cloned())
    }

    async fn insert_member(&mut self, member: &Member) -> Result<()> {
        let email_taken = self.working.members.values().any(|m| m.email() == member.email());
        if email_taken {
            return Err(CartError::Validation(format!("email {} is already registered", member.email())));
        }
        self.working.members.insert(member.id(), member.clone());
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MemoryUnitOfWork {
    async fn find_product_by_id(&mut self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.working.products.get(&id).cloned())
    }

    async fn find_all_products(&mut self) -> Result<Vec<Product>> {
        Ok(self.working.products.values().cloned().collect())
    }

    async fn insert_product(&mut self, product: &Product) -> Result<()> {
        self.working.products.insert(product.id(), product.clone());
        Ok(())
    }
}

#[async_trait]
impl CartItemRepository for MemoryUnitOfWork {
    async fn find_cart_item_by_id(&mut self, id: ItemId) -> Result<Option<CartItem>> {
        let tables = &self.working;
        tables.cart_items.get(&id).map(|row| tables.hydrate_cart_item(id, row)).transpose()
    }

    async fn find_cart_items_by_ids(&mut self, ids: &[ItemId]) -> Result<Vec<CartItem>> {
        let tables = &self.working;
        ids.iter()
            .filter_map(|id| tables.cart_items.get(id).map(|row| tables.hydrate_cart_item(*id, row)))
            .collect()
    }

    async fn find_cart_items_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<CartItem>> {
        let tables = &self.working;
        tables
            .cart_items
            .iter()
            .filter(|(_, row)| row.member_id == member_id)
            .map(|(id, row)| tables.hydrate_cart_item(*id, row))
            .collect()
    }

    async fn add_cart_item(&mut self, item: &CartItem) -> Result<CartItem> {
        let tables = &mut self.working;
        tables.check_member_exists(item.member_id())?;
        let product_id = item.product().id();
        if !tables.products.contains_key(&product_id) {
            return Err(CartError::ProductNotFound(product_id));
        }
        let existing = tables
            .cart_items
            .iter()
            .find(|(_, row)| row.member_id == item.member_id() && row.product_id == product_id)
            .map(|(id, _)| *id);
        let id = match existing {
            Some(id) => {
                let row = tables.cart_items.get_mut(&id).ok_or(CartError::ItemNotFound(id))?;
                row.quantity = row.quantity.add(item.quantity())?;
                id
            }
            None => {
                let row = CartItemRow { member_id: item.member_id(), product_id, quantity: item.quantity() };
                tables.cart_items.insert(item.id(), row);
                item.id()
            }
        };
        let row = tables.cart_items.get(&id).ok_or(CartError::ItemNotFound(id))?;
        tables.hydrate_cart_item(id, row)
    }

    async fn update_cart_item(&mut self, item: &CartItem) -> Result<()> {
        let row = self.working.cart_items.get_mut(&item.id()).ok_or(CartError::ItemNotFound(item.id()))?;
        row.quantity = item.quantity();
        Ok(())
    }

    async fn delete_cart_item(&mut self, id: ItemId) -> Result<bool> {
        Ok(self.working.cart_items.remove(&id).is_some())
    }

    async fn delete_cart_items(&mut self, ids: &[ItemId]) -> Result<Vec<ItemId>> {
        Ok(ids.iter().copied().filter(|id| self.working.cart_items.remove(id).is_some()).collect())
    }
}

#[async_trait]
impl CouponRepository for MemoryUnitOfWork {
    async fn find_coupon_by_id(&mut self, id: CouponId) -> Result<Option<Coupon>> {
        Ok(self.working.coupons.get(&id).cloned())
    }

    async fn insert_coupon(&mut self, coupon: &Coupon) -> Result<()> {
        self.working.coupons.insert(coupon.id(), coupon.clone());
        Ok(())
    }
}

#[async_trait]
impl MemberCouponRepository for MemoryUnitOfWork {
    async fn find_member_coupon_by_id(&mut self, id: MemberCouponId) -> Result<Option<MemberCoupon>> {
        let tables = &self.working;
        tables.member_coupons.get(&id).map(|row| tables.hydrate_member_coupon(id, row)).transpose()
    }

    async fn find_unused_member_coupons_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<MemberCoupon>> {
        let tables = &self.working;
        tables
            .member_coupons
            .iter()
            .filter(|(_, row)| row.member_id == member_id && !row.used)
            .map(|(id, row)| tables.hydrate_member_coupon(*id, row))
            .collect()
    }

    async fn insert_member_coupon(&mut self, member_coupon: &MemberCoupon) -> Result<()> {
        let row = self.working.member_coupon_row(member_coupon)?;
        self.working.member_coupons.insert(member_coupon.id(), row);
        Ok(())
    }

    async fn insert_member_coupons(&mut self, member_coupons: &[MemberCoupon]) -> Result<()> {
        for member_coupon in member_coupons {
            self.insert_member_coupon(member_coupon).await?;
        }
        Ok(())
    }

    async fn mark_member_coupon_used(&mut self, id: MemberCouponId) -> Result<bool> {
        match self.working.member_coupons.get_mut(&id) {
            Some(row) if !row.used => {
                row.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl OrderRepository for MemoryUnitOfWork {
    async fn insert_order(&mut self, order: &Order) -> Result<()> {
        self.working.check_member_exists(order.member_id())?;
        self.working.orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn find_order_by_id(&mut self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.working.orders.get(&id).cloned())
    }

    async fn find_orders_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<Order>> {
        Ok(self.working.orders.values().filter(|o| o.member_id() == member_id).cloned().collect())
    }
}
