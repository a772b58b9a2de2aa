//! Order placement and order history.

use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use super::commands::PlaceOrder;
use super::publish;
use crate::domain::aggregates::{Item, Order};
use crate::domain::value_objects::{MemberId, Money, OrderId};
use crate::repository::{CartItemRepository, MemberCouponRepository, OrderRepository, Store, UnitOfWork};
use crate::{CartError, Result};

#[derive(Debug, Clone)]
pub struct OrderService<S> {
    store: S,
    delivery_fee: Money,
}

impl<S: Store> OrderService<S> {
    pub fn new(store: S, delivery_fee: Money) -> Self { Self { store, delivery_fee } }

    /// Turns the selected cart lines into an order.
    ///
    /// Item lookup, ownership checks, coupon consumption, order insertion and
    /// cart cleanup share one unit of work: on any error nothing is written.
    /// The selected lines are locked on lookup, and a line that another order
    /// removed in the meantime fails the placement with `ItemNotFound`.
    #[tracing::instrument(skip_all, fields(member_id = %member_id, items = request.item_ids.len()))]
    pub async fn place_order(&self, member_id: MemberId, request: PlaceOrder) -> Result<OrderId> {
        let result = self.try_place_order(member_id, &request).await;
        if let Err(error) = &result {
            warn!(%error, "order placement rejected");
        }
        result
    }

    async fn try_place_order(&self, member_id: MemberId, request: &PlaceOrder) -> Result<OrderId> {
        if request.item_ids.is_empty() {
            return Err(CartError::Validation("order must contain at least one item".into()));
        }
        let positions: HashMap<_, _> = request.item_ids.iter().enumerate().map(|(pos, id)| (*id, pos)).collect();
        if positions.len() != request.item_ids.len() {
            return Err(CartError::Validation("order lists the same item more than once".into()));
        }

        let mut tx = self.store.begin().await?;
        let mut items = tx.find_cart_items_by_ids(&request.item_ids).await?;
        let found: HashSet<_> = items.iter().map(|item| item.id()).collect();
        if let Some(missing) = request.item_ids.iter().find(|id| !found.contains(*id)) {
            return Err(CartError::ItemNotFound(*missing));
        }
        for item in &items {
            item.check_owner(member_id)?;
        }
        items.sort_by_key(|item| positions.get(&item.id()).copied());

        let mut member_coupon = match request.member_coupon_id {
            Some(id) => Some(tx.find_member_coupon_by_id(id).await?.ok_or(CartError::MemberCouponNotFound(id))?),
            None => None,
        };

        let mut order = Order::place(member_id, &items, member_coupon.as_mut(), self.delivery_fee)?;
        let mut events = order.take_events();
        if let Some(member_coupon) = member_coupon.as_mut() {
            if !tx.mark_member_coupon_used(member_coupon.id()).await? {
                return Err(CartError::CouponAlreadyUsed(member_coupon.id()));
            }
            events.extend(member_coupon.take_events());
        }
        tx.insert_order(&order).await?;
        let deleted: HashSet<_> = tx.delete_cart_items(&request.item_ids).await?.into_iter().collect();
        if let Some(taken) = request.item_ids.iter().find(|id| !deleted.contains(*id)) {
            return Err(CartError::ItemNotFound(*taken));
        }
        tx.commit().await?;

        info!(
            order_id = %order.id(),
            items_price = %order.items_price(),
            discount_price = %order.discount_price(),
            total_price = %order.total_price(),
            "order placed"
        );
        publish(events);
        Ok(order.id())
    }

    pub async fn find_order(&self, member_id: MemberId, order_id: OrderId) -> Result<Order> {
        let mut tx = self.store.begin().await?;
        let order = tx.find_order_by_id(order_id).await?.ok_or(CartError::OrderNotFound(order_id))?;
        tx.commit().await?;
        order.check_owner(member_id)?;
        Ok(order)
    }

    pub async fn find_orders(&self, member_id: MemberId) -> Result<Vec<Order>> {
        let mut tx = self.store.begin().await?;
        let orders = tx.find_orders_by_member_id(member_id).await?;
        tx.commit().await?;
        Ok(orders)
    }
}
