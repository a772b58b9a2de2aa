//! Order Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::item::total_price_of;
use crate::domain::aggregates::{CartItem, Coupon, Item, MemberCoupon, OrderItem};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::{MemberCouponId, MemberId, Money, OrderId};
use crate::{CartError, Result};

/// Price breakdown frozen into an order when it is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPricing {
    pub items_price: Money,
    pub discount_price: Money,
    pub total_price: Money,
}

impl OrderPricing {
    pub fn new(items_price: Money, discount_price: Money) -> Self {
        Self { items_price, discount_price, total_price: items_price.minus_clamped(discount_price) }
    }
}

/// Coupon applied to an order, together with the issuance it consumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupon {
    pub member_coupon_id: MemberCouponId,
    pub coupon: Coupon,
}

#[derive(Clone, Debug)]
pub struct Order {
    id: OrderId,
    member_id: MemberId,
    coupon: Option<AppliedCoupon>,
    items: Vec<OrderItem>,
    pricing: OrderPricing,
    ordered_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl Order {
    /// Prices `cart_items` for `member_id`, consuming `member_coupon` if one is given.
    ///
    /// Every line must belong to the member. The lines are copied into frozen
    /// order items; the cart items themselves are left untouched.
    pub fn place(
        member_id: MemberId,
        cart_items: &[CartItem],
        member_coupon: Option<&mut MemberCoupon>,
        delivery_fee: Money,
    ) -> Result<Self> {
        if cart_items.is_empty() { return Err(CartError::Validation("order must contain at least one item".into())); }
        for item in cart_items {
            item.check_owner(member_id)?;
        }
        let items_price = total_price_of(cart_items)?;

        let (coupon, discount_price) = match member_coupon {
            Some(member_coupon) => {
                member_coupon.consume(member_id)?;
                let discount = member_coupon.coupon().calculate_discount(items_price, delivery_fee);
                let applied = AppliedCoupon { member_coupon_id: member_coupon.id(), coupon: member_coupon.coupon().clone() };
                (Some(applied), discount)
            }
            None => (None, Money::ZERO),
        };

        let mut order = Self {
            id: OrderId::new(),
            member_id,
            coupon,
            items: cart_items.iter().map(OrderItem::snapshot).collect(),
            pricing: OrderPricing::new(items_price, discount_price),
            ordered_at: Utc::now(),
            events: vec![],
        };
        order.raise_event(DomainEvent::Order(OrderEvent::Placed {
            order_id: order.id,
            member_id,
            total_price: order.pricing.total_price,
        }));
        Ok(order)
    }

    /// Rebuilds a stored order without re-pricing it.
    pub fn restore(
        id: OrderId,
        member_id: MemberId,
        coupon: Option<AppliedCoupon>,
        items: Vec<OrderItem>,
        pricing: OrderPricing,
        ordered_at: DateTime<Utc>,
    ) -> Self {
        Self { id, member_id, coupon, items, pricing, ordered_at, events: vec![] }
    }

    pub fn id(&self) -> OrderId { self.id }
    pub fn member_id(&self) -> MemberId { self.member_id }
    pub fn coupon(&self) -> Option<&AppliedCoupon> { self.coupon.as_ref() }
    pub fn items(&self) -> &[OrderItem] { &self.items }
    pub fn pricing(&self) -> OrderPricing { self.pricing }
    pub fn items_price(&self) -> Money { self.pricing.items_price }
    pub fn discount_price(&self) -> Money { self.pricing.discount_price }
    pub fn total_price(&self) -> Money { self.pricing.total_price }
    pub fn ordered_at(&self) -> DateTime<Utc> { self.ordered_at }

    pub fn check_owner(&self, member_id: MemberId) -> Result<()> {
        if self.member_id != member_id {
            return Err(CartError::ownership(member_id, format!("order {}", self.id)));
        }
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}
