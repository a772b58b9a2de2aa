//! Domain events
use crate::domain::value_objects::{CouponId, MemberCouponId, MemberId, Money, OrderId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Order(OrderEvent),
    Coupon(CouponEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderEvent {
    Placed { order_id: OrderId, member_id: MemberId, total_price: Money },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CouponEvent {
    Issued { member_coupon_id: MemberCouponId, member_id: MemberId, coupon_id: CouponId },
    Consumed { member_coupon_id: MemberCouponId, member_id: MemberId },
}
