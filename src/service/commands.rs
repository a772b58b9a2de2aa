//! Validated inputs accepted by the services.

use serde::Deserialize;
use validator::Validate;

use crate::domain::aggregates::{DiscountCondition, DiscountPolicy};
use crate::domain::value_objects::{ItemId, MemberCouponId, Money};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMember {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub price: Money,
    #[validate(url)]
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCoupon {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub policy: DiscountPolicy,
    pub condition: DiscountCondition,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    pub item_ids: Vec<ItemId>,
    pub member_coupon_id: Option<MemberCouponId>,
}

impl PlaceOrder {
    pub fn new(item_ids: Vec<ItemId>, member_coupon_id: Option<MemberCouponId>) -> Self {
        Self { item_ids, member_coupon_id }
    }
}
