//! Coupon: a discount policy guarded by a discount condition

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::{CouponId, Money};
use crate::{CartError, Result};

/// How much a coupon takes off once its condition holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountPolicy {
    /// Flat amount off the order.
    Price { amount: Money },
    /// Percentage of the order, capped at `max_discount` unless it is zero.
    Percentage { percent: u8, max_discount: Money },
    /// Waives the delivery fee.
    Delivery,
}

impl DiscountPolicy {
    pub fn is_free_delivery(&self) -> bool { matches!(self, Self::Delivery) }

    pub fn policy_type(&self) -> &'static str {
        match self {
            Self::Price { .. } => "PRICE",
            Self::Percentage { .. } => "PERCENTAGE",
            Self::Delivery => "DELIVERY",
        }
    }

    fn discount(&self, order_total: Money, delivery_fee: Money) -> Money {
        match *self {
            Self::Price { amount } => amount,
            Self::Percentage { percent, max_discount } => {
                // u64 * 100 fits in u128
                let raw = u128::from(order_total.amount()) * u128::from(percent) / 100;
                let raw = Money::new(u64::try_from(raw).unwrap_or(u64::MAX));
                if max_discount.is_zero() { raw } else { raw.min(max_discount) }
            }
            Self::Delivery => delivery_fee,
        }
    }
}

/// When a coupon applies at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "threshold", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountCondition {
    None,
    MinimumPrice(Money),
}

impl DiscountCondition {
    pub fn is_satisfied_by(&self, order_total: Money) -> bool {
        match *self {
            Self::None => true,
            Self::MinimumPrice(threshold) => order_total >= threshold,
        }
    }

    pub fn condition_type(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::MinimumPrice(_) => "MINIMUM_PRICE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    id: CouponId,
    name: String,
    policy: DiscountPolicy,
    condition: DiscountCondition,
}

impl Coupon {
    pub fn new(id: CouponId, name: impl Into<String>, policy: DiscountPolicy, condition: DiscountCondition) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CartError::Validation("coupon name must not be empty".into()));
        }
        if let DiscountPolicy::Percentage { percent, .. } = policy {
            if !(1..=100).contains(&percent) {
                return Err(CartError::Validation(format!("discount percent {percent} is outside 1..=100")));
            }
        }
        Ok(Self { id, name, policy, condition })
    }

    pub fn id(&self) -> CouponId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn policy(&self) -> &DiscountPolicy { &self.policy }
    pub fn condition(&self) -> &DiscountCondition { &self.condition }

    /// Discount this coupon grants on `order_total`. Never exceeds the total.
    pub fn calculate_discount(&self, order_total: Money, delivery_fee: Money) -> Money {
        if !self.condition.is_satisfied_by(order_total) {
            return Money::ZERO;
        }
        self.policy.discount(order_total, delivery_fee).min(order_total)
    }
}

impl fmt::Display for Coupon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "coupon {} ({})", self.id, self.name) }
}
