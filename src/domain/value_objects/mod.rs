//! Value Objects for the cart domain

mod ids;

pub use ids::{CouponId, ItemId, MemberCouponId, MemberId, OrderId, ProductId};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CartError, Result};

/// Money value object, an integral amount of won.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(amount: u64) -> Self { Self(amount) }
    pub const fn amount(&self) -> u64 { self.0 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }

    pub fn plus(&self, other: Money) -> Result<Money> {
        self.0.checked_add(other.0).map(Money).ok_or(CartError::Arithmetic)
    }

    pub fn times(&self, factor: u32) -> Result<Money> {
        self.0.checked_mul(u64::from(factor)).map(Money).ok_or(CartError::Arithmetic)
    }

    /// Subtraction that stops at zero instead of going negative.
    pub fn minus_clamped(&self, other: Money) -> Money { Money(self.0.saturating_sub(other.0)) }

    pub fn sum<I: IntoIterator<Item = Money>>(amounts: I) -> Result<Money> {
        amounts.into_iter().try_fold(Money::ZERO, |acc, m| acc.plus(m))
    }

    /// Storage representation (`BIGINT`).
    pub fn to_i64(&self) -> Result<i64> { i64::try_from(self.0).map_err(|_| CartError::Arithmetic) }
}

impl TryFrom<i64> for Money {
    type Error = CartError;

    fn try_from(value: i64) -> Result<Self> {
        u64::try_from(value).map(Money).map_err(|_| CartError::Arithmetic)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Quantity of a product on a line, always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(CartError::Validation("quantity must be at least 1".into()));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 { self.0 }

    pub fn add(&self, other: Quantity) -> Result<Self> {
        self.0.checked_add(other.0).map(Self).ok_or_else(|| CartError::Validation("quantity too large".into()))
    }

    pub fn to_i32(&self) -> Result<i32> {
        i32::try_from(self.0).map_err(|_| CartError::Validation("quantity too large".into()))
    }
}

impl TryFrom<u32> for Quantity {
    type Error = CartError;
    fn try_from(value: u32) -> Result<Self> { Self::new(value) }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> u32 { q.0 }
}

impl TryFrom<i32> for Quantity {
    type Error = CartError;

    fn try_from(value: i32) -> Result<Self> {
        let value = u32::try_from(value).map_err(|_| CartError::Validation(format!("negative quantity {value}")))?;
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_identities() {
        let m = Money::new(12_500);
        assert_eq!(m.plus(Money::ZERO).unwrap(), m);
        assert_eq!(m.times(0).unwrap(), Money::ZERO);
        assert_eq!(m.times(3).unwrap(), Money::new(37_500));
    }

    #[test]
    fn test_money_overflow() {
        assert!(matches!(Money::new(u64::MAX).times(2), Err(CartError::Arithmetic)));
        assert!(matches!(Money::new(u64::MAX).plus(Money::new(1)), Err(CartError::Arithmetic)));
    }

    #[test]
    fn test_money_minus_clamped() {
        assert_eq!(Money::new(3000).minus_clamped(Money::new(5000)), Money::ZERO);
        assert_eq!(Money::new(5000).minus_clamped(Money::new(3000)), Money::new(2000));
    }

    #[test]
    fn test_money_sum_and_storage() {
        let total = Money::sum([Money::new(20_000), Money::new(5_000)]).unwrap();
        assert_eq!(total, Money::new(25_000));
        assert_eq!(total.to_i64().unwrap(), 25_000);
        assert!(Money::try_from(-1_i64).is_err());
        assert!(Money::new(u64::MAX).to_i64().is_err());
    }

    #[test]
    fn test_money_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Money::new(3000)).unwrap(), "3000");
    }

    #[test]
    fn test_quantity() {
        assert!(matches!(Quantity::new(0), Err(CartError::Validation(_))));
        assert!(Quantity::try_from(-3_i32).is_err());
        let q = Quantity::new(2).unwrap().add(Quantity::new(3).unwrap()).unwrap();
        assert_eq!(q.value(), 5);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }
}
