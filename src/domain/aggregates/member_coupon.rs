//! MemberCoupon: one coupon issued to one member, usable once

use crate::domain::aggregates::Coupon;
use crate::domain::events::{CouponEvent, DomainEvent};
use crate::domain::value_objects::{MemberCouponId, MemberId};
use crate::{CartError, Result};

#[derive(Clone, Debug)]
pub struct MemberCoupon {
    id: MemberCouponId,
    member_id: MemberId,
    coupon: Coupon,
    used: bool,
    events: Vec<DomainEvent>,
}

impl MemberCoupon {
    /// Rehydrates an issuance loaded from storage.
    pub fn new(id: MemberCouponId, member_id: MemberId, coupon: Coupon, used: bool) -> Self {
        Self { id, member_id, coupon, used, events: vec![] }
    }

    pub fn issue(member_id: MemberId, coupon: Coupon) -> Self {
        let mut issued = Self::new(MemberCouponId::new(), member_id, coupon, false);
        issued.raise_event(DomainEvent::Coupon(CouponEvent::Issued {
            member_coupon_id: issued.id,
            member_id,
            coupon_id: issued.coupon.id(),
        }));
        issued
    }

    pub fn id(&self) -> MemberCouponId { self.id }
    pub fn member_id(&self) -> MemberId { self.member_id }
    pub fn coupon(&self) -> &Coupon { &self.coupon }
    pub fn is_used(&self) -> bool { self.used }

    pub fn check_owner(&self, member_id: MemberId) -> Result<()> {
        if self.member_id != member_id {
            return Err(CartError::ownership(member_id, format!("member coupon {}", self.id)));
        }
        Ok(())
    }

    /// Marks the coupon used. Fails on every attempt after the first.
    pub fn consume(&mut self, member_id: MemberId) -> Result<()> {
        self.check_owner(member_id)?;
        if self.used {
            return Err(CartError::CouponAlreadyUsed(self.id));
        }
        self.used = true;
        self.raise_event(DomainEvent::Coupon(CouponEvent::Consumed { member_coupon_id: self.id, member_id }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}
