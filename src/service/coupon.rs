//! Coupon definitions and their issuance to members.

use tracing::info;
use validator::Validate;

use super::commands::NewCoupon;
use super::publish;
use crate::domain::aggregates::{Coupon, MemberCoupon};
use crate::domain::value_objects::{CouponId, MemberCouponId, MemberId};
use crate::repository::{CouponRepository, MemberCouponRepository, MemberRepository, Store, UnitOfWork};
use crate::{CartError, Result};

#[derive(Debug, Clone)]
pub struct CouponService<S> {
    store: S,
}

impl<S: Store> CouponService<S> {
    pub fn new(store: S) -> Self { Self { store } }

    #[tracing::instrument(skip_all, fields(name = %request.name))]
    pub async fn create_coupon(&self, request: NewCoupon) -> Result<Coupon> {
        request.validate()?;
        let coupon = Coupon::new(CouponId::new(), request.name, request.policy, request.condition)?;
        let mut tx = self.store.begin().await?;
        tx.insert_coupon(&coupon).await?;
        tx.commit().await?;
        info!(coupon_id = %coupon.id(), policy = coupon.policy().policy_type(), "coupon created");
        Ok(coupon)
    }

    pub async fn issue(&self, member_id: MemberId, coupon_id: CouponId) -> Result<MemberCouponId> {
        let mut ids = self.issue_to_all(&[member_id], coupon_id).await?;
        ids.pop().ok_or_else(|| CartError::InvalidRecord("issuance produced no member coupon".into()))
    }

    /// Issues one fresh, unused copy of the coupon to each member.
    #[tracing::instrument(skip_all, fields(members = member_ids.len(), coupon_id = %coupon_id))]
    pub async fn issue_to_all(&self, member_ids: &[MemberId], coupon_id: CouponId) -> Result<Vec<MemberCouponId>> {
        let mut tx = self.store.begin().await?;
        let coupon = tx
            .find_coupon_by_id(coupon_id)
            .await?
            .ok_or(CartError::CouponNotFound(coupon_id))?;
        for &member_id in member_ids {
            tx.find_member_by_id(member_id).await?.ok_or(CartError::MemberNotFound(member_id))?;
        }
        let mut issued: Vec<MemberCoupon> =
            member_ids.iter().map(|&member_id| MemberCoupon::issue(member_id, coupon.clone())).collect();
        tx.insert_member_coupons(&issued).await?;
        tx.commit().await?;

        publish(issued.iter_mut().flat_map(MemberCoupon::take_events).collect());
        Ok(issued.iter().map(MemberCoupon::id).collect())
    }

    /// Coupons the member still holds and can apply to an order.
    pub async fn find_unused_coupons(&self, member_id: MemberId) -> Result<Vec<MemberCoupon>> {
        let mut tx = self.store.begin().await?;
        let coupons = tx.find_unused_member_coupons_by_member_id(member_id).await?;
        tx.commit().await?;
        Ok(coupons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{DiscountCondition, DiscountPolicy, Member};
    use crate::domain::value_objects::Money;
    use crate::repository::MemoryStore;

    async fn members(store: &MemoryStore, count: usize) -> Vec<MemberId> {
        let mut tx = store.begin().await.unwrap();
        let mut ids = vec![];
        for n in 0..count {
            let member = Member::new(MemberId::new(), format!("pizza{n}@pizza.com"), "hash");
            tx.insert_member(&member).await.unwrap();
            ids.push(member.id());
        }
        tx.commit().await.unwrap();
        ids
    }

    fn three_thousand_off() -> NewCoupon {
        NewCoupon {
            name: "3000 off above 20000".into(),
            policy: DiscountPolicy::Price { amount: Money::new(3_000) },
            condition: DiscountCondition::MinimumPrice(Money::new(20_000)),
        }
    }

    #[tokio::test]
    async fn test_issue_to_all_members() {
        let store = MemoryStore::new();
        let ids = members(&store, 2).await;
        let service = CouponService::new(store);
        let coupon = service.create_coupon(three_thousand_off()).await.unwrap();

        let issued = service.issue_to_all(&ids, coupon.id()).await.unwrap();
        assert_eq!(issued.len(), 2);
        for member_id in ids {
            let unused = service.find_unused_coupons(member_id).await.unwrap();
            assert_eq!(unused.len(), 1);
            assert_eq!(unused[0].coupon(), &coupon);
            assert!(!unused[0].is_used());
        }
    }

    #[tokio::test]
    async fn test_issue_unknown_coupon_or_member() {
        let store = MemoryStore::new();
        let ids = members(&store, 1).await;
        let service = CouponService::new(store);
        assert!(matches!(service.issue(ids[0], CouponId::new()).await, Err(CartError::CouponNotFound(_))));

        let coupon = service.create_coupon(three_thousand_off()).await.unwrap();
        let result = service.issue_to_all(&[ids[0], MemberId::new()], coupon.id()).await;
        assert!(matches!(result, Err(CartError::MemberNotFound(_))));
        assert!(service.find_unused_coupons(ids[0]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_coupon_validation() {
        let service = CouponService::new(MemoryStore::new());
        let mut request = three_thousand_off();
        request.name = String::new();
        assert!(matches!(service.create_coupon(request).await, Err(CartError::Validation(_))));
    }
}
