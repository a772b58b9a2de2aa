//! Seeding helpers that work against any store.

use crate::domain::aggregates::{
    CartItem, Coupon, DiscountCondition, DiscountPolicy, Item, Member, MemberCoupon, Product,
};
use crate::domain::value_objects::{CouponId, ItemId, MemberId, Money, ProductId, Quantity};
use crate::repository::{
    CartItemRepository, CouponRepository, MemberCouponRepository, MemberRepository, ProductRepository, Store,
    UnitOfWork,
};

pub async fn seed_member<S: Store>(store: &S, email: &str) -> Member {
    let member = Member::new(MemberId::new(), email, "hash");
    let mut tx = store.begin().await.unwrap();
    tx.insert_member(&member).await.unwrap();
    tx.commit().await.unwrap();
    member
}

pub async fn seed_product<S: Store>(store: &S, name: &str, price: u64) -> Product {
    let product = Product::new(ProductId::new(), name, Money::new(price), format!("https://img.example.com/{name}.png"));
    let mut tx = store.begin().await.unwrap();
    tx.insert_product(&product).await.unwrap();
    tx.commit().await.unwrap();
    product
}

pub async fn seed_cart_item<S: Store>(store: &S, member_id: MemberId, product: &Product, quantity: u32) -> ItemId {
    let item = CartItem::create(member_id, product.clone(), Quantity::new(quantity).unwrap());
    let mut tx = store.begin().await.unwrap();
    let stored = tx.add_cart_item(&item).await.unwrap();
    tx.commit().await.unwrap();
    stored.id()
}

/// 3000 off orders of at least 20000.
pub async fn seed_price_coupon<S: Store>(store: &S) -> Coupon {
    let coupon = Coupon::new(
        CouponId::new(),
        "3000 off above 20000",
        DiscountPolicy::Price { amount: Money::new(3_000) },
        DiscountCondition::MinimumPrice(Money::new(20_000)),
    )
    .unwrap();
    let mut tx = store.begin().await.unwrap();
    tx.insert_coupon(&coupon).await.unwrap();
    tx.commit().await.unwrap();
    coupon
}

pub async fn issue_coupon<S: Store>(store: &S, member_id: MemberId, coupon: &Coupon) -> MemberCoupon {
    let issued = MemberCoupon::issue(member_id, coupon.clone());
    let mut tx = store.begin().await.unwrap();
    tx.insert_member_coupon(&issued).await.unwrap();
    tx.commit().await.unwrap();
    issued
}
