//! Postgres store
//!
//! One unit of work is one `sqlx` transaction. Rows are read into private
//! `FromRow` structs and converted into hydrated domain objects before they
//! leave this module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::{
    CartItemRepository, CouponRepository, MemberCouponRepository, MemberRepository, OrderRepository,
    ProductRepository, Store, UnitOfWork,
};
use crate::domain::aggregates::{
    AppliedCoupon, CartItem, Coupon, DiscountCondition, DiscountPolicy, Item, Member, MemberCoupon, Order,
    OrderItem, OrderPricing, Product,
};
use crate::domain::value_objects::{CouponId, ItemId, MemberCouponId, MemberId, Money, OrderId, ProductId, Quantity};
use crate::{CartError, Result};

const CART_ITEM_SELECT: &str = "SELECT ci.id, ci.member_id, ci.quantity, \
     p.id AS product_id, p.name AS product_name, p.price AS product_price, p.image_url AS product_image_url \
     FROM cart_item ci JOIN product p ON p.id = ci.product_id";

const MEMBER_COUPON_SELECT: &str = "SELECT mc.id AS member_coupon_id, mc.member_id, mc.used, c.* \
     FROM member_coupon mc JOIN coupon c ON c.id = mc.coupon_id";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork> {
        Ok(PgUnitOfWork { tx: self.pool.begin().await? })
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct MemberRow { id: Uuid, email: String, password_hash: String }

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self { Member::new(row.id.into(), row.email, row.password_hash) }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow { id: Uuid, name: String, price: i64, image_url: String }

impl TryFrom<ProductRow> for Product {
    type Error = CartError;
    fn try_from(row: ProductRow) -> Result<Self> {
        Ok(Product::new(row.id.into(), row.name, Money::try_from(row.price)?, row.image_url))
    }
}

/// A cart or order line joined with its product columns.
#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    id: Uuid,
    member_id: Uuid,
    quantity: i32,
    product_id: Uuid,
    product_name: String,
    product_price: i64,
    product_image_url: String,
}

impl LineRow {
    fn into_parts(self) -> Result<(ItemId, MemberId, Product, Quantity)> {
        let product = Product::new(
            self.product_id.into(),
            self.product_name,
            Money::try_from(self.product_price)?,
            self.product_image_url,
        );
        let quantity = Quantity::try_from(self.quantity)
            .map_err(|_| CartError::InvalidRecord(format!("line {} has quantity {}", self.id, self.quantity)))?;
        Ok((self.id.into(), self.member_id.into(), product, quantity))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: Uuid,
    name: String,
    policy_type: String,
    discount_price: i64,
    discount_percent: i16,
    max_discount_price: i64,
    is_free_delivery: bool,
    condition_type: String,
    minimum_price: i64,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = CartError;

    fn try_from(row: CouponRow) -> Result<Self> {
        let invalid = |what: &str| CartError::InvalidRecord(format!("coupon {} has {what}", row.id));
        let policy = match (row.policy_type.as_str(), row.is_free_delivery) {
            ("PRICE", false) => DiscountPolicy::Price { amount: Money::try_from(row.discount_price)? },
            ("PERCENTAGE", false) => DiscountPolicy::Percentage {
                percent: u8::try_from(row.discount_percent).map_err(|_| invalid("an out-of-range percent"))?,
                max_discount: Money::try_from(row.max_discount_price)?,
            },
            ("DELIVERY", true) => DiscountPolicy::Delivery,
            (other, free) => return Err(invalid(&format!("policy {other} with free delivery {free}"))),
        };
        let condition = match row.condition_type.as_str() {
            "NONE" => DiscountCondition::None,
            "MINIMUM_PRICE" => DiscountCondition::MinimumPrice(Money::try_from(row.minimum_price)?),
            other => return Err(invalid(&format!("condition {other}"))),
        };
        Coupon::new(CouponId::from_uuid(row.id), row.name, policy, condition)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberCouponRow {
    member_coupon_id: Uuid,
    member_id: Uuid,
    used: bool,
    #[sqlx(flatten)]
    coupon: CouponRow,
}

impl TryFrom<MemberCouponRow> for MemberCoupon {
    type Error = CartError;
    fn try_from(row: MemberCouponRow) -> Result<Self> {
        let coupon = Coupon::try_from(row.coupon)?;
        Ok(MemberCoupon::new(row.member_coupon_id.into(), row.member_id.into(), coupon, row.used))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    member_id: Uuid,
    member_coupon_id: Option<Uuid>,
    items_price: i64,
    discount_price: i64,
    total_price: i64,
    ordered_at: DateTime<Utc>,
}

// =============================================================================
// Repositories
// =============================================================================

#[async_trait]
impl MemberRepository for PgUnitOfWork {
    async fn find_member_by_id(&mut self, id: MemberId) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>("SELECT id, email, password_hash FROM member WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row.map(Member::from))
    }

    async fn insert_member(&mut self, member: &Member) -> Result<()> {
        sqlx::query("INSERT INTO member (id, email, password_hash) VALUES ($1, $2, $3)")
            .bind(member.id().as_uuid())
            .bind(member.email())
            .bind(member.password_hash())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PgUnitOfWork {
    async fn find_product_by_id(&mut self, id: ProductId) -> Result<Option<Product>> {
        sqlx::query_as::<_, ProductRow>("SELECT id, name, price, image_url FROM product WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?
            .map(Product::try_from)
            .transpose()
    }

    async fn find_all_products(&mut self) -> Result<Vec<Product>> {
        sqlx::query_as::<_, ProductRow>("SELECT id, name, price, image_url FROM product ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    async fn insert_product(&mut self, product: &Product) -> Result<()> {
        sqlx::query("INSERT INTO product (id, name, price, image_url) VALUES ($1, $2, $3, $4)")
            .bind(product.id().as_uuid())
            .bind(product.name())
            .bind(product.price().to_i64()?)
            .bind(product.image_url())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}

fn cart_item_from_row(row: LineRow) -> Result<CartItem> {
    let (id, member_id, product, quantity) = row.into_parts()?;
    Ok(CartItem::new(id, member_id, product, quantity))
}

fn uuids<I: Copy + Into<Uuid>>(ids: &[I]) -> Vec<Uuid> {
    ids.iter().map(|id| (*id).into()).collect()
}

#[async_trait]
impl CartItemRepository for PgUnitOfWork {
    async fn find_cart_item_by_id(&mut self, id: ItemId) -> Result<Option<CartItem>> {
        sqlx::query_as::<_, LineRow>(&format!("{CART_ITEM_SELECT} WHERE ci.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?
            .map(cart_item_from_row)
            .transpose()
    }

    async fn find_cart_items_by_ids(&mut self, ids: &[ItemId]) -> Result<Vec<CartItem>> {
        if ids.is_empty() { return Ok(vec![]); }
        // Rows are locked in id order.
        sqlx::query_as::<_, LineRow>(&format!("{CART_ITEM_SELECT} WHERE ci.id = ANY($1) ORDER BY ci.id FOR UPDATE OF ci"))
            .bind(uuids(ids))
            .fetch_all(&mut *self.tx)
            .await?
            .into_iter()
            .map(cart_item_from_row)
            .collect()
    }

    async fn find_cart_items_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<CartItem>> {
        sqlx::query_as::<_, LineRow>(&format!("{CART_ITEM_SELECT} WHERE ci.member_id = $1 ORDER BY ci.id"))
            .bind(member_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await?
            .into_iter()
            .map(cart_item_from_row)
            .collect()
    }

    async fn add_cart_item(&mut self, item: &CartItem) -> Result<CartItem> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO cart_item (id, member_id, product_id, quantity) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (member_id, product_id) DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity \
             RETURNING id",
        )
        .bind(item.id().as_uuid())
        .bind(item.member_id().as_uuid())
        .bind(item.product().id().as_uuid())
        .bind(item.quantity().to_i32()?)
        .fetch_one(&mut *self.tx)
        .await?;
        let id = ItemId::from_uuid(id);
        self.find_cart_item_by_id(id).await?.ok_or(CartError::ItemNotFound(id))
    }

    async fn update_cart_item(&mut self, item: &CartItem) -> Result<()> {
        let updated = sqlx::query("UPDATE cart_item SET quantity = $2 WHERE id = $1")
            .bind(item.id().as_uuid())
            .bind(item.quantity().to_i32()?)
            .execute(&mut *self.tx)
            .await?
            .rows_affected();
        if updated == 0 { return Err(CartError::ItemNotFound(item.id())); }
        Ok(())
    }

    async fn delete_cart_item(&mut self, id: ItemId) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM cart_item WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    async fn delete_cart_items(&mut self, ids: &[ItemId]) -> Result<Vec<ItemId>> {
        if ids.is_empty() { return Ok(vec![]); }
        let deleted: Vec<Uuid> = sqlx::query_scalar("DELETE FROM cart_item WHERE id = ANY($1) RETURNING id")
            .bind(uuids(ids))
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(deleted.into_iter().map(ItemId::from_uuid).collect())
    }
}

#[async_trait]
impl CouponRepository for PgUnitOfWork {
    async fn find_coupon_by_id(&mut self, id: CouponId) -> Result<Option<Coupon>> {
        sqlx::query_as::<_, CouponRow>("SELECT * FROM coupon WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?
            .map(Coupon::try_from)
            .transpose()
    }

    async fn insert_coupon(&mut self, coupon: &Coupon) -> Result<()> {
        let (discount_price, discount_percent, max_discount_price) = match *coupon.policy() {
            DiscountPolicy::Price { amount } => (amount, 0_i16, Money::ZERO),
            DiscountPolicy::Percentage { percent, max_discount } => (Money::ZERO, i16::from(percent), max_discount),
            DiscountPolicy::Delivery => (Money::ZERO, 0, Money::ZERO),
        };
        let minimum_price = match *coupon.condition() {
            DiscountCondition::None => Money::ZERO,
            DiscountCondition::MinimumPrice(threshold) => threshold,
        };
        sqlx::query(
            "INSERT INTO coupon (id, name, policy_type, discount_price, discount_percent, max_discount_price, \
             is_free_delivery, condition_type, minimum_price) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(coupon.id().as_uuid())
        .bind(coupon.name())
        .bind(coupon.policy().policy_type())
        .bind(discount_price.to_i64()?)
        .bind(discount_percent)
        .bind(max_discount_price.to_i64()?)
        .bind(coupon.policy().is_free_delivery())
        .bind(coupon.condition().condition_type())
        .bind(minimum_price.to_i64()?)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl MemberCouponRepository for PgUnitOfWork {
    async fn find_member_coupon_by_id(&mut self, id: MemberCouponId) -> Result<Option<MemberCoupon>> {
        sqlx::query_as::<_, MemberCouponRow>(&format!("{MEMBER_COUPON_SELECT} WHERE mc.id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?
            .map(MemberCoupon::try_from)
            .transpose()
    }

    async fn find_unused_member_coupons_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<MemberCoupon>> {
        sqlx::query_as::<_, MemberCouponRow>(&format!(
            "{MEMBER_COUPON_SELECT} WHERE mc.member_id = $1 AND mc.used = FALSE ORDER BY mc.id"
        ))
        .bind(member_id.as_uuid())
        .fetch_all(&mut *self.tx)
        .await?
        .into_iter()
        .map(MemberCoupon::try_from)
        .collect()
    }

    async fn insert_member_coupon(&mut self, member_coupon: &MemberCoupon) -> Result<()> {
        self.insert_member_coupons(std::slice::from_ref(member_coupon)).await
    }

    async fn insert_member_coupons(&mut self, member_coupons: &[MemberCoupon]) -> Result<()> {
        if member_coupons.is_empty() { return Ok(()); }
        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO member_coupon (id, member_id, coupon_id, used) ");
        builder.push_values(member_coupons, |mut row, mc| {
            row.push_bind(mc.id().as_uuid())
                .push_bind(mc.member_id().as_uuid())
                .push_bind(mc.coupon().id().as_uuid())
                .push_bind(mc.is_used());
        });
        builder.build().execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn mark_member_coupon_used(&mut self, id: MemberCouponId) -> Result<bool> {
        let updated = sqlx::query("UPDATE member_coupon SET used = TRUE WHERE id = $1 AND used = FALSE")
            .bind(id.as_uuid())
            .execute(&mut *self.tx)
            .await?
            .rows_affected();
        Ok(updated == 1)
    }
}

impl PgUnitOfWork {
    async fn hydrate_order(&mut self, row: OrderRow) -> Result<Order> {
        let coupon = match row.member_coupon_id {
            Some(member_coupon_id) => {
                let coupon_row = sqlx::query_as::<_, CouponRow>(
                    "SELECT c.* FROM coupon c JOIN member_coupon mc ON mc.coupon_id = c.id WHERE mc.id = $1",
                )
                .bind(member_coupon_id)
                .fetch_one(&mut *self.tx)
                .await?;
                Some(AppliedCoupon { member_coupon_id: member_coupon_id.into(), coupon: Coupon::try_from(coupon_row)? })
            }
            None => None,
        };
        let items = sqlx::query_as::<_, LineRow>(
            "SELECT id, member_id, quantity, product_id, product_name, product_price, product_image_url \
             FROM order_item WHERE order_id = $1 ORDER BY position",
        )
        .bind(row.id)
        .fetch_all(&mut *self.tx)
        .await?
        .into_iter()
        .map(|line| {
            let (id, member_id, product, quantity) = line.into_parts()?;
            Ok(OrderItem::new(id, member_id, product, quantity))
        })
        .collect::<Result<Vec<_>>>()?;
        let pricing = OrderPricing {
            items_price: Money::try_from(row.items_price)?,
            discount_price: Money::try_from(row.discount_price)?,
            total_price: Money::try_from(row.total_price)?,
        };
        Ok(Order::restore(row.id.into(), row.member_id.into(), coupon, items, pricing, row.ordered_at))
    }
}

#[async_trait]
impl OrderRepository for PgUnitOfWork {
    async fn insert_order(&mut self, order: &Order) -> Result<()> {
        let pricing = order.pricing();
        sqlx::query(
            "INSERT INTO orders (id, member_id, member_coupon_id, items_price, discount_price, total_price, ordered_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(order.id().as_uuid())
        .bind(order.member_id().as_uuid())
        .bind(order.coupon().map(|c| c.member_coupon_id.as_uuid()))
        .bind(pricing.items_price.to_i64()?)
        .bind(pricing.discount_price.to_i64()?)
        .bind(pricing.total_price.to_i64()?)
        .bind(order.ordered_at())
        .execute(&mut *self.tx)
        .await?;

        for (position, item) in (0_i32..).zip(order.items()) {
            sqlx::query(
                "INSERT INTO order_item (id, order_id, position, member_id, product_id, product_name, product_price, \
                 product_image_url, quantity) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(item.id().as_uuid())
            .bind(order.id().as_uuid())
            .bind(position)
            .bind(item.member_id().as_uuid())
            .bind(item.product().id().as_uuid())
            .bind(item.product().name())
            .bind(item.product().price().to_i64()?)
            .bind(item.product().image_url())
            .bind(item.quantity().to_i32()?)
            .execute(&mut *self.tx)
            .await?;
        }
        Ok(())
    }

    async fn find_order_by_id(&mut self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await?;
        match row {
            Some(row) => Ok(Some(self.hydrate_order(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_orders_by_member_id(&mut self, member_id: MemberId) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE member_id = $1 ORDER BY ordered_at, id")
            .bind(member_id.as_uuid())
            .fetch_all(&mut *self.tx)
            .await?;
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.hydrate_order(row).await?);
        }
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{OrderService, PlaceOrder};
    use crate::test::db::TestDb;
    use crate::test::helpers::{issue_coupon, seed_cart_item, seed_member, seed_price_coupon, seed_product};

    fn coupon_row(policy_type: &str, is_free_delivery: bool, condition_type: &str) -> CouponRow {
        CouponRow {
            id: Uuid::now_v7(),
            name: "3000 off above 20000".into(),
            policy_type: policy_type.into(),
            discount_price: 3_000,
            discount_percent: 10,
            max_discount_price: 5_000,
            is_free_delivery,
            condition_type: condition_type.into(),
            minimum_price: 20_000,
        }
    }

    #[test]
    fn test_coupon_row_conversion() {
        let price = Coupon::try_from(coupon_row("PRICE", false, "MINIMUM_PRICE")).unwrap();
        assert_eq!(price.policy(), &DiscountPolicy::Price { amount: Money::new(3_000) });
        assert_eq!(price.condition(), &DiscountCondition::MinimumPrice(Money::new(20_000)));

        let percent = Coupon::try_from(coupon_row("PERCENTAGE", false, "NONE")).unwrap();
        assert_eq!(percent.policy(), &DiscountPolicy::Percentage { percent: 10, max_discount: Money::new(5_000) });

        let delivery = Coupon::try_from(coupon_row("DELIVERY", true, "NONE")).unwrap();
        assert!(delivery.policy().is_free_delivery());
    }

    #[test]
    fn test_coupon_row_rejects_unknown_values() {
        assert!(matches!(Coupon::try_from(coupon_row("BOGO", false, "NONE")), Err(CartError::InvalidRecord(_))));
        assert!(matches!(Coupon::try_from(coupon_row("DELIVERY", false, "NONE")), Err(CartError::InvalidRecord(_))));
        assert!(matches!(Coupon::try_from(coupon_row("PRICE", false, "WEEKDAY")), Err(CartError::InvalidRecord(_))));
    }

    #[test]
    fn test_line_row_rejects_zero_quantity() {
        let row = LineRow {
            id: Uuid::now_v7(),
            member_id: Uuid::now_v7(),
            quantity: 0,
            product_id: Uuid::now_v7(),
            product_name: "Pizza".into(),
            product_price: 1_000,
            product_image_url: String::new(),
        };
        assert!(matches!(row.into_parts(), Err(CartError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn test_member_coupon_compare_and_set() {
        let Some(db) = TestDb::new().await else { return };
        let store = PgStore::new(db.pool.clone());
        let member = seed_member(&store, "pizza1@pizza.com").await;
        let coupon = seed_price_coupon(&store).await;
        let issued = issue_coupon(&store, member.id(), &coupon).await;

        let mut tx = store.begin().await.unwrap();
        let found = tx.find_member_coupon_by_id(issued.id()).await.unwrap().unwrap();
        assert_eq!(found.coupon(), &coupon);
        assert_eq!(found.member_id(), member.id());
        assert!(!found.is_used());
        assert!(tx.mark_member_coupon_used(issued.id()).await.unwrap());
        assert!(!tx.mark_member_coupon_used(issued.id()).await.unwrap());
        assert!(tx.find_unused_member_coupons_by_member_id(member.id()).await.unwrap().is_empty());
        drop(tx);

        let mut tx = store.begin().await.unwrap();
        let unused = tx.find_unused_member_coupons_by_member_id(member.id()).await.unwrap();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].id(), issued.id());
        drop(tx);
        db.cleanup().await;
    }

    #[tokio::test]
    async fn test_cart_lines_merge_per_product() {
        let Some(db) = TestDb::new().await else { return };
        let store = PgStore::new(db.pool.clone());
        let member = seed_member(&store, "pizza1@pizza.com").await;
        let product = seed_product(&store, "chicken", 10_000).await;
        let first = seed_cart_item(&store, member.id(), &product, 1).await;
        let second = seed_cart_item(&store, member.id(), &product, 2).await;
        assert_eq!(first, second);

        let mut tx = store.begin().await.unwrap();
        let lines = tx.find_cart_items_by_member_id(member.id()).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity().value(), 3);
        assert_eq!(lines[0].product(), &product);

        let deleted = tx.delete_cart_items(&[first, ItemId::new()]).await.unwrap();
        assert_eq!(deleted, vec![first]);
        assert!(!tx.delete_cart_item(first).await.unwrap());
        tx.commit().await.unwrap();
        db.cleanup().await;
    }

    #[tokio::test]
    async fn test_order_round_trip() {
        let Some(db) = TestDb::new().await else { return };
        let store = PgStore::new(db.pool.clone());
        let member = seed_member(&store, "pizza1@pizza.com").await;
        let chicken = seed_product(&store, "chicken", 10_000).await;
        let salad = seed_product(&store, "salad", 15_000).await;
        let coupon = seed_price_coupon(&store).await;
        let issued = issue_coupon(&store, member.id(), &coupon).await;
        let lines = vec![
            seed_cart_item(&store, member.id(), &salad, 1).await,
            seed_cart_item(&store, member.id(), &chicken, 2).await,
        ];

        let service = OrderService::new(store.clone(), Money::new(3_000));
        let order_id = service.place_order(member.id(), PlaceOrder::new(lines.clone(), Some(issued.id()))).await.unwrap();

        let order = service.find_order(member.id(), order_id).await.unwrap();
        assert_eq!(order.items_price(), Money::new(35_000));
        assert_eq!(order.discount_price(), Money::new(3_000));
        assert_eq!(order.total_price(), Money::new(32_000));
        let applied = order.coupon().unwrap();
        assert_eq!(applied.member_coupon_id, issued.id());
        assert_eq!(applied.coupon, coupon);
        let names: Vec<_> = order.items().iter().map(|item| item.product().name()).collect();
        assert_eq!(names, ["salad", "chicken"]);
        assert_eq!(order.items()[1].quantity().value(), 2);
        assert_eq!(service.find_orders(member.id()).await.unwrap().len(), 1);

        let mut tx = store.begin().await.unwrap();
        assert!(tx.find_cart_items_by_ids(&lines).await.unwrap().is_empty());
        assert!(tx.find_member_coupon_by_id(issued.id()).await.unwrap().unwrap().is_used());
        drop(tx);
        db.cleanup().await;
    }
}
