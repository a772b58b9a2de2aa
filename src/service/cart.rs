//! Cart lines of a member.

use tracing::info;

use crate::domain::aggregates::{total_price_of, CartItem, Item};
use crate::domain::value_objects::{ItemId, MemberId, Money, ProductId, Quantity};
use crate::repository::{CartItemRepository, MemberRepository, ProductRepository, Store, UnitOfWork};
use crate::{CartError, Result};

#[derive(Debug, Clone)]
pub struct CartService<S> {
    store: S,
}

impl<S: Store> CartService<S> {
    pub fn new(store: S) -> Self { Self { store } }

    /// Puts `quantity` of a product in the member's cart. A product already in
    /// the cart gets its line quantity increased instead of a second line.
    #[tracing::instrument(skip_all, fields(member_id = %member_id, product_id = %product_id, quantity = quantity))]
    pub async fn add_item(&self, member_id: MemberId, product_id: ProductId, quantity: u32) -> Result<ItemId> {
        let quantity = Quantity::new(quantity)?;
        let mut tx = self.store.begin().await?;
        tx.find_member_by_id(member_id).await?.ok_or(CartError::MemberNotFound(member_id))?;
        let product = tx.find_product_by_id(product_id).await?.ok_or(CartError::ProductNotFound(product_id))?;
        let item = tx.add_cart_item(&CartItem::create(member_id, product, quantity)).await?;
        tx.commit().await?;
        info!(item_id = %item.id(), line_quantity = item.quantity().value(), "cart item added");
        Ok(item.id())
    }

    #[tracing::instrument(skip_all, fields(member_id = %member_id, item_id = %item_id))]
    pub async fn change_quantity(&self, member_id: MemberId, item_id: ItemId, quantity: u32) -> Result<CartItem> {
        let mut tx = self.store.begin().await?;
        let mut item = tx.find_cart_item_by_id(item_id).await?.ok_or(CartError::ItemNotFound(item_id))?;
        item.check_owner(member_id)?;
        item.change_quantity(quantity)?;
        tx.update_cart_item(&item).await?;
        tx.commit().await?;
        info!(quantity, "cart item quantity changed");
        Ok(item)
    }

    #[tracing::instrument(skip_all, fields(member_id = %member_id, item_id = %item_id))]
    pub async fn remove_item(&self, member_id: MemberId, item_id: ItemId) -> Result<()> {
        let mut tx = self.store.begin().await?;
        let item = tx.find_cart_item_by_id(item_id).await?.ok_or(CartError::ItemNotFound(item_id))?;
        item.check_owner(member_id)?;
        if !tx.delete_cart_item(item_id).await? {
            return Err(CartError::ItemNotFound(item_id));
        }
        tx.commit().await?;
        info!("cart item removed");
        Ok(())
    }

    pub async fn find_items(&self, member_id: MemberId) -> Result<Vec<CartItem>> {
        let mut tx = self.store.begin().await?;
        let items = tx.find_cart_items_by_member_id(member_id).await?;
        tx.commit().await?;
        Ok(items)
    }

    /// Price of everything in the member's cart, before any coupon.
    pub async fn total_price(&self, member_id: MemberId) -> Result<Money> {
        total_price_of(&self.find_items(member_id).await?)
    }
}
