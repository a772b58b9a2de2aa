//! Members and products: reference data the cart and orders point at.

use tracing::info;
use validator::Validate;

use super::commands::{NewMember, NewProduct};
use crate::domain::aggregates::{Member, Product};
use crate::domain::value_objects::{MemberId, ProductId};
use crate::repository::{MemberRepository, ProductRepository, Store, UnitOfWork};
use crate::{CartError, Result};

#[derive(Debug, Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S: Store> CatalogService<S> {
    pub fn new(store: S) -> Self { Self { store } }

    #[tracing::instrument(skip_all, fields(email = %request.email))]
    pub async fn register_member(&self, request: NewMember) -> Result<Member> {
        request.validate()?;
        let member = Member::new(MemberId::new(), request.email, request.password_hash);
        let mut tx = self.store.begin().await?;
        tx.insert_member(&member).await?;
        tx.commit().await?;
        info!(member_id = %member.id(), "member registered");
        Ok(member)
    }

    #[tracing::instrument(skip_all, fields(name = %request.name))]
    pub async fn add_product(&self, request: NewProduct) -> Result<Product> {
        request.validate()?;
        let product = Product::create(request.name, request.price, request.image_url)?;
        let mut tx = self.store.begin().await?;
        tx.insert_product(&product).await?;
        tx.commit().await?;
        info!(product_id = %product.id(), price = %product.price(), "product added");
        Ok(product)
    }

    pub async fn find_member(&self, id: MemberId) -> Result<Member> {
        let mut tx = self.store.begin().await?;
        let member = tx.find_member_by_id(id).await?.ok_or(CartError::MemberNotFound(id))?;
        tx.commit().await?;
        Ok(member)
    }

    pub async fn find_product(&self, id: ProductId) -> Result<Product> {
        let mut tx = self.store.begin().await?;
        let product = tx.find_product_by_id(id).await?.ok_or(CartError::ProductNotFound(id))?;
        tx.commit().await?;
        Ok(product)
    }

    pub async fn find_products(&self) -> Result<Vec<Product>> {
        let mut tx = self.store.begin().await?;
        let products = tx.find_all_products().await?;
        tx.commit().await?;
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use crate::repository::MemoryStore;

    #[tokio::test]
    async fn test_register_and_find() {
        let catalog = CatalogService::new(MemoryStore::new());
        let member = catalog
            .register_member(NewMember { email: "pizza1@pizza.com".into(), password_hash: "hash".into() })
            .await
            .unwrap();
        assert_eq!(catalog.find_member(member.id()).await.unwrap(), member);

        let product = catalog
            .add_product(NewProduct {
                name: "Chicken".into(),
                price: Money::new(10_000),
                image_url: "https://img.example.com/chicken.png".into(),
            })
            .await
            .unwrap();
        assert_eq!(catalog.find_product(product.id()).await.unwrap(), product);
        assert_eq!(catalog.find_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let catalog = CatalogService::new(MemoryStore::new());
        let result = catalog
            .register_member(NewMember { email: "pizza".into(), password_hash: "hash".into() })
            .await;
        assert!(matches!(result, Err(CartError::Validation(_))));
        assert!(matches!(catalog.find_product(ProductId::new()).await, Err(CartError::ProductNotFound(_))));
    }
}
