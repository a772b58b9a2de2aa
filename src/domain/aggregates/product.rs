//! Product reference data

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Money, ProductId};
use crate::{CartError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
    image_url: String,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Money, image_url: impl Into<String>) -> Self {
        Self { id, name: name.into(), price, image_url: image_url.into() }
    }

    /// Creates a product with a fresh id.
    pub fn create(name: impl Into<String>, price: Money, image_url: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() { return Err(CartError::Validation("product name must not be empty".into())); }
        Ok(Self::new(ProductId::new(), name, price, image_url))
    }

    pub fn id(&self) -> ProductId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn price(&self) -> Money { self.price }
    pub fn image_url(&self) -> &str { &self.image_url }
}
