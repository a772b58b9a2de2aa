//! Member reference data

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::MemberId;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    email: String,
    #[serde(skip_serializing)]
    password_hash: String,
}

impl Member {
    pub fn new(id: MemberId, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self { id, email: email.into(), password_hash: password_hash.into() }
    }

    pub fn id(&self) -> MemberId { self.id }
    pub fn email(&self) -> &str { &self.email }
    pub fn password_hash(&self) -> &str { &self.password_hash }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for Member {}
