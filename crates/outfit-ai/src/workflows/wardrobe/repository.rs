use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::outfits::domain::Garment;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for each user's wardrobe. Generation only ever reads a snapshot.
pub trait WardrobeRepository: Send + Sync {
    /// All garments owned by `user`; an unknown user has an empty wardrobe.
    fn garments(&self, user: &UserId) -> Result<Vec<Garment>, RepositoryError>;
    /// Replaces the whole wardrobe, e.g. after an import.
    fn replace(&self, user: &UserId, garments: Vec<Garment>) -> Result<(), RepositoryError>;
    /// Persists updated copies of garments the user already owns.
    fn update(&self, user: &UserId, garments: Vec<Garment>) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("wardrobe not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
