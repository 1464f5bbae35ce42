//! Stored wardrobes: CSV import, the repository seam, outfit generation on
//! behalf of a user, and the wear-tracking sink.

mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use import::{WardrobeImportError, WardrobeImporter};
pub use repository::{RepositoryError, UserId, WardrobeRepository};
pub use router::wardrobe_router;
pub use service::{GenerateOptions, WardrobeService, WardrobeServiceError};
