//! Core domain types for the favorites sync pipeline.

pub mod constants;
pub mod favorite;
pub mod gallery;

pub use favorite::FavoriteItem;
pub use gallery::GalleryMetadata;
