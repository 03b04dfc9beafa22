//! Designs: stored rooms, their persistence and the upload flow

pub mod model;
pub mod slug;
pub mod store;
pub mod upload;

pub use model::Design;
pub use store::{DesignStore, MemoryDesignStore};
pub use upload::{process_upload, UploadRequest};
