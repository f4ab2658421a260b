//! Server-rendered pages
//!
//! Each page is assembled from fragments and wrapped in the shared layout.

pub mod image_creator;
pub mod landing;
pub mod layout;
pub mod markdown_viewer;
