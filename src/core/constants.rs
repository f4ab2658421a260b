//! Constants shared by the proxy, the payload checks and the pages

/// Content part type constants
pub mod content {
    /// Text part
    pub const TEXT: &str = "text";

    /// Image URL part
    pub const IMAGE_URL: &str = "image_url";
}

/// Output modalities requested from the provider
pub mod modality {
    pub const IMAGE: &str = "image";
    pub const TEXT: &str = "text";
}

/// Aspect ratios the provider accepts for `image_config.aspect_ratio`
pub const ASPECT_RATIOS: &[&str] = &[
    "1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9",
];

/// Image MIME types accepted in `data:` URLs
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/avif",
    "image/heic",
    "image/heif",
];
