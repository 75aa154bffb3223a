/// Allowed MIME types for photo uploads
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/tiff",
    "image/webp",
];

/// Maximum photo size in bytes (10MB)
pub const MAX_PHOTO_SIZE: usize = 10 * 1024 * 1024;

/// Check if a MIME type is an accepted photo type
pub fn is_image_mime_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_MIME_TYPES.contains(&content_type)
}

// =============================================================================
// MAP PREVIEW CONSTANTS
// =============================================================================

/// Zoom level before any coordinate is known (whole-world view)
pub const INITIAL_MAP_ZOOM: u8 = 2;

/// Zoom level after a coordinate has been pinned
pub const FOCUSED_MAP_ZOOM: u8 = 15;
