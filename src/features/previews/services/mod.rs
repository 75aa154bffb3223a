mod preview_service;

pub use preview_service::{
    MapPreview, Marker, PopupContent, PreviewFields, PreviewService, PreviewSession,
};
