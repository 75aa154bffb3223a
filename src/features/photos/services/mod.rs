mod exif_service;

pub use exif_service::{Dms, ExifLocationService, HemisphereRef};
