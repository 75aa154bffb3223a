use std::io::Cursor;

use exif::{Exif, In, Reader, Tag, Value};

use crate::shared::types::{round_to_6dp, GeoCoordinate};

/// Hemisphere reference attached to a GPS coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HemisphereRef {
    North,
    South,
    East,
    West,
}

impl HemisphereRef {
    pub fn from_exif(value: &str) -> Option<Self> {
        match value.trim() {
            "N" => Some(Self::North),
            "S" => Some(Self::South),
            "E" => Some(Self::East),
            "W" => Some(Self::West),
            _ => None,
        }
    }

    /// Southern and western hemispheres negate the decimal value
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::South | Self::West)
    }
}

/// A degrees/minutes/seconds triple as embedded in the GPS IFD.
///
/// Transient: exists only while converting a geotag to decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    /// Convert to signed decimal degrees, rounded to 6 decimal places.
    ///
    /// `decimal = d + m/60 + s/3600`, negated for south/west. The rounding and
    /// sign rule is the bit-exact contract the map preview and record payload
    /// depend on.
    pub fn to_decimal_degrees(&self, hemisphere: HemisphereRef) -> f64 {
        let mut decimal = self.degrees + self.minutes / 60.0 + self.seconds / 3600.0;
        if hemisphere.is_negative() {
            decimal = -decimal;
        }
        round_to_6dp(decimal)
    }
}

/// Extracts the embedded geotag from photo bytes.
///
/// "No geotag present" and "cannot read metadata at all" are deliberately the
/// same outcome (`None`): callers only care whether a usable coordinate exists.
pub struct ExifLocationService;

impl ExifLocationService {
    pub fn new() -> Self {
        Self
    }

    /// Extract the GPS coordinate from raw image bytes, if present.
    ///
    /// Requires all four GPS fields (latitude + ref, longitude + ref); a
    /// missing or malformed field yields `None`, never an error.
    pub fn extract_coordinate(&self, image_bytes: &[u8]) -> Option<GeoCoordinate> {
        let exif = Reader::new()
            .read_from_container(&mut Cursor::new(image_bytes))
            .ok()?;

        let latitude = Self::read_axis(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
        let longitude = Self::read_axis(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;

        GeoCoordinate::new(latitude, longitude).ok()
    }

    fn read_axis(exif: &Exif, value_tag: Tag, ref_tag: Tag) -> Option<f64> {
        let hemisphere = exif
            .get_field(ref_tag, In::PRIMARY)
            .and_then(Self::hemisphere_of)?;
        let dms = exif
            .get_field(value_tag, In::PRIMARY)
            .and_then(|field| Self::dms_of(&field.value))?;

        Some(dms.to_decimal_degrees(hemisphere))
    }

    fn hemisphere_of(field: &exif::Field) -> Option<HemisphereRef> {
        match &field.value {
            Value::Ascii(chunks) => chunks
                .first()
                .and_then(|chunk| std::str::from_utf8(chunk).ok())
                .and_then(HemisphereRef::from_exif),
            _ => None,
        }
    }

    fn dms_of(value: &Value) -> Option<Dms> {
        match value {
            Value::Rational(parts) if parts.len() >= 3 => Some(Dms {
                degrees: parts[0].to_f64(),
                minutes: parts[1].to_f64(),
                seconds: parts[2].to_f64(),
            }),
            _ => None,
        }
    }
}

impl Default for ExifLocationService {
    fn default() -> Self {
        Self::new()
    }
}
