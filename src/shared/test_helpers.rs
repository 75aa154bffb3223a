#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::modules::kintone::{RecordBackend, SubmissionRecord};

// =============================================================================
// TIFF FIXTURES
// =============================================================================
//
// Minimal little-endian TIFF buffers, built by hand so the EXIF extraction
// tests do not need binary fixture files. Layout for the full-GPS fixture:
// header (8 bytes), IFD0 with a single GPS-IFD pointer entry (18 bytes),
// GPS IFD with four entries (54 bytes), then two runs of three rationals.

#[cfg(test)]
fn ifd_entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
fn ascii_inline(s: &str) -> u32 {
    let mut raw = [0u8; 4];
    raw[..s.len()].copy_from_slice(s.as_bytes());
    u32::from_le_bytes(raw)
}

#[cfg(test)]
fn tiff_header() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());
    buf
}

/// TIFF with a complete GPS IFD: latitude/longitude rational triples plus
/// hemisphere refs. Rationals are (numerator, denominator) pairs.
#[cfg(test)]
pub fn tiff_with_gps(
    lat: [(u32, u32); 3],
    lat_ref: &str,
    lon: [(u32, u32); 3],
    lon_ref: &str,
) -> Vec<u8> {
    let gps_ifd_offset: u32 = 26;
    let lat_data_offset: u32 = 80;
    let lon_data_offset: u32 = 104;

    let mut buf = tiff_header();
    // IFD0: one entry, the GPS IFD pointer (0x8825, LONG)
    buf.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut buf, 0x8825, 4, 1, gps_ifd_offset);
    buf.extend_from_slice(&0u32.to_le_bytes());
    // GPS IFD: LatitudeRef, Latitude, LongitudeRef, Longitude
    buf.extend_from_slice(&4u16.to_le_bytes());
    ifd_entry(&mut buf, 0x0001, 2, 2, ascii_inline(lat_ref));
    ifd_entry(&mut buf, 0x0002, 5, 3, lat_data_offset);
    ifd_entry(&mut buf, 0x0003, 2, 2, ascii_inline(lon_ref));
    ifd_entry(&mut buf, 0x0004, 5, 3, lon_data_offset);
    buf.extend_from_slice(&0u32.to_le_bytes());
    // Rational data
    for (numerator, denominator) in lat.iter().chain(lon.iter()) {
        buf.extend_from_slice(&numerator.to_le_bytes());
        buf.extend_from_slice(&denominator.to_le_bytes());
    }
    buf
}

/// TIFF whose GPS IFD carries only the latitude fields - longitude missing.
#[cfg(test)]
pub fn tiff_with_partial_gps() -> Vec<u8> {
    let gps_ifd_offset: u32 = 26;
    let lat_data_offset: u32 = 56;

    let mut buf = tiff_header();
    buf.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut buf, 0x8825, 4, 1, gps_ifd_offset);
    buf.extend_from_slice(&0u32.to_le_bytes());
    // GPS IFD: latitude only
    buf.extend_from_slice(&2u16.to_le_bytes());
    ifd_entry(&mut buf, 0x0001, 2, 2, ascii_inline("N"));
    ifd_entry(&mut buf, 0x0002, 5, 3, lat_data_offset);
    buf.extend_from_slice(&0u32.to_le_bytes());
    for (numerator, denominator) in [(36u32, 1u32), (5, 1), (0, 1)] {
        buf.extend_from_slice(&numerator.to_le_bytes());
        buf.extend_from_slice(&denominator.to_le_bytes());
    }
    buf
}

/// Valid TIFF with no GPS IFD at all (a lone Orientation entry).
#[cfg(test)]
pub fn tiff_without_gps() -> Vec<u8> {
    let mut buf = tiff_header();
    buf.extend_from_slice(&1u16.to_le_bytes());
    ifd_entry(&mut buf, 0x0112, 3, 1, 1);
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf
}

// =============================================================================
// RECORD BACKEND TEST DOUBLE
// =============================================================================

/// `RecordBackend` double with call counters and payload capture, used to
/// assert phase ordering (upload failure must prevent record creation) and
/// the exact record sent after a successful upload.
#[cfg(test)]
pub struct MockRecordBackend {
    pub upload_calls: AtomicUsize,
    pub record_calls: AtomicUsize,
    pub fail_upload: bool,
    pub fail_record: bool,
    pub asset_reference: String,
    pub last_record: Mutex<Option<SubmissionRecord>>,
}

#[cfg(test)]
impl MockRecordBackend {
    pub fn succeeding(asset_reference: &str) -> Self {
        Self {
            upload_calls: AtomicUsize::new(0),
            record_calls: AtomicUsize::new(0),
            fail_upload: false,
            fail_record: false,
            asset_reference: asset_reference.to_string(),
            last_record: Mutex::new(None),
        }
    }

    pub fn failing_upload() -> Self {
        Self {
            fail_upload: true,
            ..Self::succeeding("unused")
        }
    }

    pub fn failing_record_creation(asset_reference: &str) -> Self {
        Self {
            fail_record: true,
            ..Self::succeeding(asset_reference)
        }
    }

    pub fn upload_call_count(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn record_call_count(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl RecordBackend for MockRecordBackend {
    async fn upload_asset(
        &self,
        _file_name: &str,
        _content_type: &str,
        _data: Vec<u8>,
    ) -> Result<String> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload {
            return Err(AppError::AssetUpload("mock upload failure".to_string()));
        }
        Ok(self.asset_reference.clone())
    }

    async fn create_record(&self, record: &SubmissionRecord) -> Result<()> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_record {
            return Err(AppError::RecordCreation("mock record failure".to_string()));
        }
        *self.last_record.lock().unwrap() = Some(record.clone());
        Ok(())
    }
}
