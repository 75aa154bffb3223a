/// Raw photo content plus the metadata needed to upload it.
///
/// Owned by the submission session until handed to the upload phase; after a
/// successful upload only the backend-issued asset reference survives.
#[derive(Debug, Clone)]
pub struct PhotoAsset {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
