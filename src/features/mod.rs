pub mod photos;
pub mod previews;
pub mod submissions;
