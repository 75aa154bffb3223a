mod asset;

pub use asset::PhotoAsset;
