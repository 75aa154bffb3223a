pub mod preview_handler;

pub use preview_handler::build_preview;
