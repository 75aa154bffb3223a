pub mod submission_handler;

pub use submission_handler::{get_session, reset_session, submit_report};
