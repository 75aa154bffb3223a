mod submission_service;

pub use submission_service::{
    ReportFields, SessionState, SubmissionReceipt, SubmissionService,
};
