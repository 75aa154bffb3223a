//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services like the Kintone
//! record-storage backend.

pub mod kintone;
