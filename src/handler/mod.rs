//! Request handler module
//!
//! Responsible for request routing dispatch: the users API first, then the
//! site routes (root document and redirect fallback).

pub mod router;
pub mod site;

// Re-export main entry point
pub use router::handle_request;
