//! HTTP protocol layer module
//!
//! Response builders and request body helpers shared by the API and site
//! routes.

pub mod body;
pub mod response;

// Re-export commonly used types
pub use body::read_json_object;
pub use response::{
    build_html_response, build_json_response, build_options_response, build_redirect_response,
    build_status_response,
};
