// Start of file: /src/utils/mod.rs

/*
    * Re-exports for all utility modules like error handling,
    * response formats, middleware wrappers, shared utilities, etc.
*/

pub mod api_error;
pub mod error_handler;
pub mod json;
pub mod response_handler;

pub use api_error::{ApiError, ApiResult};
pub use response_handler::HandlerResponse;

// End of file: /src/utils/mod.rs
