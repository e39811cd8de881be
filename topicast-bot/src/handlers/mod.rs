//! Chain handlers owned by the application: event logging and the operator allowlist.

mod logging_auth;

pub use logging_auth::{AuthHandler, LoggingHandler};
