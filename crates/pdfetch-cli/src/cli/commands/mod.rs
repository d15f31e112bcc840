mod auth;
mod fetch;
mod verify;

pub use auth::run_auth;
pub use fetch::run_fetch;
pub use verify::run_verify;
