mod error;
mod login_service;

pub use error::LoginError;
pub use login_service::{LoginService, LoginServiceBuilder, DEFAULT_SECRET};
