//! Service layer
//!
//! Business logic between the web handlers and the data layer.

mod account;

pub use account::AccountService;
