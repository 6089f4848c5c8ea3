//! Authentication session
//!
//! - [`AuthSessionManager`]: login, logout and token refresh
//! - [`RouteTable`]: the caller's menu tree, rebuilt on login
//! - [`types`]: state, credentials and token pair

pub mod manager;
pub mod routes;
pub mod types;

pub use manager::AuthSessionManager;
pub use routes::{RouteEntry, RouteMeta, RouteTable};
pub use types::{AuthState, Credentials, TokenPair};
