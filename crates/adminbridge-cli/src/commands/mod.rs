pub mod auth;
pub mod call;
pub mod config;
pub mod dict;
pub mod routes;
