//! Invoice admin - admin front end for an invoicing REST API
//!
//! This is the library interface: session ownership, route guarding, the
//! remote API client and the screen handlers the server mounts.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod ui;
pub mod validation;

pub use config::Config;
pub use error::Error;
