//! HTTP server for the admin front end

pub mod routes;
pub mod server;

pub use server::*;
