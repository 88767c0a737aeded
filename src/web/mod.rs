//! HTTP front end: routes, pages and browser sessions.

pub mod middleware;
mod pages;
pub mod render;
pub mod routes;
pub mod session;
mod status;

pub use routes::*;
