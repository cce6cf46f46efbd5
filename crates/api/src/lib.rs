pub mod catalog;
pub mod cli;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;

pub use routes::{build_router, ApiState};
