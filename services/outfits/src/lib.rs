//! Outfit builder service
//!
//! Users pick clothing items from a fixed catalog, save them as outfits,
//! like each other's outfits and look at statistics about their style.

pub mod catalog;
pub mod charts;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod style;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use routes::create_router;
pub use state::AppState;
