//! HTTP inbound adapter exposing the review endpoints.

pub mod dto;
pub mod error;
pub mod health;
pub mod pull_requests;
pub mod schemas;
pub mod state;
pub mod stats;
pub mod teams;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
