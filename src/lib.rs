pub mod catalog;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod health;
pub mod http;
pub mod metrics;
pub mod seed;
pub mod utils;

#[cfg(test)]
mod test_support;
