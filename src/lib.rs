pub mod backends;
pub mod config;
pub mod errors;
pub mod generator;
pub mod models;
pub mod services;
pub mod session;

#[cfg(test)]
pub mod test_utils;
