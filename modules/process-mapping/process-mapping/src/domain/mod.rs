pub mod cache;
pub mod error;
pub mod repo;
pub mod resolver;
pub mod service;

#[cfg(test)]
mod service_test;
