pub mod error;
pub mod merge;
pub mod naming;
pub mod service;
pub mod store;

#[cfg(test)]
mod service_test;
