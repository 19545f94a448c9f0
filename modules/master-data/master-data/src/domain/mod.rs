pub mod csv_source;
pub mod error;
pub mod repo;
pub mod row;
pub mod service;

#[cfg(test)]
mod service_test;
