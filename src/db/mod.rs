pub mod dates;
pub mod error;
pub mod models;
pub mod repo;
