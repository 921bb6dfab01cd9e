pub mod error;
pub mod payloads;
pub mod server;
pub mod users;
