mod connection;
pub mod repository;
pub mod schema;

pub use connection::Database;
