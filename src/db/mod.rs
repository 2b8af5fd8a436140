mod connection;
mod kv_entries;
mod schema;

pub use connection::Database;
