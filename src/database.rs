pub mod models;
pub mod sqlite;
