pub mod db;
pub mod memory;
pub mod models;
pub mod queries;
pub mod schema;

mod error;
mod sql;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
