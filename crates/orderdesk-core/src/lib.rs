pub mod command;
pub mod config;
pub mod desk;
pub mod directory;
pub mod error;
pub mod io;
pub mod notify;
pub mod paths;
pub mod persist;
pub mod store;
pub mod types;

pub use error::{DeskError, Result};
