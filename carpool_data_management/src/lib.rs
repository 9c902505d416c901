use const_format::concatcp;

use carpool_lib::validation::ValidationError;

pub mod database;
mod data_manager;

pub use data_manager::*;

pub const DATA_DIR: &str = "data/";
pub const DATABASE_PATH: &str = concatcp!(DATA_DIR, "database.db");
pub const MEDIA_DIR: &str = concatcp!(DATA_DIR, "media");

#[derive(Debug)]
pub enum DataManagerError {
    Database(String),
    NotFound(&'static str),
    Validation(ValidationError),
}

impl std::fmt::Display for DataManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataManagerError::Database(msg) => write!(f, "{msg}"),
            DataManagerError::NotFound(entity) => write!(f, "{entity} not found"),
            DataManagerError::Validation(err) => write!(f, "{}", err.reason()),
        }
    }
}

impl std::error::Error for DataManagerError {}

impl From<ValidationError> for DataManagerError {
    fn from(err: ValidationError) -> Self {
        DataManagerError::Validation(err)
    }
}
