use thiserror::Error;

use crate::database::models::{ingredient::NewIngredient, tag::NewTag};

pub mod json_loader;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Can't read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Can't parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid tag {name:?}: {reason}")]
    InvalidTag { name: String, reason: String },
}

/// Source of the reference data every installation starts with.
pub trait DataLoader {
    fn load_ingredients(&self) -> Result<Vec<NewIngredient>, LoadError>;
    fn load_tags(&self) -> Result<Vec<NewTag>, LoadError>;
}
