//! Loading of the static song catalog.

use std::{collections::HashSet, fs, io, path::Path};

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    dao::models::SongEntity,
    state::{catalog::Catalog, game::Song},
};

/// Catalog shipped inside the binary.
const BUILTIN_CATALOG: &str = include_str!("../../data/songs.json");

/// Failures raised while reading a catalog source.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog `{path}`")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The catalog is not a JSON array of songs.
    #[error("failed to parse catalog")]
    Parse(#[from] serde_json::Error),
    /// The catalog holds no song.
    #[error("catalog is empty")]
    Empty,
    /// Two songs share the same id.
    #[error("duplicate song id `{0}` in catalog")]
    DuplicateId(String),
}

/// Parse and validate a catalog from its JSON text.
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    let entities: Vec<SongEntity> = serde_json::from_str(json)?;
    if entities.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::new();
    for entity in &entities {
        if !seen.insert(entity.id.as_str()) {
            return Err(CatalogError::DuplicateId(entity.id.clone()));
        }
    }

    Ok(Catalog::from_songs(entities.into_iter().map(Song::from)))
}

/// The catalog embedded at build time.
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Read a catalog file from disk.
pub fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_catalog(&contents)
}

/// Load the configured catalog, falling back to the embedded one when the
/// file is missing or invalid.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    let Some(path) = path else {
        let catalog = builtin_catalog()?;
        info!(count = catalog.len(), "using built-in song catalog");
        return Ok(catalog);
    };

    match read_catalog(path) {
        Ok(catalog) => {
            info!(
                path = %path.display(),
                count = catalog.len(),
                "loaded song catalog"
            );
            Ok(catalog)
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "failed to load song catalog; falling back to built-in catalog"
            );
            builtin_catalog()
        }
    }
}
