#![forbid(unsafe_code)]

//! Scenario datasets for BugScope.
//!
//! Ships the six walkthroughs of the stock catalog as embedded JSON and loads
//! additional catalogs from disk. A catalog document is either a bare array of
//! scenarios or an object with a `version` and a `scenarios` array:
//!
//! ```json
//! { "version": 1, "scenarios": [ { "id": "off-by-one", "...": "..." } ] }
//! ```
//!
//! Field names are snake_case (`highlight_lines`, `error_line`, `root_cause`,
//! `fix_source`, `is_error`). Optional trace fields may be omitted.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use bugscope_core::{Catalog, CatalogError, Scenario};
use serde::Deserialize;

/// The bundled catalog document.
pub const BUNDLED_JSON: &str = include_str!("../data/scenarios.json");

/// Highest catalog document version understood by this crate.
pub const CATALOG_VERSION: u32 = 1;

/// Errors loading a catalog.
#[derive(Debug)]
pub enum LoadError {
    /// I/O error reading the catalog file.
    Io(io::Error),
    /// The document is not valid catalog JSON.
    Parse(serde_json::Error),
    /// The document declares a version newer than [`CATALOG_VERSION`].
    UnsupportedVersion(u32),
    /// The scenarios parsed but do not form a valid catalog.
    Catalog(CatalogError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {e}"),
            LoadError::Parse(e) => write!(f, "invalid catalog JSON: {e}"),
            LoadError::UnsupportedVersion(v) => write!(
                f,
                "unsupported catalog version {v} (expected {CATALOG_VERSION} or lower)"
            ),
            LoadError::Catalog(e) => write!(f, "invalid catalog: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::UnsupportedVersion(_) => None,
            LoadError::Catalog(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e)
    }
}

impl From<CatalogError> for LoadError {
    fn from(e: CatalogError) -> Self {
        LoadError::Catalog(e)
    }
}

#[derive(Deserialize)]
struct VersionedDocument {
    version: u32,
    scenarios: Vec<Scenario>,
}

/// The bundled catalog.
pub fn bundled() -> Result<Catalog, LoadError> {
    from_json(BUNDLED_JSON)
}

/// Parse a catalog document.
pub fn from_json(json: &str) -> Result<Catalog, LoadError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let scenarios: Vec<Scenario> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        let doc: VersionedDocument = serde_json::from_value(value)?;
        if doc.version > CATALOG_VERSION {
            return Err(LoadError::UnsupportedVersion(doc.version));
        }
        doc.scenarios
    };
    let catalog = Catalog::new(scenarios)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(scenarios = catalog.len(), "catalog parsed");
    Ok(catalog)
}

/// Read and parse a catalog file.
pub fn load(path: impl AsRef<Path>) -> Result<Catalog, LoadError> {
    let path = path.as_ref();
    #[cfg(feature = "tracing")]
    tracing::info!(path = %path.display(), "loading catalog");
    let json = fs::read_to_string(path)?;
    from_json(&json)
}

/// Serialize scenarios as a versioned catalog document.
pub fn to_json<'a>(
    scenarios: impl IntoIterator<Item = &'a Scenario>,
) -> Result<String, LoadError> {
    #[derive(serde::Serialize)]
    struct Document<'s> {
        version: u32,
        scenarios: Vec<&'s Scenario>,
    }
    let doc = Document {
        version: CATALOG_VERSION,
        scenarios: scenarios.into_iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}
