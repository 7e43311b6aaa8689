//! Crate-level error types.

use std::fmt;

use crate::geometry::GeometryError;
use crate::layout::LayoutError;
use crate::model::ModelError;
use crate::service::ServiceError;

/// Errors produced by the chemsim crate.
#[derive(Debug)]
pub enum ChemSimError {
    /// A reaction record or molecule failed validation.
    Model(ModelError),
    /// Layout could not be computed for a molecule.
    Layout(LayoutError),
    /// A bond capsule could not be resolved.
    Geometry(GeometryError),
    /// The reaction service or its cache failed.
    Service(ServiceError),
    /// A molecule failed while building its scene.
    Molecule {
        /// Name of the molecule being built.
        name: String,
        /// Underlying failure.
        source: Box<ChemSimError>,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// JSON serialization failure.
    Json(serde_json::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for ChemSimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(e) => write!(f, "invalid record: {e}"),
            Self::Layout(e) => write!(f, "layout error: {e}"),
            Self::Geometry(e) => write!(f, "geometry error: {e}"),
            Self::Service(e) => write!(f, "reaction service error: {e}"),
            Self::Molecule { name, source } => {
                write!(f, "molecule '{name}': {source}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for ChemSimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            Self::Layout(e) => Some(e),
            Self::Geometry(e) => Some(e),
            Self::Service(e) => Some(e),
            Self::Molecule { source, .. } => Some(source.as_ref()),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl ChemSimError {
    /// Attach the name of the molecule that was being processed.
    #[must_use]
    pub fn in_molecule(self, name: &str) -> Self {
        Self::Molecule {
            name: name.to_owned(),
            source: Box::new(self),
        }
    }
}

impl From<ModelError> for ChemSimError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

impl From<LayoutError> for ChemSimError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

impl From<GeometryError> for ChemSimError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}

impl From<ServiceError> for ChemSimError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

impl From<std::io::Error> for ChemSimError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ChemSimError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
