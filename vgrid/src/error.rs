//! Error types for the grid engine and its collaborators.
//!
//! Lookup misses (a row outside the data, a node the cache does not know) are not errors: those
//! calls return `None` or `false`. The variants here are integration bugs and are returned
//! instead of panicking.

/// A contract violation between the grid, its data provider and its selection model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// Two items share an identifier.
    #[error("row {row}: item id {id} is not unique")]
    DuplicateId { row: usize, id: String },

    /// An update targeted an id that is unknown or does not match the replacement item.
    #[error("invalid or non-matching item id {id}")]
    IdMismatch { id: String },

    /// A delete targeted an id that is not present.
    #[error("unknown item id {id}")]
    UnknownId { id: String },

    /// A selection call was made before a selection model was installed.
    #[error("selection model is not set")]
    SelectionModelMissing,
}

impl InvariantViolation {
    pub fn duplicate_id(row: usize, id: &impl core::fmt::Debug) -> Self {
        Self::DuplicateId {
            row,
            id: format!("{id:?}"),
        }
    }

    pub fn id_mismatch(id: &impl core::fmt::Debug) -> Self {
        Self::IdMismatch {
            id: format!("{id:?}"),
        }
    }

    pub fn unknown_id(id: &impl core::fmt::Debug) -> Self {
        Self::UnknownId {
            id: format!("{id:?}"),
        }
    }
}

/// All errors surfaced by the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The render host could not provide a usable container.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl GridError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }

    /// Returns the violated invariant, if this is an invariant error.
    pub fn invariant(&self) -> Option<&InvariantViolation> {
        match self {
            Self::Invariant(v) => Some(v),
            Self::Configuration(_) => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = GridError> = core::result::Result<T, E>;
