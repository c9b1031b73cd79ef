//! Error types for the resolution engine.
//!
//! ## Error Hierarchy
//!
//! ```text
//! HierarchError (top-level wrapper)
//! ├── RegistrationError - fact base construction (duplicate/unknown/cyclic)
//! └── LookupError       - queries against classes or members that do not exist
//! ```
//!
//! Ambiguity and no-match are not errors; see
//! [`ResolutionVerdict`](crate::ResolutionVerdict).

use thiserror::Error;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while building the class graph or the function table.
///
/// The caller must fix the declaration input and register again. A failed
/// registration leaves the fact base unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A class with this name already exists.
    #[error("duplicate class: {0}")]
    DuplicateClass(String),

    /// A base list names a class that has not been registered.
    #[error("class '{class}' names unknown base '{base}'")]
    UnknownBase {
        /// The class being registered.
        class: String,
        /// The missing base.
        base: String,
    },

    /// A base list names the same class twice.
    #[error("class '{class}' lists base '{base}' more than once")]
    DuplicateBase {
        /// The class being registered.
        class: String,
        /// The repeated base.
        base: String,
    },

    /// The inheritance edges form a cycle.
    #[error("cyclic inheritance: {}", .path.join(" -> "))]
    CyclicInheritance {
        /// Class names along the cycle, first name repeated at the end.
        path: Vec<String>,
    },

    /// A function with an identical signature already exists.
    #[error("duplicate function: {0}")]
    DuplicateFunction(String),

    /// Only functions can be registered in a function table.
    #[error("'{0}' is not a function")]
    NotCallable(String),
}

// ============================================================================
// Lookup Errors
// ============================================================================

/// Errors raised by queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The queried class is not registered.
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// The member name exists nowhere in the hierarchy.
    #[error("'{class}' has no member named '{member}'")]
    UnknownMember {
        /// The queried class (or qualifier).
        class: String,
        /// The member name.
        member: String,
    },

    /// A qualifier names a class that is not a base of the queried class.
    #[error("'{qualifier}' is not a base of '{class}'")]
    NotABase {
        /// The queried class.
        class: String,
        /// The qualifying class.
        qualifier: String,
    },

    /// A cycle was detected while walking the inheritance edges.
    #[error("cyclic inheritance: {}", .path.join(" -> "))]
    CyclicInheritance {
        /// Class names along the cycle.
        path: Vec<String>,
    },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any error the engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl HierarchError {
    /// Check if this error came from registration.
    pub fn is_registration(&self) -> bool {
        matches!(self, HierarchError::Registration(_))
    }

    /// Check if this error came from a query.
    pub fn is_lookup(&self) -> bool {
        matches!(self, HierarchError::Lookup(_))
    }
}
