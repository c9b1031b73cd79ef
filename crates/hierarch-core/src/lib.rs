//! Hierarch core types.
//!
//! The data model shared by every stage of the resolution engine.
//!
//! ## Modules
//!
//! - [`type_hash`]: Deterministic identities for classes and callables
//! - [`data_type`]: Parameter specs, arguments, value categories, call sites
//! - [`entries`]: Class, base and member declarations
//! - [`verdict`]: Resolution verdicts returned by queries
//! - [`error`]: Registration and lookup errors

pub mod data_type;
pub mod entries;
pub mod error;
pub mod type_hash;
pub mod verdict;

pub use data_type::{Argument, CallSite, ParamSpec, RefCategory, ValueCategory};
pub use entries::{BaseRef, ClassDecl, FunctionTraits, MemberDecl, MemberKind};
pub use error::{HierarchError, LookupError, RegistrationError};
pub use type_hash::TypeHash;
pub use verdict::ResolutionVerdict;
