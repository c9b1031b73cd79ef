//! Hierarch resolver crate.
//!
//! The query side of the engine. Every query is a pure function of the
//! registered fact base:
//!
//! - [`layout`]: base sub-objects of a most-derived class
//! - [`lookup`]: member name lookup with dominance and ambiguity detection
//! - [`conversion`]: conversion rules consulted when types differ
//! - [`overload`]: ranking of callables against a call site
//! - [`declaration`]: function-declaration vs. variable reading of `T x(U())`

pub mod conversion;
pub mod declaration;
pub mod layout;
pub mod lookup;
pub mod overload;

pub use conversion::{
    COST_CONVERSION, ConversionKind, ConversionRules, ExactConversions, StandardConversions,
};
pub use declaration::{
    Declaration, Disambiguation, StatementShape, classify, suggest_disambiguation,
};
pub use layout::{InstanceId, Layout, LayoutInstance};
pub use lookup::{MemberRef, lookup, lookup_qualified};
pub use overload::{ArgBinding, OverloadMatch, resolve_overload};
