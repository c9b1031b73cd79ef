//! Hierarch: class hierarchy and call resolution for C++-style semantics.
//!
//! Given class and function declarations, the engine answers:
//!
//! - which base sub-objects a complete object contains
//!   (virtual bases shared, non-virtual bases duplicated)
//! - which declaration an unqualified or qualified member name denotes,
//!   reporting hiding and ambiguity as data
//! - which overload or constructor a call site selects, by reference and
//!   value category
//! - whether `T x(U());` declares a function or a variable
//!
//! Start with [`Engine`]; the member crates expose each stage on its own.

mod cache;
mod conversion;
mod engine;

pub use cache::LayoutCache;
pub use conversion::HierarchyConversions;
pub use engine::{Engine, MemberCall};

pub use hierarch_core as core;
pub use hierarch_registry as registry;
pub use hierarch_resolver as resolver;

pub mod prelude {
    pub use crate::{Engine, HierarchyConversions, LayoutCache, MemberCall};
    pub use hierarch_core::{
        Argument, BaseRef, CallSite, ClassDecl, FunctionTraits, HierarchError, LookupError,
        MemberDecl, MemberKind, ParamSpec, RefCategory, RegistrationError, ResolutionVerdict,
        TypeHash, ValueCategory,
    };
    pub use hierarch_registry::{ClassGraph, InheritanceClosure, SymbolRegistry};
    pub use hierarch_resolver::declaration::{
        Declaration, Disambiguation, InitExpr, Initializer, StatementShape,
    };
    pub use hierarch_resolver::{
        ConversionKind, ConversionRules, ExactConversions, Layout, LayoutInstance, MemberRef,
        OverloadMatch, StandardConversions, classify, suggest_disambiguation,
    };
}
