//! SymbolRegistry - classes plus free-function overload sets.
//!
//! # Thread Safety
//!
//! Registration takes `&mut self` and queries take `&self`, so the borrow
//! checker already serializes registration against queries. Once populated,
//! the registry is read-only and can be shared across threads (wrap it in an
//! `Arc`, or use the root crate's `Engine`).
//!
//! # Example
//!
//! ```
//! use hierarch_core::{ClassDecl, MemberDecl, ParamSpec};
//! use hierarch_registry::SymbolRegistry;
//!
//! let mut registry = SymbolRegistry::new();
//! registry.register_class(ClassDecl::new("A")).unwrap();
//! registry
//!     .register_function(MemberDecl::function("foo", vec![ParamSpec::rvalue_ref("int")]))
//!     .unwrap();
//! registry
//!     .register_function(MemberDecl::function("foo", vec![ParamSpec::lvalue_ref("int")]))
//!     .unwrap();
//!
//! assert_eq!(registry.overloads("foo").len(), 2);
//! ```

use hierarch_core::{ClassDecl, MemberDecl, RegistrationError, TypeHash};
use petgraph::graph::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::ClassGraph;

/// Unified class and function registry.
#[derive(Debug, Default, Clone)]
pub struct SymbolRegistry {
    /// Inheritance graph with every registered class.
    classes: ClassGraph,

    /// Free functions by name. Vec holds overloads with different signatures.
    functions: FxHashMap<String, Vec<MemberDecl>>,

    /// Identities of every registered function, for duplicate detection.
    function_hashes: FxHashSet<TypeHash>,
}

impl SymbolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a class; its bases must already be registered.
    pub fn register_class(&mut self, decl: ClassDecl) -> Result<NodeIndex, RegistrationError> {
        self.classes.register(decl)
    }

    /// Register several classes in any order.
    pub fn register_classes(
        &mut self,
        decls: impl IntoIterator<Item = ClassDecl>,
    ) -> Result<Vec<NodeIndex>, RegistrationError> {
        self.classes.register_all(decls)
    }

    /// Register a free function overload.
    ///
    /// Returns the function's identity. Fails with `DuplicateFunction` if an
    /// overload with the same signature exists and `NotCallable` for data
    /// members.
    pub fn register_function(&mut self, decl: MemberDecl) -> Result<TypeHash, RegistrationError> {
        if !decl.is_callable() {
            return Err(RegistrationError::NotCallable(decl.qualified_name()));
        }

        let hash = decl.hash();
        if !self.function_hashes.insert(hash) {
            return Err(RegistrationError::DuplicateFunction(decl.signature()));
        }

        tracing::debug!(function = %decl, "registered function");
        let name = decl.name.clone();
        self.functions.entry(name).or_default().push(decl);
        Ok(hash)
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// The class graph.
    pub fn classes(&self) -> &ClassGraph {
        &self.classes
    }

    /// Get a class by name.
    pub fn get_class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    /// All overloads registered under `name`, in registration order.
    pub fn overloads(&self, name: &str) -> &[MemberDecl] {
        self.functions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if a function with this identity exists.
    pub fn contains_function(&self, hash: TypeHash) -> bool {
        self.function_hashes.contains(&hash)
    }

    /// Number of registered classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of registered functions (all overloads counted).
    pub fn function_count(&self) -> usize {
        self.function_hashes.len()
    }
}
