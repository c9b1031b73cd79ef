//! The resolution engine facade.
//!
//! An `Engine` owns the fact base (classes and free functions) and answers
//! layout, lookup, overload and construction queries against it.
//!
//! # Example
//!
//! ```
//! use hierarch::prelude::*;
//!
//! let mut engine = Engine::new();
//! engine
//!     .register_classes([
//!         ClassDecl::new("Base1").with_field("i").with_field("j"),
//!         ClassDecl::new("Base2").with_field("j"),
//!         ClassDecl::new("Derived")
//!             .with_virtual_base("Base1")
//!             .with_virtual_base("Base2")
//!             .with_field("i"),
//!     ])
//!     .unwrap();
//!
//! assert!(engine.lookup("Derived", "i").unwrap().is_hidden());
//! assert!(engine.lookup("Derived", "j").unwrap().is_ambiguous());
//! assert!(engine.lookup_qualified("Derived", "Base1", "j").unwrap().is_unique());
//! ```
//!
//! # Thread Safety
//!
//! Registration takes `&mut self`; every query takes `&self`. Computed
//! layouts are cached behind a read-write lock and shared as `Arc<Layout>`.

use std::fmt;
use std::sync::Arc;

use hierarch_core::{
    CallSite, ClassDecl, HierarchError, LookupError, MemberDecl, ResolutionVerdict, TypeHash,
};
use hierarch_registry::{InheritanceClosure, SymbolRegistry};
use hierarch_resolver::{ConversionRules, Layout, MemberRef, OverloadMatch, lookup, overload};

use crate::cache::LayoutCache;
use crate::conversion::HierarchyConversions;

type DynRules = dyn ConversionRules + Send + Sync;

/// Outcome of resolving a call through member name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberCall {
    /// Name lookup found the name in several unrelated sub-objects.
    /// Overload resolution did not run.
    AmbiguousName(Vec<MemberRef>),
    /// Name lookup settled on one declaring class; `verdict` ranks its
    /// overloads against the call.
    Resolved {
        member: MemberRef,
        verdict: ResolutionVerdict<OverloadMatch>,
    },
}

impl MemberCall {
    /// The overload verdict, if lookup was unambiguous.
    pub fn verdict(&self) -> Option<&ResolutionVerdict<OverloadMatch>> {
        match self {
            MemberCall::AmbiguousName(_) => None,
            MemberCall::Resolved { verdict, .. } => Some(verdict),
        }
    }

    /// The selected callable.
    pub fn winner(&self) -> Option<&OverloadMatch> {
        self.verdict().and_then(ResolutionVerdict::winner)
    }

    /// Whether either name lookup or overload ranking was ambiguous.
    pub fn is_ambiguous(&self) -> bool {
        match self {
            MemberCall::AmbiguousName(_) => true,
            MemberCall::Resolved { verdict, .. } => verdict.is_ambiguous(),
        }
    }
}

impl fmt::Display for MemberCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberCall::AmbiguousName(members) => {
                let names: Vec<_> = members.iter().map(ToString::to_string).collect();
                write!(f, "ambiguous name: {}", names.join(", "))
            }
            MemberCall::Resolved { verdict, .. } => write!(f, "{verdict}"),
        }
    }
}

/// Registration and query entry point.
#[derive(Default)]
pub struct Engine {
    registry: SymbolRegistry,
    layouts: LayoutCache,
    /// `None` uses [`HierarchyConversions`] over the registered classes.
    conversions: Option<Box<DynRules>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("cached_layouts", &self.layouts.len())
            .field("custom_conversions", &self.conversions.is_some())
            .finish()
    }
}

impl Engine {
    /// Create an empty engine using hierarchy-aware conversions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty engine that consults `rules` for type conversions.
    pub fn with_conversions(rules: impl ConversionRules + Send + Sync + 'static) -> Self {
        Self {
            conversions: Some(Box::new(rules)),
            ..Self::default()
        }
    }

    /// The fact base.
    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a class; its bases must already be registered.
    ///
    /// A new class never changes the layout of an existing one, so cached
    /// layouts stay valid.
    pub fn register_class(&mut self, decl: ClassDecl) -> Result<(), HierarchError> {
        self.registry.register_class(decl)?;
        Ok(())
    }

    /// Register several classes in any order. Nothing is registered if any
    /// declaration is invalid.
    pub fn register_classes(
        &mut self,
        decls: impl IntoIterator<Item = ClassDecl>,
    ) -> Result<(), HierarchError> {
        self.registry.register_classes(decls)?;
        Ok(())
    }

    /// Register a free function overload.
    pub fn register_function(&mut self, decl: MemberDecl) -> Result<TypeHash, HierarchError> {
        Ok(self.registry.register_function(decl)?)
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Transitive inheritance edges of `class`.
    pub fn graph_of(&self, class: &str) -> Result<InheritanceClosure, HierarchError> {
        Ok(self.registry.classes().graph_of(class)?)
    }

    /// Layout of `class`, computed once and cached.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn layout_of(&self, class: &str) -> Result<Arc<Layout>, HierarchError> {
        let classes = self.registry.classes();
        Ok(self.layouts.get_or_compute(classes, class)?)
    }

    /// Unqualified member lookup.
    pub fn lookup(
        &self,
        class: &str,
        member: &str,
    ) -> Result<ResolutionVerdict<MemberRef>, HierarchError> {
        let layout = self.layout_of(class)?;
        Ok(lookup::lookup(self.registry.classes(), &layout, member)?)
    }

    /// Member lookup with an explicit base qualifier. Never ambiguous.
    pub fn lookup_qualified(
        &self,
        class: &str,
        qualifier: &str,
        member: &str,
    ) -> Result<ResolutionVerdict<MemberRef>, HierarchError> {
        let layout = self.layout_of(class)?;
        let classes = self.registry.classes();
        Ok(lookup::lookup_qualified(classes, &layout, qualifier, member)?)
    }

    /// Resolve an arbitrary candidate set against a call site.
    pub fn resolve(
        &self,
        candidates: &[MemberDecl],
        call: &CallSite,
    ) -> ResolutionVerdict<OverloadMatch> {
        match &self.conversions {
            Some(rules) => overload::resolve_overload(candidates, call, rules.as_ref()),
            None => {
                let rules = HierarchyConversions::new(self.registry.classes(), &self.layouts);
                overload::resolve_overload(candidates, call, &rules)
            }
        }
    }

    /// Resolve a call to a free function by its registered overloads.
    ///
    /// A name with no registered overloads gives `NoMatch`.
    pub fn resolve_call(&self, call: &CallSite) -> ResolutionVerdict<OverloadMatch> {
        self.resolve(self.registry.overloads(&call.callee), call)
    }

    /// Resolve `object.callee(args)` on an object of type `class`.
    ///
    /// Name lookup runs first. Overloads are only ranked within the one
    /// class lookup settles on.
    pub fn resolve_member_call(
        &self,
        class: &str,
        call: &CallSite,
    ) -> Result<MemberCall, HierarchError> {
        match self.lookup(class, &call.callee)? {
            ResolutionVerdict::Ambiguous(members) => Ok(MemberCall::AmbiguousName(members)),
            verdict => self.resolve_in_declaring_class(class, verdict, call),
        }
    }

    /// Resolve `object.qualifier::callee(args)` on an object of type `class`.
    pub fn resolve_qualified_member_call(
        &self,
        class: &str,
        qualifier: &str,
        call: &CallSite,
    ) -> Result<MemberCall, HierarchError> {
        let verdict = self.lookup_qualified(class, qualifier, &call.callee)?;
        self.resolve_in_declaring_class(qualifier, verdict, call)
    }

    /// Resolve a construction of `class` against its constructors.
    ///
    /// `call.direct` decides whether `explicit` constructors take part.
    pub fn resolve_construction(
        &self,
        class: &str,
        call: &CallSite,
    ) -> Result<ResolutionVerdict<OverloadMatch>, HierarchError> {
        let Some(decl) = self.registry.get_class(class) else {
            return Err(LookupError::UnknownClass(class.to_string()).into());
        };
        let constructors: Vec<_> = decl.constructors().cloned().collect();
        Ok(self.resolve(&constructors, call))
    }

    fn resolve_in_declaring_class(
        &self,
        class: &str,
        verdict: ResolutionVerdict<MemberRef>,
        call: &CallSite,
    ) -> Result<MemberCall, HierarchError> {
        let Some(member) = verdict.ok() else {
            return Err(LookupError::UnknownMember {
                class: class.to_string(),
                member: call.callee.clone(),
            }
            .into());
        };

        let candidates: Vec<MemberDecl> = self
            .registry
            .get_class(&member.class)
            .map(|decl| decl.members_named(&member.member).cloned().collect())
            .unwrap_or_default();

        let verdict = self.resolve(&candidates, call);
        Ok(MemberCall::Resolved { member, verdict })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hierarch_core::{Argument, ParamSpec};
    use hierarch_resolver::ExactConversions;

    fn multiple_inheritance() -> Engine {
        let mut engine = Engine::new();
        engine
            .register_classes([
                ClassDecl::new("Base1").with_method("foo", vec![ParamSpec::by_value("int")]),
                ClassDecl::new("Base2").with_method("foo", vec![]),
                ClassDecl::new("Derived")
                    .with_base("Base1")
                    .with_base("Base2"),
            ])
            .unwrap();
        engine
    }

    #[test]
    fn layouts_are_cached() {
        let engine = multiple_inheritance();
        let first = engine.layout_of("Derived").unwrap();
        let second = engine.layout_of("Derived").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn cached_layout_survives_registration() {
        let mut engine = multiple_inheritance();
        let before = engine.layout_of("Derived").unwrap();
        let more = ClassDecl::new("More").with_base("Derived");
        engine.register_class(more).unwrap();
        assert_eq!(*engine.layout_of("Derived").unwrap(), *before);
        assert_eq!(engine.layout_of("More").unwrap().instances().len(), 4);
    }

    #[test]
    fn member_call_name_ambiguity_wins_over_arity() {
        let engine = multiple_inheritance();
        let result = engine
            .resolve_member_call("Derived", &CallSite::new("foo", vec![]))
            .unwrap();

        assert!(matches!(result, MemberCall::AmbiguousName(ref m) if m.len() == 2));
        assert!(result.is_ambiguous());
        assert!(result.winner().is_none());
    }

    #[test]
    fn qualified_member_call() {
        let engine = multiple_inheritance();
        let call = CallSite::new("foo", vec![Argument::prvalue("int")]);

        let result = engine
            .resolve_qualified_member_call("Derived", "Base1", &call)
            .unwrap();
        assert_eq!(result.winner().unwrap().to_string(), "Base1::foo(int)");

        let result = engine
            .resolve_qualified_member_call("Derived", "Base2", &call)
            .unwrap();
        assert!(result.verdict().unwrap().is_no_match());
    }

    #[test]
    fn unknown_class_is_an_error() {
        let engine = Engine::new();
        let err = engine.lookup("Nope", "x").unwrap_err();
        assert_eq!(
            err,
            HierarchError::Lookup(LookupError::UnknownClass("Nope".to_string()))
        );
        let site = CallSite::new("Nope", vec![]);
        assert!(engine.resolve_construction("Nope", &site).is_err());
    }

    #[test]
    fn custom_conversions() {
        let mut engine = Engine::with_conversions(ExactConversions);
        engine
            .register_function(MemberDecl::function("f", vec![ParamSpec::by_value("double")]))
            .unwrap();

        let call = CallSite::new("f", vec![Argument::prvalue("int")]);
        let verdict = engine.resolve_call(&call);
        assert!(verdict.is_no_match());

        let engine_default = {
            let mut e = Engine::new();
            e.register_function(MemberDecl::function("f", vec![ParamSpec::by_value("double")]))
                .unwrap();
            e
        };
        let verdict = engine_default.resolve_call(&call);
        assert!(verdict.is_unique());
    }

    #[test]
    fn conversions_share_the_layout_cache() {
        let mut engine = multiple_inheritance();
        let by_base = MemberDecl::function("take", vec![ParamSpec::const_lvalue_ref("Base1")]);
        engine.register_function(by_base).unwrap();
        assert!(engine.layouts.is_empty());

        let call = CallSite::new("take", vec![Argument::lvalue("Derived")]);
        assert!(engine.resolve_call(&call).is_unique());
        assert_eq!(engine.layouts.len(), 1);

        let cached = engine.layouts.get("Derived").unwrap();
        assert!(Arc::ptr_eq(&cached, &engine.layout_of("Derived").unwrap()));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
