//! Integration tests for the resolution engine.
//!
//! These drive `Engine` end to end: register a fact base, then query
//! layouts, member lookup, overload and constructor resolution, and
//! statement classification.

use hierarch::prelude::*;
use std::sync::Arc;
use std::thread;

/// Build an engine from classes given in any order.
fn engine_with(decls: impl IntoIterator<Item = ClassDecl>) -> Engine {
    let mut engine = Engine::new();
    engine.register_classes(decls).expect("valid fact base");
    engine
}

fn names(verdict: &ResolutionVerdict<MemberRef>) -> Vec<String> {
    verdict
        .candidates()
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn is_unknown_member(err: &HierarchError) -> bool {
    matches!(
        err,
        HierarchError::Lookup(LookupError::UnknownMember { .. })
    )
}

// =============================================================================
// Scenario: hiding and ambiguity between virtual bases
// =============================================================================

fn three_ambiguous() -> Engine {
    engine_with([
        ClassDecl::new("Base1").with_field("i").with_field("j"),
        ClassDecl::new("Base2").with_field("j"),
        ClassDecl::new("Derived")
            .with_virtual_base("Base1")
            .with_virtual_base("Base2")
            .with_field("i"),
    ])
}

#[test]
fn test_derived_member_hides_base_member() {
    let engine = three_ambiguous();
    let verdict = engine.lookup("Derived", "i").unwrap();

    assert!(verdict.is_hidden());
    assert_eq!(verdict.winner().unwrap().class, "Derived");
    assert_eq!(verdict.to_string(), "hidden: Derived::i hides Base1::i");
}

#[test]
fn test_sibling_members_are_ambiguous() {
    let engine = three_ambiguous();
    let verdict = engine.lookup("Derived", "j").unwrap();

    assert!(verdict.is_ambiguous());
    assert_eq!(names(&verdict), ["Base1::j", "Base2::j"]);
}

#[test]
fn test_qualified_lookup_resolves_ambiguity() {
    let engine = three_ambiguous();
    let verdict = engine.lookup_qualified("Derived", "Base1", "j").unwrap();

    assert!(verdict.is_unique());
    assert_eq!(verdict.winner().unwrap().to_string(), "Base1::j");
}

// =============================================================================
// Scenario: rvalue vs lvalue reference overloads
// =============================================================================

fn reference_overloads() -> Engine {
    let mut engine = Engine::new();
    engine
        .register_function(MemberDecl::function("foo", vec![ParamSpec::rvalue_ref("int")]))
        .unwrap();
    engine
        .register_function(MemberDecl::function("foo", vec![ParamSpec::lvalue_ref("int")]))
        .unwrap();
    engine
}

#[test]
fn test_named_variable_selects_lvalue_reference() {
    let engine = reference_overloads();
    let verdict = engine.resolve_call(&CallSite::new("foo", vec![Argument::lvalue("int")]));

    assert!(verdict.is_unique());
    assert_eq!(verdict.winner().unwrap().to_string(), "foo(int&)");
}

#[test]
fn test_literal_selects_rvalue_reference() {
    let engine = reference_overloads();
    let verdict = engine.resolve_call(&CallSite::new("foo", vec![Argument::prvalue("int")]));

    assert!(verdict.is_unique());
    assert_eq!(verdict.winner().unwrap().to_string(), "foo(int&&)");
}

#[test]
fn test_moved_value_selects_rvalue_reference() {
    let engine = reference_overloads();
    let verdict = engine.resolve_call(&CallSite::new("foo", vec![Argument::xvalue("int")]));
    assert_eq!(verdict.winner().unwrap().to_string(), "foo(int&&)");
}

#[test]
fn test_named_variable_to_rvalue_only_overload_fails() {
    let mut engine = Engine::new();
    engine
        .register_function(MemberDecl::function("sink", vec![ParamSpec::rvalue_ref("int")]))
        .unwrap();

    let verdict = engine.resolve_call(&CallSite::new("sink", vec![Argument::lvalue("int")]));
    assert!(verdict.is_no_match());
}

#[test]
fn test_unknown_function_is_no_match() {
    let engine = Engine::new();
    let call = CallSite::new("nothing", vec![]);
    assert!(engine.resolve_call(&call).is_no_match());
}

// =============================================================================
// Scenario: explicit constructors
// =============================================================================

fn explicit_construction() -> Engine {
    engine_with([
        ClassDecl::new("A"),
        ClassDecl::new("B").with_explicit_constructor(vec![ParamSpec::by_value("A")]),
    ])
}

#[test]
fn test_explicit_constructor_rejected_in_implicit_context() {
    let engine = explicit_construction();
    let call = CallSite::implicit("B", vec![Argument::prvalue("A")]);
    let verdict = engine.resolve_construction("B", &call).unwrap();
    assert!(verdict.is_no_match());
}

#[test]
fn test_explicit_constructor_accepted_in_direct_context() {
    let engine = explicit_construction();
    let call = CallSite::new("B", vec![Argument::prvalue("A")]);
    let verdict = engine.resolve_construction("B", &call).unwrap();

    assert!(verdict.is_unique());
    assert_eq!(verdict.winner().unwrap().to_string(), "explicit B::B(A)");
}

#[test]
fn test_converting_constructor_works_in_both_contexts() {
    let engine = engine_with([
        ClassDecl::new("A"),
        ClassDecl::new("C").with_constructor(vec![ParamSpec::const_lvalue_ref("A")]),
    ]);

    for call in [
        CallSite::implicit("C", vec![Argument::prvalue("A")]),
        CallSite::new("C", vec![Argument::lvalue("A")]),
    ] {
        assert!(engine.resolve_construction("C", &call).unwrap().is_unique());
    }
}

// =============================================================================
// Scenario: most vexing parse
// =============================================================================

#[test]
fn test_vexing_parse_declares_function() {
    let shape = StatementShape::new("B", "b", Initializer::Parens(InitExpr::construct("A")));
    assert_eq!(shape.to_string(), "B b(A());");
    assert!(classify(&shape).is_function_declaration());
}

#[test]
fn test_brace_rewrite_constructs_value() {
    let shape = StatementShape::new("B", "b", Initializer::Parens(InitExpr::construct("A")));
    let fixes = suggest_disambiguation(&shape);

    assert!(classify(&fixes.brace_init).is_value_construction());
    assert!(classify(fixes.extra_parens.as_ref().unwrap()).is_value_construction());
}

#[test]
fn test_rewritten_statement_resolves_explicit_constructor() {
    let engine = explicit_construction();
    let shape = StatementShape::new("B", "b", Initializer::Parens(InitExpr::construct("A")));
    assert!(shape.construction_call().is_none());

    let call = suggest_disambiguation(&shape)
        .brace_init
        .construction_call()
        .unwrap();
    let verdict = engine.resolve_construction("B", &call).unwrap();
    assert!(verdict.is_unique());
}

// =============================================================================
// Scenario: overriding through several virtual paths
// =============================================================================

#[test]
fn test_override_on_both_virtual_paths_is_ambiguous() {
    let engine = engine_with([
        ClassDecl::new("A").with_method("m", vec![]),
        ClassDecl::new("B")
            .with_virtual_base("A")
            .with_method("m", vec![]),
        ClassDecl::new("C")
            .with_virtual_base("A")
            .with_method("m", vec![]),
        ClassDecl::new("D")
            .with_virtual_base("B")
            .with_virtual_base("C"),
    ]);

    let verdict = engine.lookup("D", "m").unwrap();
    assert_eq!(names(&verdict), ["B::m", "C::m"]);

    let site = CallSite::new("m", vec![]);
    let call = engine.resolve_member_call("D", &site).unwrap();
    assert!(matches!(call, MemberCall::AmbiguousName(_)));
    assert_eq!(call.to_string(), "ambiguous name: B::m, C::m");
}

#[test]
fn test_override_on_one_path_dominates() {
    let engine = engine_with([
        ClassDecl::new("A").with_method("m", vec![]),
        ClassDecl::new("B")
            .with_virtual_base("A")
            .with_method("m", vec![]),
        ClassDecl::new("C").with_virtual_base("A"),
        ClassDecl::new("D")
            .with_virtual_base("B")
            .with_virtual_base("C"),
    ]);

    let site = CallSite::new("m", vec![]);
    let call = engine.resolve_member_call("D", &site).unwrap();
    assert_eq!(call.winner().unwrap().to_string(), "B::m()");
}

// =============================================================================
// Layout properties
// =============================================================================

#[test]
fn test_virtual_diamond_has_one_shared_base() {
    let engine = engine_with([
        ClassDecl::new("ClassA").with_field("a"),
        ClassDecl::new("ClassB")
            .with_virtual_base("ClassA")
            .with_field("b"),
        ClassDecl::new("ClassC")
            .with_virtual_base("ClassA")
            .with_field("c"),
        ClassDecl::new("ClassD")
            .with_base("ClassB")
            .with_base("ClassC")
            .with_field("d"),
    ]);

    let layout = engine.layout_of("ClassD").unwrap();
    assert_eq!(layout.count_of("ClassA"), 1);
    assert!(engine.lookup("ClassD", "a").unwrap().is_unique());
}

#[test]
fn test_virtual_base_shared_across_many_paths() {
    let mut decls = vec![ClassDecl::new("X").with_field("x")];
    let mut top = ClassDecl::new("Top");
    for i in 0..6 {
        decls.push(ClassDecl::new(format!("P{i}")).with_virtual_base("X"));
        top = top.with_base(format!("P{i}"));
    }
    decls.push(top);
    let engine = engine_with(decls);

    assert_eq!(engine.layout_of("Top").unwrap().count_of("X"), 1);
    assert!(engine.lookup("Top", "x").unwrap().is_unique());
}

#[test]
fn test_each_non_virtual_path_duplicates_base() {
    let engine = engine_with([
        ClassDecl::new("X").with_field("x"),
        ClassDecl::new("P").with_base("X"),
        ClassDecl::new("Q").with_base("X"),
        ClassDecl::new("R").with_virtual_base("X"),
        ClassDecl::new("S").with_virtual_base("X"),
        ClassDecl::new("Top")
            .with_base("P")
            .with_base("Q")
            .with_base("R")
            .with_base("S"),
    ]);

    let layout = engine.layout_of("Top").unwrap();
    // Two non-virtual copies plus the one shared virtual copy.
    assert_eq!(layout.count_of("X"), 3);
    let virtual_count = layout.instances_of("X").filter(|i| i.is_virtual).count();
    assert_eq!(virtual_count, 1);

    let verdict = engine.lookup("Top", "x").unwrap();
    assert_eq!(verdict.candidates().len(), 3);
}

// =============================================================================
// Lookup properties
// =============================================================================

#[test]
fn test_lookup_is_idempotent() {
    let engine = three_ambiguous();
    for member in ["i", "j"] {
        let first = engine.lookup("Derived", member).unwrap();
        for _ in 0..4 {
            assert_eq!(engine.lookup("Derived", member).unwrap(), first);
        }
    }
}

#[test]
fn test_qualified_lookup_is_never_ambiguous() {
    let engine = engine_with([
        ClassDecl::new("A").with_field("a").with_method("m", vec![]),
        ClassDecl::new("B").with_base("A").with_method("m", vec![]),
        ClassDecl::new("C").with_base("A").with_field("a"),
        ClassDecl::new("V").with_virtual_base("A"),
        ClassDecl::new("D")
            .with_base("B")
            .with_base("C")
            .with_base("V")
            .with_field("a"),
    ]);

    for qualifier in ["A", "B", "C", "V", "D"] {
        for member in ["a", "m"] {
            match engine.lookup_qualified("D", qualifier, member) {
                Ok(verdict) => assert!(verdict.is_unique(), "{qualifier}::{member}"),
                Err(err) => assert!(is_unknown_member(&err), "{qualifier}::{member}: {err}"),
            }
        }
    }
}

#[test]
fn test_unknown_member_and_non_base_qualifier() {
    let mut engine = three_ambiguous();
    let unrelated = ClassDecl::new("Unrelated").with_field("j");
    engine.register_class(unrelated).unwrap();

    assert_eq!(
        engine.lookup("Derived", "k").unwrap_err(),
        HierarchError::Lookup(LookupError::UnknownMember {
            class: "Derived".to_string(),
            member: "k".to_string(),
        })
    );
    let result = engine.lookup_qualified("Derived", "Unrelated", "j");
    assert!(matches!(
        result,
        Err(HierarchError::Lookup(LookupError::NotABase { .. }))
    ));
}

// =============================================================================
// Overload properties
// =============================================================================

fn permutations(items: &[MemberDecl]) -> Vec<Vec<MemberDecl>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

#[test]
fn test_overload_verdict_independent_of_candidate_order() {
    let engine = Engine::new();
    let candidates = [
        MemberDecl::function("f", vec![ParamSpec::by_value("long")]),
        MemberDecl::function("f", vec![ParamSpec::by_value("double")]),
        MemberDecl::function("f", vec![ParamSpec::rvalue_ref("int")]),
        MemberDecl::function("f", vec![ParamSpec::lvalue_ref("int")]),
    ];

    for arg in [
        Argument::lvalue("int"),
        Argument::prvalue("int"),
        Argument::lvalue("char"),
    ] {
        let call = CallSite::new("f", vec![arg]);
        let expected = engine.resolve(&candidates, &call);
        for order in permutations(&candidates) {
            assert_eq!(engine.resolve(&order, &call), expected, "order {order:?}");
        }
    }
}

#[test]
fn test_equal_cost_overloads_are_ambiguous() {
    let engine = Engine::new();
    let candidates = [
        MemberDecl::function("f", vec![ParamSpec::by_value("long")]),
        MemberDecl::function("f", vec![ParamSpec::by_value("double")]),
    ];
    let call = CallSite::new("f", vec![Argument::lvalue("char")]);
    let verdict = engine.resolve(&candidates, &call);
    assert!(verdict.is_ambiguous());
    assert_eq!(verdict.candidates().len(), 2);
}

#[test]
fn test_derived_argument_binds_base_reference() {
    let mut engine = engine_with([
        ClassDecl::new("Base"),
        ClassDecl::new("Derived").with_base("Base"),
    ]);
    engine
        .register_function(MemberDecl::function("take", vec![ParamSpec::lvalue_ref("Base")]))
        .unwrap();

    let call = CallSite::new("take", vec![Argument::lvalue("Derived")]);
    let verdict = engine.resolve_call(&call);
    let m = verdict.winner().unwrap();
    assert_eq!(m.arg_bindings[0].conversion, ConversionKind::DerivedToBase);
}

#[test]
fn test_ambiguous_base_does_not_convert() {
    let mut engine = engine_with([
        ClassDecl::new("A"),
        ClassDecl::new("B").with_base("A"),
        ClassDecl::new("C").with_base("A"),
        ClassDecl::new("D").with_base("B").with_base("C"),
    ]);
    engine
        .register_function(MemberDecl::function("take", vec![ParamSpec::const_lvalue_ref("A")]))
        .unwrap();

    let call = CallSite::new("take", vec![Argument::lvalue("D")]);
    let verdict = engine.resolve_call(&call);
    assert!(verdict.is_no_match());
}

// =============================================================================
// Member calls
// =============================================================================

#[test]
fn test_member_call_with_different_signatures_still_ambiguous() {
    let engine = engine_with([
        ClassDecl::new("Base1").with_method("foo", vec![ParamSpec::by_value("int")]),
        ClassDecl::new("Base2").with_method("foo", vec![]),
        ClassDecl::new("Derived")
            .with_base("Base1")
            .with_base("Base2"),
    ]);

    let call = engine
        .resolve_member_call("Derived", &CallSite::new("foo", vec![]))
        .unwrap();
    assert!(call.is_ambiguous());

    let qualified = engine
        .resolve_qualified_member_call("Derived", "Base2", &CallSite::new("foo", vec![]))
        .unwrap();
    assert_eq!(qualified.winner().unwrap().to_string(), "Base2::foo()");
}

#[test]
fn test_member_call_ranks_overloads_in_winning_class() {
    let engine = engine_with([
        ClassDecl::new("Base").with_method("put", vec![ParamSpec::by_value("int")]),
        ClassDecl::new("Derived")
            .with_base("Base")
            .with_method("put", vec![ParamSpec::rvalue_ref("int")])
            .with_method("put", vec![ParamSpec::lvalue_ref("int")]),
    ]);

    let site = CallSite::new("put", vec![Argument::lvalue("int")]);
    let call = engine.resolve_member_call("Derived", &site).unwrap();
    assert_eq!(call.winner().unwrap().to_string(), "Derived::put(int&)");

    // Base::put is hidden even when it alone would accept the call.
    let site = CallSite::new("put", vec![Argument::lvalue("double")]);
    let call = engine.resolve_member_call("Derived", &site).unwrap();
    assert!(call.verdict().unwrap().is_no_match());
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_registration_errors() {
    let mut engine = engine_with([ClassDecl::new("A")]);

    assert_eq!(
        engine.register_class(ClassDecl::new("A")).unwrap_err(),
        HierarchError::Registration(RegistrationError::DuplicateClass("A".to_string()))
    );
    let missing_base = ClassDecl::new("B").with_base("Missing");
    assert!(matches!(
        engine.register_class(missing_base).unwrap_err(),
        HierarchError::Registration(RegistrationError::UnknownBase { .. })
    ));
    let repeated_base = ClassDecl::new("B").with_base("A").with_virtual_base("A");
    assert!(matches!(
        engine.register_class(repeated_base).unwrap_err(),
        HierarchError::Registration(RegistrationError::DuplicateBase { .. })
    ));
    assert!(engine.lookup("B", "x").unwrap_err().is_lookup());
}

#[test]
fn test_cycle_rejected_atomically() {
    let mut engine = Engine::new();
    let err = engine
        .register_classes([
            ClassDecl::new("Ok"),
            ClassDecl::new("X").with_base("Y"),
            ClassDecl::new("Y").with_base("Z"),
            ClassDecl::new("Z").with_base("X"),
        ])
        .unwrap_err();

    let HierarchError::Registration(RegistrationError::CyclicInheritance { path }) = err else {
        panic!("expected cycle, got {err:?}");
    };
    assert_eq!(path.first(), path.last());
    for name in ["X", "Y", "Z"] {
        assert!(path.iter().any(|p| p == name));
    }
    assert_eq!(engine.registry().class_count(), 0);
}

#[test]
fn test_registration_order_is_free_in_batches() {
    let engine = engine_with([
        ClassDecl::new("D").with_base("B").with_base("C"),
        ClassDecl::new("C").with_virtual_base("A"),
        ClassDecl::new("B").with_virtual_base("A"),
        ClassDecl::new("A"),
    ]);

    let closure = engine.graph_of("D").unwrap();
    assert!(closure.contains("A"));
    assert_eq!(closure.edges_to("A").count(), 2);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_queries_share_cached_layouts() {
    let mut engine = three_ambiguous();
    engine
        .register_function(MemberDecl::function("foo", vec![ParamSpec::rvalue_ref("int")]))
        .unwrap();
    engine
        .register_function(MemberDecl::function("foo", vec![ParamSpec::lvalue_ref("int")]))
        .unwrap();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let call = CallSite::new("foo", vec![Argument::lvalue("int")]);
                let layout = engine.layout_of("Derived").unwrap();
                let lookup = engine.lookup("Derived", "j").unwrap();
                (layout, lookup, engine.resolve_call(&call))
            })
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let (first_layout, first_lookup, first_call) = &results[0];
    assert!(first_lookup.is_ambiguous());
    assert_eq!(first_call.winner().unwrap().to_string(), "foo(int&)");
    for (layout, lookup, call) in &results {
        assert!(Arc::ptr_eq(layout, first_layout));
        assert_eq!(lookup, first_lookup);
        assert_eq!(call, first_call);
    }

    let cached = engine.layout_of("Derived").unwrap();
    assert!(Arc::ptr_eq(&cached, first_layout));
}
