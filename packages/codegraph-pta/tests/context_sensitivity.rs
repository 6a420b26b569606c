//! Precision of the context abstractions on classic container patterns

mod common;

use codegraph_pta::prelude::*;
use common::*;
use pretty_assertions::assert_eq;

const CI: ContextSensitivity = ContextSensitivity::Insensitive;
const CALL_1: ContextSensitivity = ContextSensitivity::CallSite { k: 1 };
const OBJ_1: ContextSensitivity = ContextSensitivity::Object { k: 1 };
const OBJ_2: ContextSensitivity = ContextSensitivity::Object { k: 2 };
const TYPE_1: ContextSensitivity = ContextSensitivity::Type { k: 1 };

/// Whether `x1`/`x2` each see only their own object
fn separates(s: &ContainerScenario, sensitivity: ContextSensitivity) -> bool {
    let result = analyze(&s.program, sensitivity);
    let o1 = objs(&result, &[s.o1]);
    let o2 = objs(&result, &[s.o2]);
    let x1 = result.points_to(s.x1);
    let x2 = result.points_to(s.x2);

    // Every abstraction stays sound
    assert!(o1.is_subset(&x1), "{}: x1 lost its object", sensitivity.label());
    assert!(o2.is_subset(&x2), "{}: x2 lost its object", sensitivity.label());
    x1 == o1 && x2 == o2
}

#[test]
fn test_identity_call_needs_call_site_contexts() {
    let s = identity_scenario();
    assert!(!separates(&s, CI));
    assert!(separates(&s, CALL_1));
    // Static callees inherit the caller's receiver context
    assert!(!separates(&s, OBJ_1));
}

#[test]
fn test_container_separated_by_receiver_objects() {
    let s = container_scenario();
    assert!(!separates(&s, CI));
    assert!(separates(&s, OBJ_1));
    assert!(separates(&s, CALL_1));
}

#[test]
fn test_type_contexts_merge_objects_allocated_in_one_class() {
    let s = container_scenario();
    assert!(!separates(&s, TYPE_1));
}

#[test]
fn test_type_contexts_separate_distinct_factories() {
    let s = factory_container_scenario();
    assert!(!separates(&s, CI));
    assert!(separates(&s, TYPE_1));
}

#[test]
fn test_nested_allocation_needs_heap_context() {
    let s = nested_container_scenario();
    assert!(!separates(&s, OBJ_1));
    assert!(separates(&s, OBJ_2));
}

#[test]
fn test_method_contexts_are_recorded() {
    let s = container_scenario();
    let result = analyze(&s.program, OBJ_1);

    let set = s.program.method_by_name("Box", "void set(Object)").unwrap();
    let v = s.program.var_by_name(set, "v").unwrap();
    let contexts = result.contexts_of(v);
    assert_eq!(contexts.len(), 2);
    for ctx in contexts {
        let elems = result.context_elems(ctx);
        assert_eq!(elems.len(), 1);
        assert!(matches!(elems[0], ContextElem::Object(_)));
        assert_eq!(result.cs_points_to(ctx, v).len(), 1);
    }
    assert_eq!(result.stats().sensitivity, "1-obj");
}

#[test]
fn test_two_level_heap_contexts_split_inner_objects() {
    let s = nested_container_scenario();
    let one = analyze(&s.program, OBJ_1);
    let two = analyze(&s.program, OBJ_2);

    // Same abstract objects, more context-qualified copies of the inner cell
    assert_eq!(one.stats().objects, two.stats().objects);
    assert!(two.stats().cs_objects > one.stats().cs_objects);
    assert!(two.stats().cs_methods > one.stats().cs_methods);
}

#[test]
fn test_context_sensitivity_never_adds_call_edges() {
    let s = dispatch_scenario();
    let ci = analyze(&s.program, CI).ci_call_graph();
    for sensitivity in [CALL_1, OBJ_1, OBJ_2, TYPE_1] {
        let cs = analyze(&s.program, sensitivity).ci_call_graph();
        for edge in cs.edges() {
            assert!(ci.has_edge(edge.call_site, edge.callee), "{}", sensitivity.label());
        }
    }
}

#[test]
fn test_context_insensitive_uses_only_empty_context() {
    let s = nested_container_scenario();
    let result = analyze(&s.program, CI);
    assert_eq!(result.stats().contexts, 1);
    assert!(result.context_elems(ContextId::EMPTY).is_empty());
}
