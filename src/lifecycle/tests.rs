use pretty_assertions::assert_eq;

use crate::{
    checker::checker::{check_unit, CheckedUnit, Unit},
    errors::errors::ErrorKind,
    types::types::{PointerKind, TypeId},
};

use super::checker::PointerState;

fn check(source: &str) -> CheckedUnit {
    check_unit(&Unit::from_source(source, "test.cs").unwrap())
}

fn kinds(unit: &CheckedUnit) -> Vec<ErrorKind> {
    unit.diagnostics.iter().map(|error| error.kind()).collect()
}

#[test]
fn test_unwrap_in_sibling_scopes() {
    let unit = check(
        "fn f(p: *int) {
            { let a: &int = unwrap p; }
            { let b: &int = unwrap p; }
        }",
    );

    assert_eq!(kinds(&unit), vec![]);
    assert_eq!(unit.unwrap_scopes.len(), 2);
    assert_ne!(unit.unwrap_scopes[0].scope, unit.unwrap_scopes[1].scope);
    assert!(unit
        .unwrap_scopes
        .iter()
        .all(|scope| scope.refcount_applicable && scope.element_type == TypeId::INT));
}

#[test]
fn test_if_let_on_extern_pointer_is_not_refcounted() {
    let unit = check(
        "extern stdout: int;
        fn f() {
            if let out = stdout {
                let copy: &int = out;
            }
        }",
    );

    assert_eq!(kinds(&unit), vec![]);
    assert_eq!(unit.unwrap_scopes.len(), 1);
    assert!(!unit.unwrap_scopes[0].refcount_applicable);
    assert_eq!(unit.unwrap_scopes[0].element_type, TypeId::INT);
}

#[test]
fn test_unwrap_requires_pointer() {
    let unit = check(
        "fn f(a: int) {
            let r: &int = unwrap a;
            if let x = a { }
        }",
    );

    assert_eq!(
        kinds(&unit),
        vec![ErrorKind::NotOptionalError, ErrorKind::NotOptionalError]
    );
    assert!(unit.unwrap_scopes.is_empty());
}

#[test]
fn test_returning_a_reference_escapes() {
    let unit = check(
        "fn f(p: *int) -> int {
            let r: &int = unwrap p;
            return r;
        }
        fn g(p: *int) -> int {
            if let r = p {
                return r;
            }
            return 0;
        }",
    );

    assert_eq!(
        kinds(&unit),
        vec![ErrorKind::ReferenceEscapeError, ErrorKind::ReferenceEscapeError]
    );
}

#[test]
fn test_assigning_to_outer_binding_escapes() {
    let unit = check(
        "fn f(p: *int) {
            let outer: &int = unwrap p;
            if let inner = p {
                outer = inner;
            }
        }",
    );

    assert_eq!(kinds(&unit), vec![ErrorKind::ReferenceEscapeError]);
}

#[test]
fn test_assigning_within_scope_is_allowed() {
    let unit = check(
        "fn f(p: *int, q: *int) {
            let a: &int = unwrap p;
            let b: &int = unwrap q;
            a = b;
        }",
    );

    assert_eq!(kinds(&unit), vec![]);
}

#[test]
fn test_reference_in_initializers() {
    let unit = check(
        "struct Holder { value: int }
        fn f(p: *int) {
            let r: &int = unwrap p;
            let h: Holder = Holder { value: r };
            let items: [int] = [1, r];
        }",
    );

    assert_eq!(
        kinds(&unit),
        vec![
            ErrorKind::ReferenceInAggregateError,
            ErrorKind::ReferenceInAggregateError,
        ]
    );
}

#[test]
fn test_new_cannot_produce_extern_pointer() {
    let unit = check("fn f() { let h: extern *int = new 5; }");

    assert_eq!(kinds(&unit), vec![ErrorKind::InvalidInitializerError]);
    assert!(unit.allocations.is_empty());
}

#[test]
fn test_new_initializer_shapes() {
    let unit = check(
        "fn f(x: int) {
            let a: *int = new x;
            let b: *int = new \"text\";
            let c: *float = new 1;
            let d: *int = new -3;
        }",
    );

    assert_eq!(
        kinds(&unit),
        vec![
            ErrorKind::InvalidInitializerError,
            ErrorKind::InvalidInitializerError,
        ]
    );
    assert_eq!(unit.allocations.len(), 2);
    assert_eq!(unit.allocations[0].pointee, TypeId::FLOAT);
}

#[test]
fn test_new_fixed_array_capacity() {
    let unit = check(
        "fn f() {
            let p: *[int; 2] = new [1, 2, 3];
            let q: *[int; 3] = new [1, 2];
        }",
    );

    assert_eq!(kinds(&unit), vec![ErrorKind::InvalidInitializerError]);
}

#[test]
fn test_new_struct_initializer_fields() {
    let unit = check(
        "struct Point { x: int, y: int }
        fn f() {
            let a: *Point = new Point { x: 1, y: 2 };
            let b: *Point = new Point { x: 1 };
            let c: *Point = new Point { x: 1, y: 2, x: 3 };
            let d = new Point { x: 1, y: 2, z: 3 };
        }",
    );

    assert_eq!(
        kinds(&unit),
        vec![
            ErrorKind::InvalidInitializerError,
            ErrorKind::InvalidInitializerError,
            ErrorKind::InvalidInitializerError,
        ]
    );

    // Rejected initializers are not allocation sites
    let point = unit.decl_type("Point").unwrap();
    assert_eq!(unit.allocations.len(), 1);
    assert_eq!(unit.allocations[0].pointee, point);
}

#[test]
fn test_new_pointee_from_context() {
    let unit = check(
        "fn take(h: *u8) { }
        fn f() {
            take(new 4);
            let p: *int;
            p = new 3;
            let inferred = new 2.5;
            if let v = inferred { }
        }",
    );

    assert_eq!(kinds(&unit), vec![]);

    let pointees: Vec<TypeId> = unit.allocations.iter().map(|site| site.pointee).collect();
    assert_eq!(pointees, vec![TypeId::U8, TypeId::INT, TypeId::FLOAT]);
    assert_eq!(unit.unwrap_scopes[0].element_type, TypeId::FLOAT);
}

#[test]
fn test_reference_binding_needs_unwrap() {
    let unit = check("fn f(p: *int) { let r: &int = 5; }");

    assert_eq!(kinds(&unit), vec![ErrorKind::InvalidInitializerError]);
}

#[test]
fn test_undeclared_variable() {
    let unit = check(
        "fn f() {
            missing = 1;
            { let inner = 2; }
            inner = 3;
        }",
    );

    assert_eq!(
        kinds(&unit),
        vec![ErrorKind::VariableNotDeclared, ErrorKind::VariableNotDeclared]
    );
}

#[test]
fn test_pointer_state_before_each_unwrap() {
    let unit = check(
        "extern stdin: int;
        fn f(p: *int) {
            let q: *int;
            if let a = p {
                if let b = p { }
                let c: &int = unwrap p;
            }
            let d: &int = unwrap p;
            if let e = q { }
            if let g = stdin { }
        }",
    );

    assert_eq!(kinds(&unit), vec![]);

    let outer = unit.unwrap_scopes[0].scope;
    let states: Vec<PointerState> = unit
        .unwrap_scopes
        .iter()
        .map(|scope| scope.pointer_state)
        .collect();
    assert_eq!(
        states,
        vec![
            PointerState::Allocated(PointerKind::Owned),
            PointerState::Unwrapped(outer),
            // The inner `if let` ended, so the outer narrowing is back
            PointerState::Unwrapped(outer),
            PointerState::Allocated(PointerKind::Owned),
            PointerState::Uninitialized,
            PointerState::Allocated(PointerKind::Extern),
        ]
    );
    assert_eq!(unit.unwrap_scopes[2].scope, outer);
}

#[test]
fn test_assignment_replaces_an_unwrapped_pointer() {
    let unit = check(
        "fn f(p: *int) {
            let r: &int = unwrap p;
            p = new 4;
            let s: &int = unwrap p;
        }",
    );

    assert_eq!(kinds(&unit), vec![]);
    assert_eq!(
        unit.unwrap_scopes[1].pointer_state,
        PointerState::Allocated(PointerKind::Owned)
    );
}

#[test]
fn test_unwrap_of_call_without_value() {
    let unit = check(
        "fn g() { }
        fn h() -> *int { return new 1; }
        fn f() {
            let r = unwrap g();
            if let x = g() { }
            let s = unwrap h();
        }",
    );

    assert_eq!(
        kinds(&unit),
        vec![ErrorKind::NotOptionalError, ErrorKind::NotOptionalError]
    );
    assert_eq!(unit.unwrap_scopes.len(), 1);
}

#[test]
fn test_new_without_a_known_pointee() {
    let unit = check(
        "fn f() {
            let p = new [];
            let q: *[int] = new [];
            let r = new [missing];
        }",
    );

    assert_eq!(
        kinds(&unit),
        vec![ErrorKind::InvalidInitializerError, ErrorKind::VariableNotDeclared]
    );
    assert_eq!(unit.allocations.len(), 1);
    assert_eq!(unit.types.type_name(unit.allocations[0].pointee), "[int]");
}

#[test]
fn test_rejected_field_is_not_reported_again() {
    let unit = check(
        "struct Holder { r: &int, v: int }
        fn f() {
            let h: Holder = Holder { r: 1, v: 2 };
            let p: *Holder = new Holder { v: 3 };
        }",
    );

    assert_eq!(kinds(&unit), vec![ErrorKind::ReferenceInAggregateError]);
    assert_eq!(unit.allocations.len(), 1);
}
