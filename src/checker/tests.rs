use pretty_assertions::assert_eq;

use crate::{
    const_eval::value::ConstValue,
    errors::errors::ErrorKind,
    types::types::{PointerKind, TypeDescriptor, TypeId},
};

use super::{
    checker::{check_unit, CheckedUnit, Unit},
    merge::check_units,
    session::{Session, SessionState},
};

fn check(source: &str) -> CheckedUnit {
    check_unit(&Unit::from_source(source, "test.cs").unwrap())
}

fn kinds(unit: &CheckedUnit) -> Vec<ErrorKind> {
    unit.diagnostics.iter().map(|error| error.kind()).collect()
}

#[test]
fn test_mutually_referencing_structs_in_either_order() {
    for source in [
        "struct A { b: *B, v: int }\nstruct B { a: *A }",
        "struct B { a: *A }\nstruct A { b: *B, v: int }",
    ] {
        let unit = check(source);
        assert_eq!(kinds(&unit), vec![]);

        let a = unit.decl_type("A").unwrap();
        let b = unit.decl_type("B").unwrap();
        let fields = &unit.types.struct_descriptor(a).unwrap().fields;
        assert_eq!(fields[0].0, "b");
        assert_eq!(unit.types.pointer(fields[0].1), Some((b, PointerKind::Owned)));
    }
}

#[test]
fn test_duplicate_top_level_names() {
    let unit = check(
        "struct Point { x: int }
        let Point: const int = 1;
        fn Point() { }
        struct int { }",
    );

    assert_eq!(
        kinds(&unit),
        vec![
            ErrorKind::DuplicateTypeNameError,
            ErrorKind::DuplicateTypeNameError,
            ErrorKind::DuplicateTypeNameError,
        ]
    );

    // The first declaration is kept
    let point = unit.decl_type("Point").unwrap();
    assert!(matches!(unit.types.resolve(point), Some(TypeDescriptor::Struct(_))));
}

#[test]
fn test_recursive_typedef_reported_once() {
    let unit = check("typedef A = B;\ntypedef B = A;\ntypedef C = int;");

    assert_eq!(kinds(&unit), vec![ErrorKind::RecursiveTypedefError]);
    assert_eq!(unit.diagnostics[0].get_position().0, 12);
    assert_eq!(unit.decl_type("C"), Some(TypeId::INT));
    assert_eq!(unit.decl_type("A"), None);
}

#[test]
fn test_self_referencing_typedef() {
    let unit = check("typedef T = *T;\nstruct S { t: T }");

    assert_eq!(kinds(&unit), vec![ErrorKind::RecursiveTypedefError]);
}

#[test]
fn test_typedef_is_an_alias() {
    let unit = check(
        "struct test_s { a: int }
        typedef test_t = test_s;
        typedef small = u8;
        let X: const small = 300;",
    );

    assert_eq!(kinds(&unit), vec![]);
    assert_eq!(unit.decl_type("test_t"), unit.decl_type("test_s"));
    assert_eq!(unit.decl_type("X"), Some(TypeId::U8));
    assert_eq!(unit.const_value("X"), Some(&ConstValue::UInt(44)));
}

#[test]
fn test_constants_fold_in_declaration_order() {
    let unit = check(
        "let A: const uint = 5 + 2 >> 5 * 5;
        let B: const int = A + C;
        let C: const int = 3;
        let D: const int = B;
        let E: const Point = 1;
        struct Point { x: int }",
    );

    assert_eq!(
        kinds(&unit),
        vec![
            ErrorKind::NotConstantError,
            ErrorKind::NotConstantError,
            ErrorKind::NotConstantError,
        ]
    );
    assert_eq!(
        unit.consts,
        vec![
            ("A".to_string(), ConstValue::UInt(0)),
            ("C".to_string(), ConstValue::Int(3)),
        ]
    );
}

#[test]
fn test_constants_size_fixed_arrays() {
    let unit = check(
        "let LEN: const uint = 2 * 4;
        struct Buffer { data: [u8; LEN] }",
    );

    assert_eq!(kinds(&unit), vec![]);
    let buffer = unit.decl_type("Buffer").unwrap();
    let data = unit.types.struct_descriptor(buffer).unwrap().field("data").unwrap();
    assert_eq!(unit.types.type_name(data), "[u8; 8]");
}

#[test]
fn test_function_and_extern_types() {
    let unit = check(
        "extern handle: Point;
        struct Point { x: int }
        fn addtwo(a: int, b: int) -> int {
            return a + b;
        }",
    );

    assert_eq!(kinds(&unit), vec![]);
    assert_eq!(
        unit.types.type_name(unit.decl_type("addtwo").unwrap()),
        "fn(int, int) -> int"
    );
    assert_eq!(
        unit.types.type_name(unit.decl_type("handle").unwrap()),
        "extern *Point"
    );
    assert_eq!(unit.state, SessionState::Finished);
}

#[test]
fn test_reference_in_function_signature() {
    let unit = check("fn f(r: &int) -> &int { }");

    assert_eq!(
        kinds(&unit),
        vec![
            ErrorKind::ReferenceInAggregateError,
            ErrorKind::ReferenceInAggregateError,
        ]
    );
    assert_eq!(unit.decl_type("f"), None);
    assert_eq!(unit.state, SessionState::Aborted);
}

#[test]
fn test_unknown_parameter_type_does_not_cascade() {
    let unit = check("fn f(a: Missing) { a = 1; }");

    assert_eq!(kinds(&unit), vec![ErrorKind::UnknownTypeNameError]);
}

#[test]
fn test_diagnostics_sorted_by_position() {
    // The body is checked after the struct, but comes first in the file
    let unit = check("fn f() { missing = 1; }\nstruct S { r: &int, r: int }");

    assert_eq!(
        kinds(&unit),
        vec![
            ErrorKind::VariableNotDeclared,
            ErrorKind::ReferenceInAggregateError,
            ErrorKind::DuplicateFieldNameError,
        ]
    );
    let offsets: Vec<u32> = unit.diagnostics.iter().map(|error| error.get_position().0).collect();
    let mut sorted = offsets.clone();
    sorted.sort();
    assert_eq!(offsets, sorted);
}

#[test]
fn test_collects_errors_from_independent_declarations() {
    let unit = check(
        "let A: const int = 1 / 0;
        struct S { a: [int; 0] }
        fn f(p: int) { unwrap p; }
        let B: const int = 2;",
    );

    assert_eq!(
        kinds(&unit),
        vec![
            ErrorKind::DivisionByZeroError,
            ErrorKind::InvalidArrayLengthError,
            ErrorKind::NotOptionalError,
        ]
    );
    assert_eq!(unit.const_value("B"), Some(&ConstValue::Int(2)));
}

#[test]
fn test_session_lifecycle() {
    let session = Session::start();
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.types().len(), TypeId::FIRST_DYNAMIC as usize);

    assert_eq!(Session::start().finish().state, SessionState::Finished);
    assert_eq!(Session::start().abort().state, SessionState::Aborted);
}

#[test]
fn test_failed_typedef_is_remembered() {
    let mut session = Session::start();
    let id = session.types_mut().declare_typedef("T").unwrap();
    let target = crate::ast::types::TypeExpr::symbol("Missing", crate::Position::null());
    session.defer_typedef("T", id, target);

    assert_eq!(
        session.resolve_typedef("T").unwrap_err().kind(),
        ErrorKind::UnknownTypeNameError
    );
    assert!(session.typedef_failed("T"));
    assert_eq!(session.resolve_typedef("T"), Ok(TypeId::INVALID));
}

fn units(sources: &[(&str, &str)]) -> Vec<Unit> {
    sources
        .iter()
        .map(|(file, source)| Unit::from_source(source, file).unwrap())
        .collect()
}

#[test]
fn test_merge_reports_every_duplicate_site() {
    let a = ("a.cs", "struct Shared { x: int }\nstruct OnlyA { s: *Shared }");
    let b = ("b.cs", "typedef Shared = int;\nlet OnlyB: const int = 2;");

    let forward = check_units(&units(&[a, b]));
    let backward = check_units(&units(&[b, a]));

    let sites = |diagnostics: &Vec<crate::errors::errors::Error>| {
        diagnostics
            .iter()
            .map(|error| (error.get_error_name().to_string(), error.get_position().clone()))
            .collect::<Vec<_>>()
    };

    assert_eq!(forward.diagnostics.len(), 2);
    assert!(forward
        .diagnostics
        .iter()
        .all(|error| error.kind() == ErrorKind::DuplicateTypeNameError));
    assert_eq!(sites(&forward.diagnostics), sites(&backward.diagnostics));
    assert_eq!(forward.diagnostics[0].get_position().1.as_str(), "a.cs");
    assert_eq!(forward.diagnostics[1].get_position().1.as_str(), "b.cs");
    assert!(!forward.is_ok());
}

#[test]
fn test_merge_rebuilds_type_table() {
    let program = check_units(&units(&[
        ("a.cs", "struct Node { next: *Node, value: int }"),
        ("b.cs", "struct Pair { left: *[int], right: *[int] }"),
    ]));

    assert!(program.is_ok());
    assert_eq!(program.units.len(), 2);

    let node = program.units[0].decl_type("Node").unwrap();
    assert_eq!(program.global_type(0, node), program.types.lookup_name("Node").unwrap());

    let pair = program.types.lookup_name("Pair").unwrap();
    let fields = &program.types.struct_descriptor(pair).unwrap().fields;
    assert_eq!(fields[0].1, fields[1].1);
    assert_eq!(program.types.type_name(fields[0].1), "*[int]");
}

#[test]
fn test_many_units_in_parallel() {
    let sources: Vec<(String, String)> = (0..16)
        .map(|index| {
            (
                format!("unit{index:02}.cs"),
                format!("struct S{index} {{ v: int }}\nlet C{index}: const int = {index};"),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = sources
        .iter()
        .map(|(file, source)| (file.as_str(), source.as_str()))
        .collect();

    let program = check_units(&units(&borrowed));

    assert!(program.is_ok());
    for (index, unit) in program.units.iter().enumerate() {
        assert_eq!(unit.file.as_str(), format!("unit{index:02}.cs"));
        assert_eq!(unit.const_value(&format!("C{index}")), Some(&ConstValue::Int(index as i64)));
    }
    assert!(program.types.lookup_name("S15").is_some());
}
