use pretty_assertions::assert_eq;

use crate::{
    ast::ast::Decl,
    checker::session::Session,
    const_eval::value::{ConstEnv, ConstValue},
    errors::errors::{Error, ErrorKind},
    parser::parser::{parse_expression, parse_source},
    types::types::{PointerKind, TypeDescriptor, TypeId},
};

use super::validator::{check_array_length, reject_reference_component, validate_fields};

/// Declares every struct of `source` and validates them in order.
fn validate(source: &str) -> (Session, Vec<Error>) {
    let decls = parse_source(source, "test.cs").unwrap();
    let mut session = Session::start();

    for decl in &decls {
        if let Decl::Struct(decl) = decl {
            session.types_mut().declare_struct(&decl.name);
        }
    }

    let mut errors = vec![];
    for decl in &decls {
        if let Decl::Struct(decl) = decl {
            errors.extend(validate_fields(&mut session, decl));
        }
    }

    (session, errors)
}

fn kinds(errors: &[Error]) -> Vec<ErrorKind> {
    errors.iter().map(|error| error.kind()).collect()
}

#[test]
fn test_pointer_and_function_pointer_fields_accepted() {
    let (session, errors) = validate(
        "struct test_s {
            a: int,
            c: extern *int,
            d: [int],
            e: *[int],
            f: *[int; 5],
            g: fn(int) -> int,
        }",
    );

    assert_eq!(errors, vec![]);

    let types = session.types();
    let id = types.lookup_name("test_s").unwrap();
    let descriptor = types.struct_descriptor(id).unwrap();
    assert!(descriptor.resolved);
    assert_eq!(descriptor.fields.len(), 6);

    let c = descriptor.field("c").unwrap();
    assert_eq!(types.pointer(c), Some((TypeId::INT, PointerKind::Extern)));
    assert_eq!(types.type_name(descriptor.field("f").unwrap()), "*[int; 5]");
}

#[test]
fn test_reference_field_reported_once() {
    let (session, errors) = validate("struct S { a: int, r: &int, b: float }");

    assert_eq!(kinds(&errors), vec![ErrorKind::ReferenceInAggregateError]);
    assert_eq!(errors[0].get_position().0, 19);

    // The offending field is left out of the layout
    let types = session.types();
    let descriptor = types.struct_descriptor(types.lookup_name("S").unwrap()).unwrap();
    let names: Vec<&str> = descriptor.fields.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_reference_through_typedef_is_rejected() {
    let decls = parse_source("typedef R = &int;\nstruct S { r: R }", "test.cs").unwrap();
    let mut session = Session::start();

    let Decl::Typedef(typedef) = &decls[0] else {
        panic!("expected typedef");
    };
    let id = session.types_mut().declare_typedef("R").unwrap();
    session.defer_typedef("R", id, typedef.target.clone());
    session.types_mut().declare_struct("S");

    let Decl::Struct(decl) = &decls[1] else {
        panic!("expected struct");
    };
    let errors = validate_fields(&mut session, decl);

    assert_eq!(kinds(&errors), vec![ErrorKind::ReferenceInAggregateError]);
}

#[test]
fn test_reference_inside_compound_field() {
    let (_, errors) = validate("struct S { a: [&int], b: *&int, c: fn(&int) }");

    assert_eq!(
        kinds(&errors),
        vec![
            ErrorKind::ReferenceInAggregateError,
            ErrorKind::ReferenceInAggregateError,
            ErrorKind::ReferenceInAggregateError,
        ]
    );
}

#[test]
fn test_duplicate_field_reports_later_field() {
    let (_, errors) = validate("struct S { x: int, y: int, x: float }");

    assert_eq!(kinds(&errors), vec![ErrorKind::DuplicateFieldNameError]);
    assert_eq!(errors[0].get_position().0, 27);
    assert_eq!(
        errors[0].to_string(),
        "field \"x\" declared more than once in struct \"S\""
    );
}

#[test]
fn test_unknown_field_type() {
    let (_, errors) = validate("struct S { next: *Missing }");

    assert_eq!(kinds(&errors), vec![ErrorKind::UnknownTypeNameError]);
}

#[test]
fn test_mutually_referencing_structs() {
    let (session, errors) = validate(
        "struct A { b: *B }
         struct B { a: *A }",
    );

    assert_eq!(errors, vec![]);
    let types = session.types();
    let a = types.lookup_name("A").unwrap();
    let b = types.lookup_name("B").unwrap();
    let field = types.struct_descriptor(a).unwrap().field("b").unwrap();
    assert_eq!(types.pointer(field), Some((b, PointerKind::Owned)));
}

#[test]
fn test_fixed_array_lengths() {
    let (_, errors) = validate("struct S { a: [int; 0], b: [int; 0 - 3], c: [int; LEN], d: [int; 2 * 3] }");

    assert_eq!(
        kinds(&errors),
        vec![
            ErrorKind::InvalidArrayLengthError,
            ErrorKind::InvalidArrayLengthError,
            ErrorKind::InvalidArrayLengthError,
        ]
    );
}

#[test]
fn test_array_length_uses_constants() {
    let mut consts = ConstEnv::new();
    consts.define("LEN", ConstValue::UInt(4));

    let length = parse_expression("LEN * 2").unwrap();
    assert_eq!(check_array_length(&length, &consts), Ok(8));

    let huge = parse_expression("0x100000000").unwrap();
    assert_eq!(
        check_array_length(&huge, &consts).unwrap_err().kind(),
        ErrorKind::InvalidArrayLengthError
    );
}

#[test]
fn test_reject_reference_component() {
    let mut session = Session::start();
    let reference = session
        .types_mut()
        .intern(TypeDescriptor::Reference(TypeId::INT));
    let position = crate::Position::null();

    assert!(reject_reference_component(session.types(), TypeId::INT, "x", &position).is_ok());
    assert_eq!(
        reject_reference_component(session.types(), reference, "an array element", &position)
            .unwrap_err()
            .to_string(),
        "reference type found in an array element"
    );
}
