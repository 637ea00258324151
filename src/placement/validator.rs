use std::collections::HashSet;

use crate::{
    ast::{ast::Expr, declarations::StructDecl},
    checker::session::Session,
    const_eval::{evaluator::evaluate, value::ConstEnv},
    errors::errors::{Error, ErrorImpl},
    types::{
        table::TypeTable,
        types::{IntWidth, Primitive, TypeId},
    },
    Position,
};

/// Rejects a reference used as a component of a compound type.
pub fn reject_reference_component(
    types: &TypeTable,
    component: TypeId,
    context: &str,
    position: &Position,
) -> Result<(), Error> {
    if types.is_reference(component) {
        return Err(Error::new(
            ErrorImpl::ReferenceInAggregate {
                context: context.to_string(),
            },
            position.clone(),
        ));
    }

    Ok(())
}

/// Folds a fixed array length. It has to be a constant in `1..=u32::MAX`.
pub fn check_array_length(length: &Expr, consts: &ConstEnv) -> Result<u32, Error> {
    let invalid = |reason: String| {
        Error::new(
            ErrorImpl::InvalidArrayLength { reason },
            length.get_position().clone(),
        )
    };

    let value = evaluate(length, Primitive::Int(IntWidth::W64), consts)
        .map_err(|error| invalid(error.to_string()))?;

    match value.as_integer() {
        Some(n) if n <= 0 => Err(invalid(format!("length {} is not positive", n))),
        Some(n) => u32::try_from(n).map_err(|_| invalid(format!("length {} is too large", n))),
        None => Err(invalid(format!("length {} is not an integer", value))),
    }
}

/// Resolves the fields of a struct and records them in its table entry.
///
/// Fields that fail to resolve or break a placement rule are left out of the
/// recorded layout. Returns every problem found, in field order.
pub fn validate_fields(session: &mut Session, decl: &StructDecl) -> Vec<Error> {
    let mut errors = vec![];

    let Some(id) = session.types().lookup_name(&decl.name) else {
        return errors;
    };

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(decl.fields.len());

    for field in &decl.fields {
        if !seen.insert(field.name.as_str()) {
            errors.push(Error::new(
                ErrorImpl::DuplicateFieldName {
                    struct_name: decl.name.clone(),
                    field: field.name.clone(),
                },
                field.span.start.clone(),
            ));
            continue;
        }

        let ty = match session.intern_type_expr(&field.field_type) {
            Ok(ty) if ty.is_valid() => ty,
            Ok(_) => {
                session.reject_field(id, &field.name);
                continue;
            }
            Err(error) => {
                session.reject_field(id, &field.name);
                errors.push(error);
                continue;
            }
        };

        let context = format!("field `{}` of struct `{}`", field.name, decl.name);
        if let Err(error) =
            reject_reference_component(session.types(), ty, &context, &field.span.start)
        {
            session.reject_field(id, &field.name);
            errors.push(error);
            continue;
        }

        fields.push((field.name.clone(), ty));
    }

    tracing::trace!(name = %decl.name, fields = fields.len(), "validated struct fields");
    session.types_mut().define_struct(id, fields);

    errors
}
