use std::{collections::HashSet, sync::Arc};

use crate::{
    ast::{
        ast::Decl,
        declarations::{ConstDecl, ExternDecl, FnDecl},
    },
    const_eval::{evaluator::evaluate, value::ConstValue},
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    lifecycle::checker::{check_function, AllocationSite, UnwrapScope},
    parser::parser::parse_source,
    placement::validator::{reject_reference_component, validate_fields},
    types::{
        table::TypeTable,
        types::{PointerKind, TypeDescriptor, TypeId},
    },
};

use super::session::{Session, SessionState, PRIMITIVE_NAMES};

/// One source file's declarations.
#[derive(Debug, Clone)]
pub struct Unit {
    pub file: Arc<String>,
    pub decls: Vec<Decl>,
}

impl Unit {
    pub fn new(file: &str, decls: Vec<Decl>) -> Self {
        Unit {
            file: Arc::new(file.to_string()),
            decls,
        }
    }

    pub fn from_source(source: &str, file: &str) -> Result<Self, Error> {
        Ok(Unit::new(file, parse_source(source, file)?))
    }
}

/// Result of checking a unit.
///
/// Only a unit without diagnostics is fit for code generation.
#[derive(Debug, Clone)]
pub struct CheckedUnit {
    pub file: Arc<String>,
    pub types: TypeTable,
    pub state: SessionState,
    /// Resolved type of every declaration that resolved, in declaration order.
    pub decl_types: Vec<(String, TypeId)>,
    /// Every constant that folded, in declaration order.
    pub consts: Vec<(String, ConstValue)>,
    pub unwrap_scopes: Vec<UnwrapScope>,
    pub allocations: Vec<AllocationSite>,
    /// Sorted by position.
    pub diagnostics: Vec<Error>,
}

impl CheckedUnit {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn decl_type(&self, name: &str) -> Option<TypeId> {
        self.decl_types
            .iter()
            .find(|(decl, _)| decl == name)
            .map(|(_, ty)| *ty)
    }

    pub fn const_value(&self, name: &str) -> Option<&ConstValue> {
        self.consts
            .iter()
            .find(|(decl, _)| decl == name)
            .map(|(_, value)| value)
    }
}

/// A function waiting for its body to be checked.
struct Signature<'a> {
    decl: &'a FnDecl,
    parameters: Vec<(String, TypeId)>,
    return_type: Option<TypeId>,
}

/// Checks one unit: names, typedefs and constants, signatures, struct
/// layouts and finally function bodies.
#[tracing::instrument(level = "debug", skip_all, fields(file = %unit.file, decls = unit.decls.len()))]
pub fn check_unit(unit: &Unit) -> CheckedUnit {
    let mut session = Session::start();
    let mut diagnostics = Diagnostics::new();

    let live = register_names(&mut session, &unit.decls, &mut diagnostics);
    let mut decl_types = vec![None; unit.decls.len()];
    let mut consts = vec![];

    // Typedefs and constants, in declaration order
    for (index, decl) in live.iter().map(|index| (*index, &unit.decls[*index])) {
        match decl {
            Decl::Typedef(typedef) => {
                let resolved = session.resolve_typedef(&typedef.name);
                if let Some(ty) = diagnostics.take(resolved).filter(|ty| ty.is_valid()) {
                    decl_types[index] = Some(ty);
                }
            }
            Decl::Const(decl) => {
                if let Some((ty, value)) = fold_const(&mut session, decl, &mut diagnostics) {
                    decl_types[index] = Some(ty);
                    consts.push((decl.name.clone(), value));
                }
            }
            _ => {}
        }
    }
    tracing::debug!(consts = consts.len(), "folded constants");

    let mut signatures = vec![];
    for (index, decl) in live.iter().map(|index| (*index, &unit.decls[*index])) {
        match decl {
            Decl::Function(decl) => {
                let (ty, signature) = resolve_signature(&mut session, decl, &mut diagnostics);
                if ty.is_valid() {
                    decl_types[index] = Some(ty);
                }
                signatures.push(signature);
            }
            Decl::Extern(decl) => {
                if let Some(ty) = resolve_extern(&mut session, decl, &mut diagnostics) {
                    decl_types[index] = Some(ty);
                }
            }
            _ => {}
        }
    }
    tracing::debug!(functions = signatures.len(), "resolved signatures");

    for (index, decl) in live.iter().map(|index| (*index, &unit.decls[*index])) {
        if let Decl::Struct(decl) = decl {
            diagnostics.extend(validate_fields(&mut session, decl));
            decl_types[index] = session.types().lookup_name(&decl.name);
        }
    }
    tracing::debug!("validated struct layouts");

    let mut unwrap_scopes = vec![];
    let mut allocations = vec![];
    for signature in &signatures {
        let report = check_function(
            &mut session,
            signature.decl,
            &signature.parameters,
            signature.return_type,
        );
        diagnostics.extend(report.diagnostics);
        unwrap_scopes.extend(report.unwrap_scopes);
        allocations.extend(report.allocations);
    }

    let decl_types = unit
        .decls
        .iter()
        .zip(decl_types)
        .filter_map(|(decl, ty)| ty.map(|ty| (decl.name().to_string(), ty)))
        .collect();

    let output = if diagnostics.is_empty() {
        session.finish()
    } else {
        session.abort()
    };

    let diagnostics = diagnostics.into_sorted();
    tracing::debug!(errors = diagnostics.len(), "checked unit");

    CheckedUnit {
        file: Arc::clone(&unit.file),
        types: output.types,
        state: output.state,
        decl_types,
        consts,
        unwrap_scopes,
        allocations,
        diagnostics,
    }
}

/// Registers every top level name. Returns the indices of the declarations
/// that were not rejected as duplicates.
fn register_names(
    session: &mut Session,
    decls: &[Decl],
    diagnostics: &mut Diagnostics,
) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut live = vec![];

    for (index, decl) in decls.iter().enumerate() {
        let name = decl.name();

        if PRIMITIVE_NAMES.contains_key(name) || !seen.insert(name) {
            diagnostics.push(Error::new(
                ErrorImpl::DuplicateTypeName {
                    name: name.to_string(),
                },
                decl.get_position().clone(),
            ));
            continue;
        }

        match decl {
            Decl::Struct(decl) => {
                session.types_mut().declare_struct(&decl.name);
            }
            Decl::Typedef(decl) => {
                if let Some(id) = session.types_mut().declare_typedef(&decl.name) {
                    session.defer_typedef(&decl.name, id, decl.target.clone());
                }
            }
            _ => {}
        }

        live.push(index);
    }

    tracing::debug!(names = live.len(), "registered names");
    live
}

fn fold_const(
    session: &mut Session,
    decl: &ConstDecl,
    diagnostics: &mut Diagnostics,
) -> Option<(TypeId, ConstValue)> {
    let resolved = session.intern_type_expr(&decl.const_type);
    let ty = diagnostics.take(resolved).unwrap_or(TypeId::INVALID);

    // Bodies may still name the constant, even when it failed
    session.declare_global(&decl.name, ty);

    let Some(primitive) = session.types().primitive(ty) else {
        if ty.is_valid() {
            diagnostics.push(Error::new(
                ErrorImpl::NotConstant {
                    name: decl.name.clone(),
                    reason: format!(
                        "constants must have a primitive type, found `{}`",
                        session.types().type_name(ty)
                    ),
                },
                decl.const_type.get_position().clone(),
            ));
        }
        session.consts_mut().poison(&decl.name);
        return None;
    };

    match evaluate(&decl.value, primitive, session.consts()) {
        Ok(value) => {
            tracing::trace!(name = %decl.name, %value, "constant");
            session.consts_mut().define(&decl.name, value.clone());
            Some((ty, value))
        }
        Err(error) => {
            diagnostics.push(error);
            session.consts_mut().poison(&decl.name);
            None
        }
    }
}

/// A function's signature is its function pointer type, so the same
/// placement rules apply to parameters and the return type.
///
/// Parameters that fail to resolve stay bound with an invalid type so the
/// body can still be checked.
fn resolve_signature<'a>(
    session: &mut Session,
    decl: &'a FnDecl,
    diagnostics: &mut Diagnostics,
) -> (TypeId, Signature<'a>) {
    let mut parameters = Vec::with_capacity(decl.parameters.len());

    for parameter in &decl.parameters {
        let resolved = session.intern_type_expr(&parameter.param_type).and_then(|ty| {
            reject_reference_component(
                session.types(),
                ty,
                "a function parameter",
                parameter.param_type.get_position(),
            )
            .map(|_| ty)
        });
        let ty = diagnostics.take(resolved).unwrap_or(TypeId::INVALID);
        parameters.push((parameter.name.clone(), ty));
    }

    let return_type = match &decl.return_type {
        Some(return_type) => {
            let resolved = session.intern_type_expr(return_type).and_then(|ty| {
                reject_reference_component(
                    session.types(),
                    ty,
                    "a function return type",
                    return_type.get_position(),
                )
                .map(|_| ty)
            });
            Some(diagnostics.take(resolved).unwrap_or(TypeId::INVALID))
        }
        None => None,
    };

    let function =
        session.function_type(parameters.iter().map(|(_, ty)| *ty).collect(), return_type);
    session.declare_global(&decl.name, function);

    let signature = Signature {
        decl,
        parameters,
        return_type: return_type.filter(|ty| ty.is_valid()),
    };

    (function, signature)
}

fn resolve_extern(
    session: &mut Session,
    decl: &ExternDecl,
    diagnostics: &mut Diagnostics,
) -> Option<TypeId> {
    let resolved = session.intern_type_expr(&decl.element).and_then(|element| {
        reject_reference_component(
            session.types(),
            element,
            "an extern pointer element",
            decl.element.get_position(),
        )
        .map(|_| element)
    });

    let element = diagnostics.take(resolved).unwrap_or(TypeId::INVALID);
    if !element.is_valid() {
        session.declare_global(&decl.name, TypeId::INVALID);
        return None;
    }

    let ty = session
        .types_mut()
        .intern(TypeDescriptor::Pointer(element, PointerKind::Extern));
    session.declare_global(&decl.name, ty);
    Some(ty)
}
