use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::{
    ast::types::TypeExpr,
    const_eval::value::ConstEnv,
    errors::errors::{Error, ErrorImpl},
    placement::validator::{check_array_length, reject_reference_component},
    types::{
        table::TypeTable,
        types::{IntWidth, Primitive, TypeDescriptor, TypeId},
    },
    Position,
};

lazy_static! {
    /// Builtin type names. These share the top level namespace.
    pub static ref PRIMITIVE_NAMES: HashMap<&'static str, Primitive> = {
        let mut map = HashMap::new();
        map.insert("int", Primitive::INT);
        map.insert("uint", Primitive::UINT);
        map.insert("i8", Primitive::Int(IntWidth::W8));
        map.insert("i16", Primitive::Int(IntWidth::W16));
        map.insert("i32", Primitive::Int(IntWidth::W32));
        map.insert("i64", Primitive::Int(IntWidth::W64));
        map.insert("u8", Primitive::UInt(IntWidth::W8));
        map.insert("u16", Primitive::UInt(IntWidth::W16));
        map.insert("u32", Primitive::UInt(IntWidth::W32));
        map.insert("u64", Primitive::UInt(IntWidth::W64));
        map.insert("float", Primitive::Float);
        map.insert("str", Primitive::Str);
        map
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finished,
    Aborted,
}

/// The type table, constants and globals of one compilation unit.
///
/// A session is started empty, mutated by the declaration phases and then
/// either finished or aborted, which hands the table back read-only.
#[derive(Debug)]
pub struct Session {
    types: TypeTable,
    consts: ConstEnv,
    globals: HashMap<String, TypeId>,
    pending_typedefs: HashMap<String, (TypeId, TypeExpr)>,
    resolving: Vec<String>,
    failed_typedefs: HashSet<String>,
    /// Fields left out of a struct layout because they failed to resolve.
    rejected_fields: HashMap<TypeId, HashSet<String>>,
    state: SessionState,
}

/// What a session leaves behind.
#[derive(Debug, Clone)]
pub struct SessionOutput {
    pub types: TypeTable,
    pub state: SessionState,
}

impl Session {
    pub fn start() -> Self {
        tracing::trace!("session started");

        Session {
            types: TypeTable::new(),
            consts: ConstEnv::new(),
            globals: HashMap::new(),
            pending_typedefs: HashMap::new(),
            resolving: vec![],
            failed_typedefs: HashSet::new(),
            rejected_fields: HashMap::new(),
            state: SessionState::Active,
        }
    }

    pub fn finish(mut self) -> SessionOutput {
        self.state = SessionState::Finished;
        tracing::debug!(types = self.types.len(), "session finished");
        self.into_output()
    }

    pub fn abort(mut self) -> SessionOutput {
        self.state = SessionState::Aborted;
        tracing::debug!(types = self.types.len(), "session aborted");
        self.into_output()
    }

    fn into_output(self) -> SessionOutput {
        SessionOutput {
            types: self.types,
            state: self.state,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    pub fn consts(&self) -> &ConstEnv {
        &self.consts
    }

    pub fn consts_mut(&mut self) -> &mut ConstEnv {
        &mut self.consts
    }

    pub fn declare_global(&mut self, name: &str, ty: TypeId) {
        self.globals.insert(name.to_string(), ty);
    }

    /// Type of a constant, function or extern binding.
    pub fn global(&self, name: &str) -> Option<TypeId> {
        self.globals.get(name).copied()
    }

    pub fn reject_field(&mut self, struct_id: TypeId, field: &str) {
        self.rejected_fields
            .entry(struct_id)
            .or_default()
            .insert(field.to_string());
    }

    /// Whether `field` was declared on the struct but already reported.
    pub fn field_rejected(&self, struct_id: TypeId, field: &str) -> bool {
        self.rejected_fields
            .get(&struct_id)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Queues a typedef target for resolution on first use.
    pub fn defer_typedef(&mut self, name: &str, id: TypeId, target: TypeExpr) {
        self.pending_typedefs.insert(name.to_string(), (id, target));
    }

    pub fn typedef_failed(&self, name: &str) -> bool {
        self.failed_typedefs.contains(name)
    }

    /// Resolves a queued typedef, following chains through other typedefs.
    ///
    /// Returns the canonical target. A typedef that already failed yields
    /// `INVALID` without reporting again.
    pub fn resolve_typedef(&mut self, name: &str) -> Result<TypeId, Error> {
        if self.failed_typedefs.contains(name) {
            return Ok(TypeId::INVALID);
        }

        let Some((id, target)) = self.pending_typedefs.get(name).cloned() else {
            // Already resolved, or never a typedef
            return Ok(match self.types.lookup_name(name) {
                Some(id) => self.types.canonical(id),
                None => TypeId::INVALID,
            });
        };

        if self.resolving.iter().any(|pending| pending == name) {
            // The whole cycle fails, but only the typedef that closes it is reported
            for pending in &self.resolving {
                self.failed_typedefs.insert(pending.clone());
                self.pending_typedefs.remove(pending);
            }
            return Err(Error::new(
                ErrorImpl::RecursiveTypedef {
                    name: name.to_string(),
                },
                target.get_position().clone(),
            ));
        }

        self.resolving.push(name.to_string());
        let resolved = self.intern_type_expr(&target);
        self.resolving.pop();

        match resolved {
            Ok(resolved) if resolved.is_valid() && !self.failed_typedefs.contains(name) => {
                self.pending_typedefs.remove(name);
                let canonical = self.types.canonical(resolved);
                self.types.define_typedef(id, canonical);
                tracing::trace!(typedef = name, target = %self.types.type_name(canonical), "resolved typedef");
                Ok(canonical)
            }
            Ok(_) => {
                self.pending_typedefs.remove(name);
                self.failed_typedefs.insert(name.to_string());
                Ok(TypeId::INVALID)
            }
            Err(error) => {
                self.pending_typedefs.remove(name);
                self.failed_typedefs.insert(name.to_string());
                Err(error)
            }
        }
    }

    /// Resolves a written type into the table.
    ///
    /// Typedef names resolve to their target. A component that failed
    /// earlier makes the whole type `INVALID` without a second error.
    pub fn intern_type_expr(&mut self, ty: &TypeExpr) -> Result<TypeId, Error> {
        match ty {
            TypeExpr::Symbol(symbol) => {
                if let Some(primitive) = PRIMITIVE_NAMES.get(symbol.name.as_str()) {
                    return Ok(TypeTable::primitive_id(*primitive));
                }

                match self.types.lookup_name(&symbol.name) {
                    Some(id) => match self.types.resolve(id) {
                        Some(TypeDescriptor::Typedef(_)) => self.resolve_typedef(&symbol.name),
                        _ => Ok(id),
                    },
                    None => Err(Error::new(
                        ErrorImpl::UnknownTypeName {
                            type_: symbol.name.clone(),
                        },
                        symbol.position.clone(),
                    )),
                }
            }
            TypeExpr::Array(array) => {
                let element = self.intern_type_expr(&array.underlying)?;
                self.compound(element, "an array element", &array.position, TypeDescriptor::Array)
            }
            TypeExpr::FixedArray(array) => {
                let element = self.intern_type_expr(&array.underlying)?;
                let length = check_array_length(&array.length, &self.consts)?;
                self.compound(element, "an array element", &array.position, |element| {
                    TypeDescriptor::FixedArray(element, length)
                })
            }
            TypeExpr::Pointer(pointer) => {
                let element = self.intern_type_expr(&pointer.underlying)?;
                let kind = pointer.kind;
                self.compound(element, "a pointer element", &pointer.position, |element| {
                    TypeDescriptor::Pointer(element, kind)
                })
            }
            TypeExpr::Reference(reference) => {
                let element = self.intern_type_expr(&reference.underlying)?;
                self.compound(
                    element,
                    "a reference element",
                    &reference.position,
                    TypeDescriptor::Reference,
                )
            }
            TypeExpr::Function(function) => {
                let mut parameters = Vec::with_capacity(function.parameters.len());
                for parameter in &function.parameters {
                    let id = self.intern_type_expr(parameter)?;
                    reject_reference_component(
                        &self.types,
                        id,
                        "a function pointer parameter",
                        parameter.get_position(),
                    )?;
                    parameters.push(id);
                }

                let return_type = match &function.return_type {
                    Some(return_type) => {
                        let id = self.intern_type_expr(return_type)?;
                        reject_reference_component(
                            &self.types,
                            id,
                            "a function pointer return type",
                            return_type.get_position(),
                        )?;
                        Some(id)
                    }
                    None => None,
                };

                Ok(self.function_type(parameters, return_type))
            }
        }
    }

    /// Interns a function pointer type from already resolved parts.
    pub fn function_type(&mut self, parameters: Vec<TypeId>, return_type: Option<TypeId>) -> TypeId {
        if parameters.iter().chain(return_type.iter()).any(|id| !id.is_valid()) {
            return TypeId::INVALID;
        }

        self.types
            .intern(TypeDescriptor::FunctionPointer(parameters, return_type))
    }

    fn compound(
        &mut self,
        element: TypeId,
        context: &str,
        position: &Position,
        build: impl FnOnce(TypeId) -> TypeDescriptor,
    ) -> Result<TypeId, Error> {
        if !element.is_valid() {
            return Ok(TypeId::INVALID);
        }

        reject_reference_component(&self.types, element, context, position)?;
        Ok(self.types.intern(build(element)))
    }
}
