use std::collections::{HashMap, HashSet};

use crate::{
    ast::{
        ast::{Expr, Stmt},
        declarations::FnDecl,
        expressions::{ArrayInitExpr, NewExpr, NumberLiteral, StructInitExpr, UnwrapExpr},
        statements::{BlockStmt, IfLetStmt, VarDeclStmt},
    },
    checker::session::Session,
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    types::types::{PointerKind, Primitive, TypeDescriptor, TypeId},
    Position,
};

/// A block in which a pointer is narrowed to a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct UnwrapScope {
    pub position: Position,
    pub element_type: TypeId,
    /// False for extern pointers, which the runtime never counts.
    pub refcount_applicable: bool,
    /// Id of the block the reference is confined to.
    pub scope: i32,
    /// State of the narrowed binding right before the unwrap. Values that
    /// are not local bindings count as allocated.
    pub pointer_state: PointerState,
}

/// A `new` expression and the type it allocates.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSite {
    pub position: Position,
    pub pointee: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerState {
    Uninitialized,
    Allocated(PointerKind),
    /// Narrowed to a reference until the block with this id ends.
    Unwrapped(i32),
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub ty: TypeId,
    /// Only tracked for pointer bindings.
    pub state: Option<PointerState>,
    /// For reference values, depth of the environment they are confined to.
    pub origin: Option<usize>,
    /// States suspended by unwraps still in scope, innermost last.
    pub suspended: Vec<PointerState>,
}

impl Binding {
    fn new(ty: TypeId, state: Option<PointerState>, origin: Option<usize>) -> Self {
        Binding {
            ty,
            state,
            origin,
            suspended: vec![],
        }
    }
}

#[derive(Debug)]
pub struct Environment {
    pub id: i32,
    variable_lookup: HashMap<String, Binding>,
}

impl Environment {
    pub fn new(id: i32) -> Self {
        Environment {
            id,
            variable_lookup: HashMap::new(),
        }
    }

    /// Redeclaring a name in the same block shadows the earlier binding.
    pub fn declare_variable(&mut self, variable_name: String, binding: Binding) {
        self.variable_lookup.insert(variable_name, binding);
    }

    pub fn get_variable(&self, variable_name: &str) -> Option<&Binding> {
        self.variable_lookup.get(variable_name)
    }
}

/// Best effort type of an expression.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Value {
    ty: TypeId,
    origin: Option<usize>,
    /// Result of calling a function without a return type.
    void: bool,
}

impl Value {
    fn of(ty: TypeId) -> Self {
        Value {
            ty,
            origin: None,
            void: false,
        }
    }

    fn reference(ty: TypeId, origin: Option<usize>) -> Self {
        Value {
            ty,
            origin,
            void: false,
        }
    }

    fn unknown() -> Self {
        Value::of(TypeId::INVALID)
    }

    fn void() -> Self {
        Value {
            ty: TypeId::INVALID,
            origin: None,
            void: true,
        }
    }

    fn is_reference(&self) -> bool {
        self.origin.is_some()
    }
}

/// Everything the lifecycle pass found in one function body.
#[derive(Debug, Default)]
pub struct LifecycleReport {
    pub diagnostics: Diagnostics,
    pub unwrap_scopes: Vec<UnwrapScope>,
    pub allocations: Vec<AllocationSite>,
}

pub struct LifecycleChecker<'a> {
    session: &'a mut Session,
    environments: Vec<Environment>,
    return_type: Option<TypeId>,
    report: LifecycleReport,
}

impl<'a> LifecycleChecker<'a> {
    pub fn new(session: &'a mut Session, return_type: Option<TypeId>) -> Self {
        LifecycleChecker {
            session,
            environments: vec![],
            return_type,
            report: LifecycleReport::default(),
        }
    }

    fn depth(&self) -> usize {
        self.environments.len().saturating_sub(1)
    }

    fn scope_id(&self) -> i32 {
        self.environments.last().map(|environment| environment.id).unwrap_or_default()
    }

    /// Innermost binding of `name` and the depth it was declared at.
    fn fetch_variable(&self, name: &str) -> Option<(usize, &Binding)> {
        self.environments
            .iter()
            .enumerate()
            .rev()
            .find_map(|(depth, environment)| {
                environment.get_variable(name).map(|binding| (depth, binding))
            })
    }

    fn fetch_variable_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.environments
            .iter_mut()
            .rev()
            .find_map(|environment| environment.variable_lookup.get_mut(name))
    }

    fn declare(&mut self, name: &str, binding: Binding) {
        if let Some(environment) = self.environments.last_mut() {
            environment.declare_variable(name.to_string(), binding);
        }
    }

    fn error(&mut self, error: ErrorImpl, position: &Position) {
        self.report.diagnostics.push(Error::new(error, position.clone()));
    }

    fn invalid_initializer(&mut self, reason: String, position: &Position) {
        self.error(ErrorImpl::InvalidInitializer { reason }, position);
    }

    fn intern(&mut self, descriptor: TypeDescriptor) -> TypeId {
        self.session.types_mut().intern(descriptor)
    }

    fn descriptor(&self, ty: TypeId) -> Option<TypeDescriptor> {
        if !ty.is_valid() {
            return None;
        }
        self.session.types().canonical_descriptor(ty).cloned()
    }

    fn type_name(&self, ty: TypeId) -> String {
        self.session.types().type_name(ty)
    }

    fn pointer_state(&self, ty: TypeId, initialized: bool) -> Option<PointerState> {
        let (_, kind) = self.session.types().pointer(ty)?;
        Some(if initialized {
            PointerState::Allocated(kind)
        } else {
            PointerState::Uninitialized
        })
    }

    fn pointer_binding_mut(&mut self, expr: &Expr) -> Option<&mut Binding> {
        match expr {
            Expr::Symbol(symbol) => self
                .fetch_variable_mut(&symbol.value)
                .filter(|binding| binding.state.is_some()),
            _ => None,
        }
    }

    /// An assignment replaces the pointer, so earlier unwraps no longer
    /// apply to it.
    fn assign_state(&mut self, expr: &Expr, state: PointerState) {
        if let Some(binding) = self.pointer_binding_mut(expr) {
            binding.suspended.clear();
            binding.state = Some(state);
        }
    }

    /// Narrows `expr` until the block `scope` ends. Returns the state it had.
    fn unwrap_state(&mut self, expr: &Expr, kind: PointerKind, scope: i32) -> PointerState {
        let Some(binding) = self.pointer_binding_mut(expr) else {
            return PointerState::Allocated(kind);
        };

        let previous = binding.state.unwrap_or(PointerState::Allocated(kind));
        binding.suspended.push(previous);
        binding.state = Some(PointerState::Unwrapped(scope));
        tracing::trace!(?previous, scope, "pointer unwrapped");
        previous
    }
}

/// Runs the pointer lifecycle rules over a function body.
#[tracing::instrument(level = "debug", skip_all, fields(function = %decl.name))]
pub fn check_function(
    session: &mut Session,
    decl: &FnDecl,
    parameters: &[(String, TypeId)],
    return_type: Option<TypeId>,
) -> LifecycleReport {
    let mut checker = LifecycleChecker::new(session, return_type);

    let bindings = parameters
        .iter()
        .map(|(name, ty)| {
            let binding = Binding::new(*ty, checker.pointer_state(*ty, true), None);
            (name.clone(), binding)
        })
        .collect();

    check_block(&mut checker, &decl.body, bindings);

    tracing::debug!(
        errors = checker.report.diagnostics.len(),
        unwraps = checker.report.unwrap_scopes.len(),
        allocations = checker.report.allocations.len(),
        "checked function body"
    );

    checker.report
}

pub fn check_block(
    checker: &mut LifecycleChecker,
    block: &BlockStmt,
    bindings: Vec<(String, Binding)>,
) {
    checker.environments.push(Environment::new(block.id));
    for (name, binding) in bindings {
        checker.declare(&name, binding);
    }

    for stmt in block.iter() {
        check_stmt(checker, stmt);
    }

    checker.environments.pop();

    // Pointers narrowed inside the block get back the state they had before
    let types = checker.session.types();
    for environment in checker.environments.iter_mut() {
        for binding in environment.variable_lookup.values_mut() {
            while binding.state == Some(PointerState::Unwrapped(block.id)) {
                binding.state = binding.suspended.pop().or_else(|| {
                    types
                        .pointer(binding.ty)
                        .map(|(_, kind)| PointerState::Allocated(kind))
                });
            }
        }
    }
}

pub fn check_stmt(checker: &mut LifecycleChecker, stmt: &Stmt) {
    match stmt {
        Stmt::Expression(stmt) => {
            check_expr(checker, &stmt.expression, None);
        }
        Stmt::Block(block) => check_block(checker, block, vec![]),
        Stmt::VarDecl(stmt) => check_var_decl(checker, stmt),
        Stmt::If(stmt) => {
            check_expr(checker, &stmt.condition, None);
            check_block(checker, &stmt.then_body, vec![]);
            if let Some(else_body) = &stmt.else_body {
                check_stmt(checker, else_body);
            }
        }
        Stmt::IfLet(stmt) => check_if_let(checker, stmt),
        Stmt::Return(stmt) => {
            let Some(value) = &stmt.value else {
                return;
            };

            let expected = checker.return_type;
            let result = check_expr(checker, value, expected);
            if result.is_reference() {
                checker.error(
                    ErrorImpl::ReferenceEscape {
                        variable: describe(value),
                    },
                    value.get_position(),
                );
            }
        }
    }
}

fn check_var_decl(checker: &mut LifecycleChecker, stmt: &VarDeclStmt) {
    let explicit = match &stmt.explicit_type {
        Some(explicit_type) => {
            let result = checker.session.intern_type_expr(explicit_type);
            checker.report.diagnostics.take(result)
        }
        None => None,
    }
    .filter(|ty| ty.is_valid());

    let value = stmt
        .assigned_value
        .as_ref()
        .map(|assigned| check_expr(checker, assigned, explicit));

    let declared_reference = explicit.is_some_and(|ty| checker.session.types().is_reference(ty));
    if declared_reference && !value.is_some_and(|value| value.is_reference()) {
        checker.invalid_initializer(
            format!(
                "`{}` is a reference and can only be bound by unwrapping a pointer",
                stmt.identifier
            ),
            &stmt.span.start,
        );
    }

    let ty = explicit
        .or_else(|| value.map(|value| value.ty))
        .unwrap_or(TypeId::INVALID);
    let origin = match explicit {
        Some(_) if !declared_reference => None,
        _ => value.and_then(|value| value.origin),
    };

    let binding = Binding::new(ty, checker.pointer_state(ty, value.is_some()), origin);
    checker.declare(&stmt.identifier, binding);
}

fn check_if_let(checker: &mut LifecycleChecker, stmt: &IfLetStmt) {
    let value = check_expr(checker, &stmt.value, None);
    let inner_depth = checker.depth() + 1;

    let element = match narrow(checker, value, &stmt.value) {
        Some((element, kind)) => {
            let scope = stmt.then_body.id;
            let record = UnwrapScope {
                position: stmt.span.start.clone(),
                element_type: element,
                refcount_applicable: kind.is_refcounted(),
                scope,
                pointer_state: checker.unwrap_state(&stmt.value, kind, scope),
            };
            tracing::trace!(binding = %stmt.binding, ?record, "if let unwrap");
            checker.report.unwrap_scopes.push(record);
            checker.intern(TypeDescriptor::Reference(element))
        }
        None => TypeId::INVALID,
    };

    let binding = Binding::new(element, None, Some(inner_depth));
    check_block(checker, &stmt.then_body, vec![(stmt.binding.clone(), binding)]);

    if let Some(else_body) = &stmt.else_body {
        check_stmt(checker, else_body);
    }
}

/// Element type and kind of an unwrappable value. Reports anything that is
/// not a pointer, including calls that produce no value.
fn narrow(
    checker: &mut LifecycleChecker,
    value: Value,
    expr: &Expr,
) -> Option<(TypeId, PointerKind)> {
    if value.void {
        checker.error(
            ErrorImpl::NotOptional {
                type_: String::from("no value"),
            },
            expr.get_position(),
        );
        return None;
    }

    if !value.ty.is_valid() {
        return None;
    }

    match checker.session.types().pointer(value.ty) {
        Some(pointer) => Some(pointer),
        None => {
            let type_ = checker.type_name(value.ty);
            checker.error(ErrorImpl::NotOptional { type_ }, expr.get_position());
            None
        }
    }
}

fn check_expr(checker: &mut LifecycleChecker, expr: &Expr, expected: Option<TypeId>) -> Value {
    match expr {
        Expr::Number(number) => Value::of(match number.value {
            NumberLiteral::Int(_) => TypeId::INT,
            NumberLiteral::Float(_) => TypeId::FLOAT,
        }),
        Expr::String(_) => Value::of(TypeId::STR),
        Expr::Symbol(symbol) => {
            if let Some((_, binding)) = checker.fetch_variable(&symbol.value) {
                return Value::reference(binding.ty, binding.origin);
            }

            if let Some(ty) = checker.session.global(&symbol.value) {
                return Value::of(ty);
            }

            checker.error(
                ErrorImpl::VariableNotDeclared {
                    variable: symbol.value.clone(),
                },
                &symbol.span.start,
            );
            Value::unknown()
        }
        Expr::Binary(binary) => {
            let left = check_expr(checker, &binary.left, None);
            check_expr(checker, &binary.right, None);

            if binary.operator.is_comparison() {
                Value::of(TypeId::INT)
            } else {
                Value::of(left.ty)
            }
        }
        Expr::Prefix(prefix) => Value::of(check_expr(checker, &prefix.right_expr, None).ty),
        Expr::Assignment(assignment) => {
            let target = check_expr(checker, &assignment.assignee, None);
            let expected = Some(target.ty).filter(|ty| ty.is_valid());
            let value = check_expr(checker, &assignment.value, expected);

            if let Some(origin) = value.origin {
                let escapes = match &*assignment.assignee {
                    Expr::Symbol(symbol) => checker
                        .fetch_variable(&symbol.value)
                        .map_or(true, |(depth, _)| depth < origin),
                    // Fields and elements outlive the block
                    _ => true,
                };

                if escapes {
                    checker.error(
                        ErrorImpl::ReferenceEscape {
                            variable: describe(&assignment.value),
                        },
                        assignment.value.get_position(),
                    );
                }
            }

            if let Some(state) = checker.pointer_state(target.ty, true) {
                checker.assign_state(&assignment.assignee, state);
            }

            value
        }
        Expr::Call(call) => {
            let callee = check_expr(checker, &call.callee, None);
            let signature = match checker.descriptor(callee.ty) {
                Some(TypeDescriptor::FunctionPointer(parameters, return_type)) => {
                    Some((parameters, return_type))
                }
                _ => None,
            };
            let parameters = signature.as_ref().map_or(&[][..], |(parameters, _)| parameters.as_slice());

            for (index, argument) in call.arguments.iter().enumerate() {
                check_expr(checker, argument, parameters.get(index).copied());
            }

            match signature {
                Some((_, Some(return_type))) => Value::of(return_type),
                Some((_, None)) => Value::void(),
                None => Value::unknown(),
            }
        }
        Expr::Member(member) => {
            let object = check_expr(checker, &member.object, None);

            let owner = match checker.descriptor(object.ty) {
                Some(TypeDescriptor::Reference(element)) => element,
                _ => object.ty,
            };
            let field = checker
                .session
                .types()
                .struct_descriptor(owner)
                .and_then(|descriptor| descriptor.field(&member.property));

            Value::of(field.unwrap_or(TypeId::INVALID))
        }
        Expr::StructInit(init) => check_struct_init(checker, init),
        Expr::ArrayInit(init) => check_array_init(checker, init, expected),
        Expr::New(new) => check_new(checker, new, expected),
        Expr::Unwrap(unwrap) => check_unwrap(checker, unwrap),
    }
}

fn check_struct_init(checker: &mut LifecycleChecker, init: &StructInitExpr) -> Value {
    let position = &init.span.start;

    let struct_id = match checker.session.types().lookup_name(&init.name) {
        Some(id) => checker.session.types().canonical(id),
        None => {
            checker.error(
                ErrorImpl::UnknownTypeName {
                    type_: init.name.clone(),
                },
                position,
            );
            TypeId::INVALID
        }
    };

    let layout = checker
        .session
        .types()
        .struct_descriptor(struct_id)
        .filter(|descriptor| descriptor.resolved)
        .map(|descriptor| descriptor.fields.clone());

    if struct_id.is_valid() && checker.session.types().struct_descriptor(struct_id).is_none() {
        checker.invalid_initializer(format!("`{}` is not a struct", init.name), position);
    }

    let mut supplied = HashSet::new();
    for (name, value) in &init.fields {
        let expected = layout.as_ref().and_then(|fields| {
            fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, ty)| *ty)
        });

        if check_expr(checker, value, expected).is_reference() {
            checker.error(
                ErrorImpl::ReferenceInAggregate {
                    context: format!("field `{}` of a `{}` initializer", name, init.name),
                },
                value.get_position(),
            );
        }

        if !supplied.insert(name.as_str()) {
            checker.invalid_initializer(
                format!("field `{}` given more than once", name),
                value.get_position(),
            );
        } else if layout
            .as_ref()
            .is_some_and(|fields| fields.iter().all(|(field, _)| field != name))
            && !checker.session.field_rejected(struct_id, name)
        {
            checker.invalid_initializer(
                format!("`{}` has no field `{}`", init.name, name),
                value.get_position(),
            );
        }
    }

    if let Some(fields) = &layout {
        let missing: Vec<&str> = fields
            .iter()
            .map(|(field, _)| field.as_str())
            .filter(|field| !supplied.contains(field))
            .collect();

        if !missing.is_empty() {
            checker.invalid_initializer(
                format!("missing fields {} for `{}`", missing.join(", "), init.name),
                position,
            );
        }
    }

    Value::of(if layout.is_some() {
        struct_id
    } else {
        TypeId::INVALID
    })
}

fn check_array_init(
    checker: &mut LifecycleChecker,
    init: &ArrayInitExpr,
    expected: Option<TypeId>,
) -> Value {
    let expected = expected.filter(|ty| ty.is_valid());
    let (element, capacity) = match expected.and_then(|ty| checker.descriptor(ty)) {
        Some(TypeDescriptor::Array(element)) => (Some(element), None),
        Some(TypeDescriptor::FixedArray(element, length)) => (Some(element), Some(length)),
        _ => (None, None),
    };

    if let Some(capacity) = capacity {
        if init.elements.len() > capacity as usize {
            let name = checker.type_name(expected.unwrap_or(TypeId::INVALID));
            checker.invalid_initializer(
                format!("{} elements do not fit in `{}`", init.elements.len(), name),
                &init.span.start,
            );
        }
    }

    let mut first = None;
    for value in &init.elements {
        let result = check_expr(checker, value, element);
        if result.is_reference() {
            checker.error(
                ErrorImpl::ReferenceInAggregate {
                    context: String::from("an array initializer"),
                },
                value.get_position(),
            );
        } else if first.is_none() {
            first = Some(result.ty);
        }
    }

    match (element, first) {
        (Some(_), _) => Value::of(expected.unwrap_or(TypeId::INVALID)),
        (None, Some(ty)) if ty.is_valid() => Value::of(checker.intern(TypeDescriptor::Array(ty))),
        _ => Value::unknown(),
    }
}

/// Type of a literal initializer.
fn literal_type(expr: &Expr) -> Option<TypeId> {
    match expr {
        Expr::Number(number) => Some(match number.value {
            NumberLiteral::Int(_) => TypeId::INT,
            NumberLiteral::Float(_) => TypeId::FLOAT,
        }),
        Expr::String(_) => Some(TypeId::STR),
        Expr::Prefix(prefix) => literal_type(&prefix.right_expr),
        _ => None,
    }
}

fn check_new(checker: &mut LifecycleChecker, new: &NewExpr, expected: Option<TypeId>) -> Value {
    let position = &new.span.start;
    let init = &*new.init;
    let errors = checker.report.diagnostics.len();

    // The pointee comes from context when there is one
    let mut pointee = None;
    if let Some(expected) = expected.filter(|ty| ty.is_valid()) {
        let name = checker.type_name(expected);
        match checker.descriptor(expected) {
            Some(TypeDescriptor::Pointer(element, PointerKind::Owned)) => pointee = Some(element),
            Some(TypeDescriptor::Pointer(_, PointerKind::Extern)) => {
                checker.invalid_initializer(
                    format!("`new` cannot produce `{}`, extern pointers are never allocated", name),
                    position,
                );
            }
            _ => {
                checker.invalid_initializer(
                    format!("`new` produces a pointer, `{}` expected", name),
                    position,
                );
            }
        }
    }

    if !init.is_initializer() {
        checker.invalid_initializer(
            String::from("`new` takes a literal, a struct initializer or an array initializer"),
            init.get_position(),
        );
        check_expr(checker, init, None);
        return Value::unknown();
    }

    let pointee = match init {
        Expr::StructInit(_) => {
            let value = check_expr(checker, init, None);
            match pointee {
                Some(pointee)
                    if value.ty.is_valid()
                        && checker.session.types().canonical(pointee) != value.ty =>
                {
                    let reason = format!(
                        "`{}` initializer for a `{}` allocation",
                        checker.type_name(value.ty),
                        checker.type_name(pointee)
                    );
                    checker.invalid_initializer(reason, init.get_position());
                    None
                }
                Some(pointee) => Some(pointee),
                None => Some(value.ty),
            }
        }
        Expr::ArrayInit(_) => match pointee {
            Some(pointee) => {
                if matches!(
                    checker.descriptor(pointee),
                    Some(TypeDescriptor::Array(_) | TypeDescriptor::FixedArray(..))
                ) {
                    check_expr(checker, init, Some(pointee));
                    Some(pointee)
                } else {
                    let reason =
                        format!("array initializer for a `{}` allocation", checker.type_name(pointee));
                    checker.invalid_initializer(reason, init.get_position());
                    check_expr(checker, init, None);
                    None
                }
            }
            None => Some(check_expr(checker, init, None).ty),
        },
        _ => {
            let literal = literal_type(init).unwrap_or(TypeId::INVALID);
            match pointee {
                Some(pointee) if !literal_matches(checker, literal, pointee) => {
                    let reason = format!(
                        "`{}` literal for a `{}` allocation",
                        checker.type_name(literal),
                        checker.type_name(pointee)
                    );
                    checker.invalid_initializer(reason, init.get_position());
                    None
                }
                Some(pointee) => Some(pointee),
                None => Some(literal),
            }
        }
    };

    // Only a `new` that checked cleanly is an allocation site
    if checker.report.diagnostics.len() > errors {
        return Value::unknown();
    }

    let Some(pointee) = pointee.filter(|ty| ty.is_valid()) else {
        checker.invalid_initializer(
            String::from("can't tell what type `new` allocates here"),
            position,
        );
        return Value::unknown();
    };

    let site = AllocationSite {
        position: position.clone(),
        pointee,
    };
    tracing::trace!(pointee = %checker.type_name(pointee), "allocation site");
    checker.report.allocations.push(site);

    Value::of(checker.intern(TypeDescriptor::Pointer(pointee, PointerKind::Owned)))
}

/// Integer literals fit any numeric primitive, floats only `float` and
/// strings only `str`.
fn literal_matches(checker: &LifecycleChecker, literal: TypeId, pointee: TypeId) -> bool {
    let Some(primitive) = checker.session.types().primitive(pointee) else {
        return false;
    };

    match literal {
        TypeId::INT => primitive.is_integer() || primitive == Primitive::Float,
        TypeId::FLOAT => primitive == Primitive::Float,
        TypeId::STR => primitive == Primitive::Str,
        _ => false,
    }
}

fn check_unwrap(checker: &mut LifecycleChecker, unwrap: &UnwrapExpr) -> Value {
    let value = check_expr(checker, &unwrap.value, None);
    let origin = Some(checker.depth());

    let Some((element, kind)) = narrow(checker, value, &unwrap.value) else {
        return Value::reference(TypeId::INVALID, origin);
    };

    let scope = checker.scope_id();
    let record = UnwrapScope {
        position: unwrap.span.start.clone(),
        element_type: element,
        refcount_applicable: kind.is_refcounted(),
        scope,
        pointer_state: checker.unwrap_state(&unwrap.value, kind, scope),
    };
    tracing::trace!(?record, "unwrap");
    checker.report.unwrap_scopes.push(record);

    Value::reference(checker.intern(TypeDescriptor::Reference(element)), origin)
}

/// Short name for the value a diagnostic is about.
fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Symbol(symbol) => symbol.value.clone(),
        Expr::Member(member) => member.property.clone(),
        Expr::Unwrap(unwrap) => format!("unwrap {}", describe(&unwrap.value)),
        Expr::Assignment(assignment) => describe(&assignment.value),
        _ => String::from("expression"),
    }
}
