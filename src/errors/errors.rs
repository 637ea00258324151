use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorKind::UnrecognisedToken,
            ErrorImpl::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            ErrorImpl::UnexpectedTokenDetailed { .. } => ErrorKind::UnexpectedTokenDetailed,
            ErrorImpl::NumberParseError { .. } => ErrorKind::NumberParseError,
            ErrorImpl::NotConstant { .. } => ErrorKind::NotConstantError,
            ErrorImpl::DivisionByZero => ErrorKind::DivisionByZeroError,
            ErrorImpl::ShiftOverflow { .. } => ErrorKind::ShiftOverflowError,
            ErrorImpl::InvalidOperand { .. } => ErrorKind::InvalidOperandError,
            ErrorImpl::UnknownTypeName { .. } => ErrorKind::UnknownTypeNameError,
            ErrorImpl::DuplicateTypeName { .. } => ErrorKind::DuplicateTypeNameError,
            ErrorImpl::RecursiveTypedef { .. } => ErrorKind::RecursiveTypedefError,
            ErrorImpl::ReferenceInAggregate { .. } => ErrorKind::ReferenceInAggregateError,
            ErrorImpl::InvalidArrayLength { .. } => ErrorKind::InvalidArrayLengthError,
            ErrorImpl::DuplicateFieldName { .. } => ErrorKind::DuplicateFieldNameError,
            ErrorImpl::InvalidInitializer { .. } => ErrorKind::InvalidInitializerError,
            ErrorImpl::NotOptional { .. } => ErrorKind::NotOptionalError,
            ErrorImpl::ReferenceEscape { .. } => ErrorKind::ReferenceEscapeError,
            ErrorImpl::VariableNotDeclared { .. } => ErrorKind::VariableNotDeclared,
        }
    }

    pub fn get_error_name(&self) -> &str {
        self.kind().name()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::NotConstant { name, .. } => ErrorTip::Suggestion(format!(
                "`{}` is not a constant declared before this expression",
                name
            )),
            ErrorImpl::DivisionByZero => {
                ErrorTip::Suggestion(String::from("The divisor folds to zero"))
            }
            ErrorImpl::ShiftOverflow { amount, width } => ErrorTip::Suggestion(format!(
                "Shift amount {} must be less than the operand width of {} bits",
                amount, width
            )),
            ErrorImpl::InvalidOperand { operator, type_ } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}` constants",
                operator, type_
            )),
            ErrorImpl::UnknownTypeName { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::DuplicateTypeName { name } => {
                ErrorTip::Suggestion(format!("`{}` is declared more than once", name))
            }
            ErrorImpl::RecursiveTypedef { name } => {
                ErrorTip::Suggestion(format!("Typedef `{}` refers back to itself", name))
            }
            ErrorImpl::ReferenceInAggregate { context } => ErrorTip::Suggestion(format!(
                "References cannot be stored in {}, use a pointer instead",
                context
            )),
            ErrorImpl::InvalidArrayLength { .. } => ErrorTip::Suggestion(String::from(
                "Fixed array lengths must fold to a positive constant",
            )),
            ErrorImpl::DuplicateFieldName { field, .. } => {
                ErrorTip::Suggestion(format!("Field `{}` already declared", field))
            }
            ErrorImpl::InvalidInitializer { .. } => ErrorTip::Suggestion(String::from(
                "Expected a literal, a struct initializer or an array initializer",
            )),
            ErrorImpl::NotOptional { type_ } => ErrorTip::Suggestion(format!(
                "Only pointers can be unwrapped, found `{}`",
                type_
            )),
            ErrorImpl::ReferenceEscape { variable } => ErrorTip::Suggestion(format!(
                "Reference `{}` cannot leave the block it was unwrapped in",
                variable
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// Fieldless mirror of [`ErrorImpl`], used when matching on diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnrecognisedToken,
    UnexpectedToken,
    UnexpectedTokenDetailed,
    NumberParseError,
    NotConstantError,
    DivisionByZeroError,
    ShiftOverflowError,
    InvalidOperandError,
    UnknownTypeNameError,
    DuplicateTypeNameError,
    RecursiveTypedefError,
    ReferenceInAggregateError,
    InvalidArrayLengthError,
    DuplicateFieldNameError,
    InvalidInitializerError,
    NotOptionalError,
    ReferenceEscapeError,
    VariableNotDeclared,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::UnrecognisedToken => "UnrecognisedToken",
            ErrorKind::UnexpectedToken => "UnexpectedToken",
            ErrorKind::UnexpectedTokenDetailed => "UnexpectedTokenDetailed",
            ErrorKind::NumberParseError => "NumberParseError",
            ErrorKind::NotConstantError => "NotConstantError",
            ErrorKind::DivisionByZeroError => "DivisionByZeroError",
            ErrorKind::ShiftOverflowError => "ShiftOverflowError",
            ErrorKind::InvalidOperandError => "InvalidOperandError",
            ErrorKind::UnknownTypeNameError => "UnknownTypeNameError",
            ErrorKind::DuplicateTypeNameError => "DuplicateTypeNameError",
            ErrorKind::RecursiveTypedefError => "RecursiveTypedefError",
            ErrorKind::ReferenceInAggregateError => "ReferenceInAggregateError",
            ErrorKind::InvalidArrayLengthError => "InvalidArrayLengthError",
            ErrorKind::DuplicateFieldNameError => "DuplicateFieldNameError",
            ErrorKind::InvalidInitializerError => "InvalidInitializerError",
            ErrorKind::NotOptionalError => "NotOptionalError",
            ErrorKind::ReferenceEscapeError => "ReferenceEscapeError",
            ErrorKind::VariableNotDeclared => "VariableNotDeclared",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Front end
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Constant folding
    #[error("{name:?} is not a constant: {reason}")]
    NotConstant { name: String, reason: String },
    #[error("division by constant zero")]
    DivisionByZero,
    #[error("shift amount {amount} is not less than the operand width {width}")]
    ShiftOverflow { amount: i128, width: u32 },
    #[error("operator {operator:?} is not valid for {type_} operands")]
    InvalidOperand { operator: String, type_: String },

    // Type table
    #[error("unknown type {type_} found")]
    UnknownTypeName { type_: String },
    #[error("top level name {name:?} declared more than once")]
    DuplicateTypeName { name: String },
    #[error("typedef {name:?} is recursive")]
    RecursiveTypedef { name: String },

    // Placement
    #[error("reference type found in {context}")]
    ReferenceInAggregate { context: String },
    #[error("invalid fixed array length: {reason}")]
    InvalidArrayLength { reason: String },
    #[error("field {field:?} declared more than once in struct {struct_name:?}")]
    DuplicateFieldName { struct_name: String, field: String },

    // Pointer lifecycle
    #[error("invalid initializer: {reason}")]
    InvalidInitializer { reason: String },
    #[error("cannot unwrap a value of non-pointer type {type_}")]
    NotOptional { type_: String },
    #[error("reference {variable:?} escapes the scope it was unwrapped in")]
    ReferenceEscape { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
}
