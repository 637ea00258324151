use std::{collections::HashMap, fmt::Display};

/// A folded constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

impl ConstValue {
    /// Integer value widened to `i128`, `None` for floats and strings.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            ConstValue::Int(value) => Some(*value as i128),
            ConstValue::UInt(value) => Some(*value as i128),
            _ => None,
        }
    }
}

impl Display for ConstValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstValue::Int(value) => write!(f, "{}", value),
            ConstValue::UInt(value) => write!(f, "{}", value),
            ConstValue::Float(value) => write!(f, "{}", value),
            ConstValue::Str(value) => write!(f, "{:?}", value),
        }
    }
}

/// Constants visible to the evaluator, in declaration order so far.
///
/// A poisoned entry is a constant that was declared but failed to fold.
#[derive(Debug, Clone, Default)]
pub struct ConstEnv {
    values: HashMap<String, Option<ConstValue>>,
}

impl ConstEnv {
    pub fn new() -> Self {
        ConstEnv {
            values: HashMap::new(),
        }
    }

    pub fn define(&mut self, name: &str, value: ConstValue) {
        self.values.insert(name.to_string(), Some(value));
    }

    pub fn poison(&mut self, name: &str) {
        self.values.insert(name.to_string(), None);
    }

    /// `None` if never declared, `Some(None)` if poisoned.
    pub fn get(&self, name: &str) -> Option<Option<&ConstValue>> {
        self.values.get(name).map(Option::as_ref)
    }
}
