//! Canonical type representation.
//!
//! Every type the checker knows about is a [`TypeDescriptor`] stored in the
//! [`TypeTable`](super::table::TypeTable) and referred to by a copyable
//! [`TypeId`] handle.

use std::fmt::{self, Display};

/// Bit width of a sized integer primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Built in value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int(IntWidth),
    UInt(IntWidth),
    Float,
    Str,
}

impl Primitive {
    pub const INT: Primitive = Primitive::Int(IntWidth::W32);
    pub const UINT: Primitive = Primitive::UInt(IntWidth::W32);

    /// Width in bits used for constant folding. Strings have no width.
    pub fn bits(&self) -> u32 {
        match self {
            Primitive::Int(width) | Primitive::UInt(width) => width.bits(),
            Primitive::Float => 32,
            Primitive::Str => 0,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Primitive::Int(_) | Primitive::UInt(_))
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Primitive::Int(_))
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Int(IntWidth::W32) => write!(f, "int"),
            Primitive::UInt(IntWidth::W32) => write!(f, "uint"),
            Primitive::Int(width) => write!(f, "i{}", width.bits()),
            Primitive::UInt(width) => write!(f, "u{}", width.bits()),
            Primitive::Float => write!(f, "float"),
            Primitive::Str => write!(f, "str"),
        }
    }
}

/// Ownership category of a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Heap allocated through `new` and reference counted.
    Owned,
    /// Handle to foreign data. Never allocated here, never reference counted.
    Extern,
}

impl PointerKind {
    pub fn is_refcounted(self) -> bool {
        self == PointerKind::Owned
    }
}

/// Interned type identifier.
///
/// Primitives are pre-interned at the indices below, everything else is
/// assigned on first use.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const I8: TypeId = TypeId(0);
    pub const I16: TypeId = TypeId(1);
    pub const I32: TypeId = TypeId(2);
    pub const I64: TypeId = TypeId(3);
    pub const U8: TypeId = TypeId(4);
    pub const U16: TypeId = TypeId(5);
    pub const U32: TypeId = TypeId(6);
    pub const U64: TypeId = TypeId(7);
    pub const FLOAT: TypeId = TypeId(8);
    pub const STR: TypeId = TypeId(9);

    pub const INT: TypeId = TypeId::I32;
    pub const UINT: TypeId = TypeId::U32;

    /// First index handed out to non primitive types.
    pub const FIRST_DYNAMIC: u32 = 10;

    /// Stands in for a type that failed to resolve.
    pub const INVALID: TypeId = TypeId(u32::MAX);

    pub(crate) const fn new(index: u32) -> Self {
        TypeId(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_valid(self) -> bool {
        self != TypeId::INVALID
    }

    pub fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructDescriptor {
    pub name: String,
    /// Empty until the second declaration phase fills it in.
    pub fields: Vec<(String, TypeId)>,
    pub resolved: bool,
}

impl StructDescriptor {
    pub fn field(&self, name: &str) -> Option<TypeId> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| *ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedefDescriptor {
    pub name: String,
    /// `None` while the typedef is still a placeholder.
    pub target: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Struct(StructDescriptor),
    Typedef(TypedefDescriptor),
    Array(TypeId),
    FixedArray(TypeId, u32),
    Pointer(TypeId, PointerKind),
    Reference(TypeId),
    FunctionPointer(Vec<TypeId>, Option<TypeId>),
}

impl TypeDescriptor {
    /// Named descriptors have nominal identity and are never deduplicated
    /// structurally.
    pub fn is_named(&self) -> bool {
        matches!(self, TypeDescriptor::Struct(_) | TypeDescriptor::Typedef(_))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Struct(descriptor) => Some(&descriptor.name),
            TypeDescriptor::Typedef(descriptor) => Some(&descriptor.name),
            _ => None,
        }
    }
}
