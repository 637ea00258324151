use std::collections::HashMap;

use super::types::{
    IntWidth, PointerKind, Primitive, StructDescriptor, TypeDescriptor, TypeId, TypedefDescriptor,
};

/// Canonical registry of every type seen by one compilation session.
///
/// Structural descriptors are deduplicated so identical type expressions
/// share one [`TypeId`]. Structs and typedefs are registered by name and
/// keep their identity.
#[derive(Debug, Clone)]
pub struct TypeTable {
    descriptors: Vec<TypeDescriptor>,
    lookup: HashMap<TypeDescriptor, TypeId>,
    names: HashMap<String, TypeId>,
}

const PRIMITIVES: [Primitive; 10] = [
    Primitive::Int(IntWidth::W8),
    Primitive::Int(IntWidth::W16),
    Primitive::Int(IntWidth::W32),
    Primitive::Int(IntWidth::W64),
    Primitive::UInt(IntWidth::W8),
    Primitive::UInt(IntWidth::W16),
    Primitive::UInt(IntWidth::W32),
    Primitive::UInt(IntWidth::W64),
    Primitive::Float,
    Primitive::Str,
];

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = TypeTable {
            descriptors: vec![],
            lookup: HashMap::new(),
            names: HashMap::new(),
        };

        for primitive in PRIMITIVES {
            table.intern(TypeDescriptor::Primitive(primitive));
        }
        debug_assert_eq!(table.descriptors.len() as u32, TypeId::FIRST_DYNAMIC);

        table
    }

    pub fn primitive_id(primitive: Primitive) -> TypeId {
        let index = PRIMITIVES
            .iter()
            .position(|candidate| *candidate == primitive)
            .unwrap_or_default();
        TypeId::new(index as u32)
    }

    fn push(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let id = TypeId::new(self.descriptors.len() as u32);
        self.descriptors.push(descriptor);
        id
    }

    /// Interns a descriptor, returning the existing id when an identical one
    /// is already present.
    ///
    /// Named descriptors are keyed by their name.
    pub fn intern(&mut self, descriptor: TypeDescriptor) -> TypeId {
        if let Some(name) = descriptor.name() {
            if let Some(id) = self.names.get(name) {
                return *id;
            }
            let name = name.to_string();
            let id = self.push(descriptor);
            self.names.insert(name, id);
            return id;
        }

        if let Some(id) = self.lookup.get(&descriptor) {
            return *id;
        }

        let id = self.push(descriptor.clone());
        tracing::trace!(?id, ?descriptor, "interned type");
        self.lookup.insert(descriptor, id);
        id
    }

    /// Registers a struct placeholder. Returns `None` if the name is taken.
    pub fn declare_struct(&mut self, name: &str) -> Option<TypeId> {
        if self.names.contains_key(name) {
            return None;
        }

        Some(self.intern(TypeDescriptor::Struct(StructDescriptor {
            name: name.to_string(),
            fields: vec![],
            resolved: false,
        })))
    }

    /// Registers a typedef placeholder. Returns `None` if the name is taken.
    pub fn declare_typedef(&mut self, name: &str) -> Option<TypeId> {
        if self.names.contains_key(name) {
            return None;
        }

        Some(self.intern(TypeDescriptor::Typedef(TypedefDescriptor {
            name: name.to_string(),
            target: None,
        })))
    }

    pub fn define_struct(&mut self, id: TypeId, fields: Vec<(String, TypeId)>) {
        if let Some(TypeDescriptor::Struct(descriptor)) = self.descriptors.get_mut(id.index()) {
            descriptor.fields = fields;
            descriptor.resolved = true;
        }
    }

    pub fn define_typedef(&mut self, id: TypeId, target: TypeId) {
        if let Some(TypeDescriptor::Typedef(descriptor)) = self.descriptors.get_mut(id.index()) {
            descriptor.target = Some(target);
        }
    }

    pub fn lookup_name(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    pub fn resolve(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.descriptors.get(id.index())
    }

    /// Follows typedef aliases down to the type they name.
    ///
    /// An unresolved typedef canonicalises to itself.
    pub fn canonical(&self, id: TypeId) -> TypeId {
        let mut current = id;
        // A chain can never be longer than the table
        for _ in 0..=self.descriptors.len() {
            match self.resolve(current) {
                Some(TypeDescriptor::Typedef(TypedefDescriptor {
                    target: Some(target),
                    ..
                })) => current = *target,
                _ => return current,
            }
        }
        current
    }

    pub fn canonical_descriptor(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.resolve(self.canonical(id))
    }

    pub fn is_reference(&self, id: TypeId) -> bool {
        matches!(self.canonical_descriptor(id), Some(TypeDescriptor::Reference(_)))
    }

    pub fn primitive(&self, id: TypeId) -> Option<Primitive> {
        match self.canonical_descriptor(id) {
            Some(TypeDescriptor::Primitive(primitive)) => Some(*primitive),
            _ => None,
        }
    }

    pub fn pointer(&self, id: TypeId) -> Option<(TypeId, PointerKind)> {
        match self.canonical_descriptor(id) {
            Some(TypeDescriptor::Pointer(element, kind)) => Some((*element, *kind)),
            _ => None,
        }
    }

    pub fn struct_descriptor(&self, id: TypeId) -> Option<&StructDescriptor> {
        match self.canonical_descriptor(id) {
            Some(TypeDescriptor::Struct(descriptor)) => Some(descriptor),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| (TypeId::new(index as u32), descriptor))
    }

    /// Human readable spelling of a type, in surface syntax.
    pub fn type_name(&self, id: TypeId) -> String {
        match self.resolve(id) {
            None => String::from("<invalid>"),
            Some(TypeDescriptor::Primitive(primitive)) => primitive.to_string(),
            Some(TypeDescriptor::Struct(descriptor)) => descriptor.name.clone(),
            Some(TypeDescriptor::Typedef(descriptor)) => descriptor.name.clone(),
            Some(TypeDescriptor::Array(element)) => format!("[{}]", self.type_name(*element)),
            Some(TypeDescriptor::FixedArray(element, length)) => {
                format!("[{}; {}]", self.type_name(*element), length)
            }
            Some(TypeDescriptor::Pointer(element, PointerKind::Owned)) => {
                format!("*{}", self.type_name(*element))
            }
            Some(TypeDescriptor::Pointer(element, PointerKind::Extern)) => {
                format!("extern *{}", self.type_name(*element))
            }
            Some(TypeDescriptor::Reference(element)) => format!("&{}", self.type_name(*element)),
            Some(TypeDescriptor::FunctionPointer(parameters, return_type)) => {
                let parameters = parameters
                    .iter()
                    .map(|parameter| self.type_name(*parameter))
                    .collect::<Vec<String>>()
                    .join(", ");
                match return_type {
                    Some(return_type) => {
                        format!("fn({}) -> {}", parameters, self.type_name(*return_type))
                    }
                    None => format!("fn({})", parameters),
                }
            }
        }
    }

    /// Copies every type of `other` into this table.
    ///
    /// Returns the id remapping, indexed by `other`'s ids. A name already
    /// present here keeps its existing definition.
    pub fn absorb(&mut self, other: &TypeTable) -> Vec<TypeId> {
        let mut remap = vec![TypeId::INVALID; other.len()];
        let mut fresh = vec![];

        // Named placeholders first, struct fields can point anywhere
        for (id, descriptor) in other.iter() {
            match descriptor {
                TypeDescriptor::Primitive(_) => {
                    remap[id.index()] = self.intern(descriptor.clone());
                }
                TypeDescriptor::Struct(StructDescriptor { name, .. }) => {
                    remap[id.index()] = match self.declare_struct(name) {
                        Some(new_id) => {
                            fresh.push(id);
                            new_id
                        }
                        None => self.names[name],
                    };
                }
                TypeDescriptor::Typedef(TypedefDescriptor { name, .. }) => {
                    remap[id.index()] = match self.declare_typedef(name) {
                        Some(new_id) => {
                            fresh.push(id);
                            new_id
                        }
                        None => self.names[name],
                    };
                }
                _ => {}
            }
        }

        let map = |remap: &Vec<TypeId>, id: TypeId| -> TypeId {
            remap.get(id.index()).copied().unwrap_or(TypeId::INVALID)
        };

        // Structural children are always interned before their parents
        for (id, descriptor) in other.iter() {
            let mapped = match descriptor {
                TypeDescriptor::Array(element) => TypeDescriptor::Array(map(&remap, *element)),
                TypeDescriptor::FixedArray(element, length) => {
                    TypeDescriptor::FixedArray(map(&remap, *element), *length)
                }
                TypeDescriptor::Pointer(element, kind) => {
                    TypeDescriptor::Pointer(map(&remap, *element), *kind)
                }
                TypeDescriptor::Reference(element) => {
                    TypeDescriptor::Reference(map(&remap, *element))
                }
                TypeDescriptor::FunctionPointer(parameters, return_type) => {
                    TypeDescriptor::FunctionPointer(
                        parameters.iter().map(|parameter| map(&remap, *parameter)).collect(),
                        return_type.map(|return_type| map(&remap, return_type)),
                    )
                }
                _ => continue,
            };
            remap[id.index()] = self.intern(mapped);
        }

        for id in fresh {
            match other.resolve(id) {
                Some(TypeDescriptor::Struct(descriptor)) if descriptor.resolved => {
                    let fields = descriptor
                        .fields
                        .iter()
                        .map(|(name, ty)| (name.clone(), map(&remap, *ty)))
                        .collect();
                    self.define_struct(remap[id.index()], fields);
                }
                Some(TypeDescriptor::Typedef(TypedefDescriptor {
                    target: Some(target),
                    ..
                })) => {
                    self.define_typedef(remap[id.index()], map(&remap, *target));
                }
                _ => {}
            }
        }

        remap
    }
}
