// Strongly-typed schema model for class generation. No serde_json::Value here.
use indexmap::IndexMap;

/// Attributes shared by every type variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Meta {
    pub name: String,
    pub required: bool,
    pub nullable: bool,
    /// Custom namespace segment from the `namespace` / `ns` keyword.
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Object(ObjectType),
    Array(ArrayType),
    String(StringType),
    Integer(ScalarType),
    Number(ScalarType),
    Boolean(ScalarType),
    Reference(ReferenceType),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectType {
    pub meta: Meta,
    pub properties: IndexMap<String, TypeSet>, // declaration order
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub meta: Meta,
    pub items: Vec<TypeSet>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StringType {
    pub meta: Meta,
    pub format: Option<String>,
    pub enum_: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScalarType {
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceType {
    pub meta: Meta,
    pub pointer: String,
    pub resolved: Option<TypeSet>, // None: pointer did not resolve
}

/// Non-empty ordered set of alternatives for one schema location.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSet(Vec<TypeDefinition>);

impl TypeSet {
    pub fn single(definition: TypeDefinition) -> Self {
        Self(vec![definition])
    }
    pub fn from_vec(definitions: Vec<TypeDefinition>) -> Option<Self> {
        if definitions.is_empty() { None } else { Some(Self(definitions)) }
    }
    pub fn first(&self) -> &TypeDefinition {
        &self.0[0]
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        false
    }
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.0.iter()
    }
}

impl TypeDefinition {
    pub fn meta(&self) -> &Meta {
        match self {
            Self::Object(x) => &x.meta,
            Self::Array(x) => &x.meta,
            Self::String(x) => &x.meta,
            Self::Integer(x) | Self::Number(x) | Self::Boolean(x) => &x.meta,
            Self::Reference(x) => &x.meta,
        }
    }
    pub fn meta_mut(&mut self) -> &mut Meta {
        match self {
            Self::Object(x) => &mut x.meta,
            Self::Array(x) => &mut x.meta,
            Self::String(x) => &mut x.meta,
            Self::Integer(x) | Self::Number(x) | Self::Boolean(x) => &mut x.meta,
            Self::Reference(x) => &mut x.meta,
        }
    }
    pub fn name(&self) -> &str {
        &self.meta().name
    }
    pub fn is_required(&self) -> bool {
        self.meta().required
    }
    pub fn is_nullable(&self) -> bool {
        self.meta().nullable
    }
    pub fn custom_namespace(&self) -> Option<&str> {
        self.meta().namespace.as_deref().filter(|ns| !ns.trim_matches('\\').is_empty())
    }
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Reference(_) => "reference",
        }
    }
}

impl ReferenceType {
    /// Last segment of the pointer, e.g. `address` for `#/definitions/address`.
    pub fn target_name(&self) -> &str {
        self.pointer.rsplit('/').next().unwrap_or(&self.pointer)
    }
}
