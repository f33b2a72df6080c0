//! Language-neutral class model produced by the graph builder and rendered
//! by an emitter.
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Method names whose presence marks a hand-assembled class as a value object.
pub const MARKER_METHODS: [&str; 5] = ["fromItems", "toString", "toInt", "toFloat", "toBool"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueObjectKind {
    String,
    Integer,
    Number,
    Boolean,
    DateTime,
    Uuid,
    Bcp47,
    /// `source_name` is the raw type name the companion exception is named after.
    Enum { source_name: String },
    Array,
}

impl ValueObjectKind {
    pub fn conversion(&self) -> Conversion {
        match self {
            Self::String | Self::DateTime | Self::Uuid | Self::Bcp47 | Self::Enum { .. } => Conversion::STRING,
            Self::Integer => Conversion::INT,
            Self::Number => Conversion::FLOAT,
            Self::Boolean => Conversion::BOOL,
            Self::Array => Conversion::ARRAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Entity,
    ValueObject(ValueObjectKind),
    Exception,
}

impl ClassKind {
    /// Entities convert through arrays; exceptions have no raw form.
    pub fn conversion(&self) -> Option<Conversion> {
        match self {
            Self::Entity => Some(Conversion::ARRAY),
            Self::ValueObject(kind) => Some(kind.conversion()),
            Self::Exception => None,
        }
    }
}

/// Named constructor and accessor pair between a class and its raw PHP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// Native type of the raw value.
    pub native: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

impl Conversion {
    pub const STRING: Self = Self { native: "string", from: "fromString", to: "toString" };
    pub const INT: Self = Self { native: "int", from: "fromInt", to: "toInt" };
    pub const FLOAT: Self = Self { native: "float", from: "fromFloat", to: "toFloat" };
    pub const BOOL: Self = Self { native: "bool", from: "fromBool", to: "toBool" };
    pub const ARRAY: Self = Self { native: "array", from: "fromArray", to: "toArray" };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDescription {
    pub name: String,
    /// Schema key the property was generated from; raw arrays use it.
    pub source_name: Option<String>,
    /// Native or class type, `?`-prefixed when nullable.
    pub type_hint: String,
    pub doc_hint: Option<String>,
    pub default: Option<String>,
    pub visibility: Visibility,
}

impl PropertyDescription {
    pub fn private(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_name: None,
            type_hint: type_hint.into(),
            doc_hint: None,
            default: None,
            visibility: Visibility::Private,
        }
    }
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }
    pub fn with_doc_hint(mut self, hint: impl Into<String>) -> Self {
        self.doc_hint = Some(hint.into());
        self
    }
    /// Key of this property in the raw array form.
    pub fn raw_key(&self) -> &str {
        self.source_name.as_deref().unwrap_or(&self.name)
    }
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
    pub fn is_nullable(&self) -> bool {
        self.type_hint.starts_with('?')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDescription {
    pub name: String,
    pub type_hint: Option<String>,
    pub doc_hint: Option<String>,
    pub variadic: bool,
}

impl ParamDescription {
    pub fn new(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: Some(type_hint.into()),
            doc_hint: None,
            variadic: false,
        }
    }
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            doc_hint: None,
            variadic: false,
        }
    }
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
    pub fn with_doc_hint(mut self, hint: impl Into<String>) -> Self {
        self.doc_hint = Some(hint.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDescription {
    pub name: String,
    pub params: Vec<ParamDescription>,
    pub return_type: Option<String>,
    pub return_doc_hint: Option<String>,
    /// Statement lines, indented relative to the method body.
    pub body: Vec<String>,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl MethodDescription {
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            return_doc_hint: None,
            body: Vec::new(),
            is_static: false,
            visibility: Visibility::Public,
        }
    }
    pub fn private(name: impl Into<String>) -> Self {
        Self { visibility: Visibility::Private, ..Self::public(name) }
    }
    pub fn named_constructor(name: impl Into<String>) -> Self {
        Self { is_static: true, return_type: Some("self".into()), ..Self::public(name) }
    }
    pub fn param(mut self, param: ParamDescription) -> Self {
        self.params.push(param);
        self
    }
    pub fn returns(mut self, type_hint: impl Into<String>) -> Self {
        self.return_type = Some(type_hint.into());
        self
    }
    pub fn returns_doc(mut self, hint: impl Into<String>) -> Self {
        self.return_doc_hint = Some(hint.into());
        self
    }
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }
    pub fn body<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body = lines.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConstValue {
    String(String),
    /// `[self::A, self::B]`
    SelfList(Vec<String>),
    /// Predefined constant such as `DATE_ATOM`; rendered verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantDescription {
    pub name: String,
    pub value: ConstValue,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDescription {
    pub name: String,
    pub namespace: String,
    pub kind: ClassKind,
    pub is_final: bool,
    pub is_strict: bool,
    pub typed: bool,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub namespace_imports: IndexSet<String>,
    pub constants: IndexMap<String, ConstantDescription>,
    pub properties: IndexMap<String, PropertyDescription>,
    pub methods: IndexMap<String, MethodDescription>,
}

impl ClassDescription {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            is_final: true,
            is_strict: true,
            typed: true,
            extends: None,
            implements: Vec::new(),
            namespace_imports: IndexSet::new(),
            constants: IndexMap::new(),
            properties: IndexMap::new(),
            methods: IndexMap::new(),
        }
    }

    pub fn entity(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::new(name, namespace, ClassKind::Entity)
    }

    pub fn value_object(kind: ValueObjectKind, typed: bool) -> Self {
        let mut class = Self::new("", "", ClassKind::ValueObject(kind));
        class.typed = typed;
        class
    }

    pub fn fqcn(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    pub fn is_value_object(&self) -> bool {
        matches!(self.kind, ClassKind::ValueObject(_))
    }

    pub fn has_marker_method(&self) -> bool {
        MARKER_METHODS.iter().any(|m| self.methods.contains_key(*m))
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn has_constant(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    pub fn add_property(&mut self, property: PropertyDescription) {
        self.properties.insert(property.name.clone(), property);
    }

    pub fn add_method(&mut self, method: MethodDescription) {
        self.methods.insert(method.name.clone(), method);
    }

    pub fn add_constant(&mut self, name: impl Into<String>, value: ConstValue, visibility: Visibility) {
        let name = name.into();
        self.constants.insert(name.clone(), ConstantDescription { name, value, visibility });
    }

    /// Import `fqcn` unless it lives in this class's namespace.
    pub fn add_import(&mut self, fqcn: &str) {
        let (namespace, _) = split_fqcn(fqcn);
        if namespace != self.namespace {
            self.require_import(fqcn);
        }
    }

    /// Import `fqcn` regardless of the current namespace. Factories use this
    /// before the final namespace is known; emitters drop no-op imports.
    pub fn require_import(&mut self, fqcn: &str) {
        self.namespace_imports.insert(fqcn.trim_start_matches('\\').to_string());
    }
}

/// All classes of one generation run, keyed by fully-qualified name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ClassDescriptionCollection {
    classes: IndexMap<String, ClassDescription>,
}

impl ClassDescriptionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing an existing class with the same FQCN in place.
    /// Identical rebuilds of shared definitions replace silently.
    pub fn add(&mut self, class: ClassDescription) {
        let fqcn = class.fqcn();
        if self.classes.get(&fqcn).is_some_and(|existing| *existing != class) {
            tracing::warn!(class = %fqcn, "replaced previously generated class with a different shape");
        }
        self.classes.insert(fqcn, class);
    }

    pub fn get(&self, fqcn: &str) -> Option<&ClassDescription> {
        self.classes.get(fqcn)
    }

    pub fn contains(&self, fqcn: &str) -> bool {
        self.classes.contains_key(fqcn)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDescription> {
        self.classes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ClassDescription> {
        self.classes.values_mut()
    }

    pub fn get_mut(&mut self, fqcn: &str) -> Option<&mut ClassDescription> {
        self.classes.get_mut(fqcn)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}

impl IntoIterator for ClassDescriptionCollection {
    type Item = ClassDescription;
    type IntoIter = indexmap::map::IntoValues<String, ClassDescription>;
    fn into_iter(self) -> Self::IntoIter {
        self.classes.into_values()
    }
}

impl Extend<ClassDescription> for ClassDescriptionCollection {
    fn extend<T: IntoIterator<Item = ClassDescription>>(&mut self, iter: T) {
        for class in iter {
            self.add(class);
        }
    }
}

pub fn qualify(namespace: &str, name: &str) -> String {
    let namespace = namespace.trim_matches('\\');
    if namespace.is_empty() { name.to_string() } else { format!("{namespace}\\{name}") }
}

/// `Acme\Geo\City` → (`Acme\Geo`, `City`).
pub fn split_fqcn(fqcn: &str) -> (&str, &str) {
    let fqcn = fqcn.trim_start_matches('\\');
    match fqcn.rfind('\\') {
        Some(ix) => (&fqcn[..ix], &fqcn[ix + 1..]),
        None => ("", fqcn),
    }
}
