//! Value-object factories and the dispatcher routing type definitions to them.
pub mod array;
pub mod bcp47;
pub mod date_time;
pub mod enumeration;
pub mod iterator;
pub mod scalar;
pub mod string;
pub mod uuid;

use crate::error::{GenerateError, Result};
use crate::exception;
use crate::ir::{StringType, TypeDefinition};
use crate::model::{ClassDescription, ClassKind, MethodDescription, ParamDescription, ValueObjectKind, qualify};
use crate::naming::SharedFilters;

use self::array::ArrayFactory;
use self::bcp47::Bcp47Factory;
use self::date_time::DateTimeFactory;
use self::enumeration::EnumFactory;
use self::scalar::ScalarFactory;
use self::string::StringFactory;
use self::uuid::UuidFactory;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Routes scalar and array definitions to the factory for their kind.
pub struct ValueObjectDispatcher {
    filters: SharedFilters,
    string: StringFactory,
    integer: ScalarFactory,
    number: ScalarFactory,
    boolean: ScalarFactory,
    date_time: DateTimeFactory,
    enumeration: EnumFactory,
    uuid: UuidFactory,
    bcp47: Bcp47Factory,
    array: ArrayFactory,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl ValueObjectDispatcher {
    pub fn new(filters: SharedFilters, typed: bool) -> Self {
        Self {
            string: StringFactory::new(filters.clone(), typed),
            integer: ScalarFactory::integer(filters.clone(), typed),
            number: ScalarFactory::number(filters.clone(), typed),
            boolean: ScalarFactory::boolean(filters.clone(), typed),
            date_time: DateTimeFactory::new(filters.clone(), typed),
            enumeration: EnumFactory::new(filters.clone(), typed),
            uuid: UuidFactory::new(filters.clone(), typed),
            bcp47: Bcp47Factory::new(filters.clone(), typed),
            array: ArrayFactory::new(filters.clone(), typed),
            filters,
        }
    }

    /// Output format for every date time value object built by this dispatcher.
    pub fn with_date_time_format(mut self, format: impl Into<String>) -> Self {
        self.date_time = self.date_time.with_output_format(format);
        self
    }

    pub fn filters(&self) -> &SharedFilters {
        &self.filters
    }

    pub fn class_description(&self, definition: &TypeDefinition) -> Result<ClassDescription> {
        match definition {
            TypeDefinition::String(def) => Ok(self.string_class_description(def)),
            TypeDefinition::Integer(def) => Ok(self.integer.class_description(def)),
            TypeDefinition::Number(def) => Ok(self.number.class_description(def)),
            TypeDefinition::Boolean(def) => Ok(self.boolean.class_description(def)),
            TypeDefinition::Array(def) => self.array.class_description(def),
            TypeDefinition::Object(_) | TypeDefinition::Reference(_) => Err(GenerateError::unsupported(
                definition.kind_name(),
                definition.name(),
                "no value object template for this kind",
            )),
        }
    }

    /// Dispatch and stamp the result as a strict, final class in `namespace`.
    pub fn generate_value_object(
        &self,
        class_name: &str,
        namespace: &str,
        definition: &TypeDefinition,
    ) -> Result<ClassDescription> {
        let mut class = self.class_description(definition)?;
        class.name = class_name.to_string();
        class.namespace = namespace.to_string();
        class.is_strict = true;
        class.is_final = true;

        if let ClassKind::ValueObject(ValueObjectKind::Enum { source_name }) = &class.kind {
            let (exception_class, _) = exception::exception_names(self.filters.as_ref(), source_name);
            let fqcn = qualify(&exception::exception_namespace(namespace), &exception_class);
            class.require_import(&fqcn);
        }

        tracing::debug!(class = %class.fqcn(), kind = definition.kind_name(), "generated value object");
        Ok(class)
    }

    fn string_class_description(&self, def: &StringType) -> ClassDescription {
        if def.enum_.is_some() {
            return self.enumeration.class_description(def);
        }
        match def.format.as_deref() {
            Some("date-time" | "ISO 8601") => self.date_time.class_description(def),
            Some("uuid") => self.uuid.class_description(def),
            Some("BCP 47") => self.bcp47.class_description(def),
            _ => self.string.class_description(def),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SHARED TEMPLATES
// ————————————————————————————————————————————————————————————————————————————

pub(crate) fn name_or<'a>(name: &'a str, default: &'a str) -> &'a str {
    if name.is_empty() { default } else { name }
}

/// `public static function <name>(<type> $<field>) : self`
pub(crate) fn method_from_native(name: &str, native: &str, field: &str) -> MethodDescription {
    MethodDescription::named_constructor(name)
        .param(ParamDescription::new(field, native))
        .body([format!("return new self(${field});")])
}

/// `private function __construct(<type> $<field>)`
pub(crate) fn method_private_construct(native: &str, field: &str) -> MethodDescription {
    MethodDescription::private("__construct")
        .param(ParamDescription::new(field, native))
        .body([format!("$this->{field} = ${field};")])
}

pub(crate) fn method_accessor(name: &str, native: &str, field: &str) -> MethodDescription {
    MethodDescription::public(name)
        .returns(native)
        .body([format!("return $this->{field};")])
}

/// Native `===` comparison guarded by an `instanceof self` check.
pub(crate) fn method_equals(field: &str) -> MethodDescription {
    method_equals_with(&format!("$this->{field} === $other->{field}"))
}

pub(crate) fn method_equals_with(comparison: &str) -> MethodDescription {
    MethodDescription::public("equals")
        .param(ParamDescription::untyped("other"))
        .returns("bool")
        .body([
            "if (!$other instanceof self) {".to_string(),
            "    return false;".to_string(),
            "}".to_string(),
            format!("return {comparison};"),
        ])
}

pub(crate) fn method_magic_to_string(expression: &str) -> MethodDescription {
    MethodDescription::public("__toString")
        .returns("string")
        .body([format!("return {expression};")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ArrayType, Meta, ObjectType, ScalarType, TypeSet};
    use crate::naming::ConventionalNames;
    use std::sync::Arc;
    use test_case::test_case;

    fn dispatcher() -> ValueObjectDispatcher {
        ValueObjectDispatcher::new(Arc::new(ConventionalNames), true)
    }

    fn string(name: &str, format: Option<&str>, enum_: Option<&[&str]>) -> TypeDefinition {
        TypeDefinition::String(StringType {
            meta: Meta { name: name.into(), ..Meta::default() },
            format: format.map(str::to_string),
            enum_: enum_.map(|xs| xs.iter().map(|x| x.to_string()).collect()),
        })
    }

    fn kind_of(def: &TypeDefinition) -> ValueObjectKind {
        match dispatcher().class_description(def).unwrap().kind {
            ClassKind::ValueObject(kind) => kind,
            other => panic!("not a value object: {other:?}"),
        }
    }

    #[test_case(None, ValueObjectKind::String)]
    #[test_case(Some("date-time"), ValueObjectKind::DateTime)]
    #[test_case(Some("ISO 8601"), ValueObjectKind::DateTime)]
    #[test_case(Some("uuid"), ValueObjectKind::Uuid)]
    #[test_case(Some("BCP 47"), ValueObjectKind::Bcp47)]
    #[test_case(Some("email"), ValueObjectKind::String)]
    fn strings_route_by_format(format: Option<&str>, expected: ValueObjectKind) {
        assert_eq!(kind_of(&string("value", format, None)), expected);
    }

    #[test]
    fn enum_wins_over_format() {
        let def = string("status", Some("uuid"), Some(&["a", "b"]));
        assert_eq!(kind_of(&def), ValueObjectKind::Enum { source_name: "status".into() });
    }

    #[test]
    fn native_scalars_route_to_their_factories() {
        let meta = Meta { name: "amount".into(), ..Meta::default() };
        assert_eq!(kind_of(&TypeDefinition::Integer(ScalarType { meta: meta.clone() })), ValueObjectKind::Integer);
        assert_eq!(kind_of(&TypeDefinition::Number(ScalarType { meta: meta.clone() })), ValueObjectKind::Number);
        assert_eq!(kind_of(&TypeDefinition::Boolean(ScalarType { meta })), ValueObjectKind::Boolean);
    }

    #[test]
    fn arrays_route_to_the_array_factory() {
        let def = TypeDefinition::Array(ArrayType {
            meta: Meta { name: "tags".into(), ..Meta::default() },
            items: vec![TypeSet::single(string("tag", None, None))],
        });
        assert_eq!(kind_of(&def), ValueObjectKind::Array);
    }

    #[test]
    fn objects_are_unsupported() {
        let def = TypeDefinition::Object(ObjectType::default());
        let err = dispatcher().class_description(&def).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedType { kind: "object", .. }));
    }

    #[test]
    fn empty_names_fall_back_to_kind_defaults() {
        let class = dispatcher().class_description(&string("", None, None)).unwrap();
        assert!(class.properties.contains_key("text"));
        let class = dispatcher()
            .class_description(&TypeDefinition::Boolean(ScalarType::default()))
            .unwrap();
        assert!(class.properties.contains_key("boolean"));
        let class = dispatcher().class_description(&string("", Some("date-time"), None)).unwrap();
        assert!(class.properties.contains_key("dateTime"));
    }

    #[test]
    fn generated_value_objects_are_stamped_strict_and_final() {
        let class = dispatcher()
            .generate_value_object("City", "Acme", &string("city", None, None))
            .unwrap();
        assert_eq!(class.fqcn(), "Acme\\City");
        assert!(class.is_final && class.is_strict);
    }

    #[test]
    fn enums_import_their_companion_exception() {
        let class = dispatcher()
            .generate_value_object("State", "Acme", &string("state", None, Some(&["NY", "DC"])))
            .unwrap();
        assert!(class.namespace_imports.contains("Acme\\Exception\\InvalidState"));
    }
}
