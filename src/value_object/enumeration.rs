//! Enum-style string wrapper.
//!
//! Every allowed literal becomes a private constant and a named constructor;
//! `CHOICES` lists the constants in schema order. The private constructor
//! rejects anything outside `CHOICES` through the companion exception built
//! by [`crate::exception::ExceptionCodeFactory`].
use crate::exception::exception_names;
use crate::ir::StringType;
use crate::model::{
    ClassDescription, ConstValue, MethodDescription, ParamDescription, PropertyDescription, ValueObjectKind, Visibility,
};
use crate::naming::SharedFilters;

use super::{method_accessor, method_equals, method_from_native, method_magic_to_string, name_or};

pub struct EnumFactory {
    filters: SharedFilters,
    typed: bool,
}

impl EnumFactory {
    pub fn new(filters: SharedFilters, typed: bool) -> Self {
        Self { filters, typed }
    }

    pub fn class_description(&self, def: &StringType) -> ClassDescription {
        let values = def.enum_.as_deref().unwrap_or_default();
        self.class_description_from_native(name_or(&def.meta.name, "text"), values)
    }

    pub fn class_description_from_native(&self, name: &str, values: &[String]) -> ClassDescription {
        let field = self.filters.property_name(name);
        let (exception_class, exception_method) = exception_names(self.filters.as_ref(), name);

        let mut class = ClassDescription::value_object(
            ValueObjectKind::Enum { source_name: name.to_string() },
            self.typed,
        );

        let mut choices = Vec::with_capacity(values.len());
        for value in values {
            let constant = self.filters.const_name(value);
            class.add_constant(&constant, ConstValue::String(value.clone()), Visibility::Private);
            choices.push(constant);
        }
        class.add_constant("CHOICES", ConstValue::SelfList(choices.clone()), Visibility::Public);
        class.add_property(PropertyDescription::private(&field, "string"));

        class.add_method(method_from_native("fromString", "string", &field));
        for (value, constant) in values.iter().zip(&choices) {
            let method = self.filters.const_value(value);
            if class.has_method(&method) {
                tracing::warn!(value = %value, method = %method, "enum value collides with an existing method; skipped");
                continue;
            }
            class.add_method(
                MethodDescription::named_constructor(method).body([format!("return new self(self::{constant});")]),
            );
        }
        class.add_method(
            MethodDescription::private("__construct")
                .param(ParamDescription::new(&field, "string"))
                .body([
                    format!("if (false === in_array(${field}, self::CHOICES, true)) {{"),
                    format!("    throw {exception_class}::{exception_method}(${field});"),
                    "}".to_string(),
                    format!("$this->{field} = ${field};"),
                ]),
        );
        class.add_method(method_accessor("toString", "string", &field));
        class.add_method(method_equals(&field));
        class.add_method(
            MethodDescription::public("isOneOf")
                .param(ParamDescription::new("others", "self").variadic())
                .returns("bool")
                .body([
                    "foreach ($others as $other) {",
                    "    if ($this->equals($other)) {",
                    "        return true;",
                    "    }",
                    "}",
                    "return false;",
                ]),
        );
        class.add_method(method_magic_to_string(&format!("$this->{field}")));
        class
    }
}
