use crate::ir::StringType;
use crate::model::{ClassDescription, MethodDescription, ParamDescription, PropertyDescription, ValueObjectKind};
use crate::naming::SharedFilters;

use super::{method_accessor, method_equals, method_from_native, method_magic_to_string, name_or};

/// Language tag wrapper; `language` and `region` come from `locale_parse`.
pub struct Bcp47Factory {
    filters: SharedFilters,
    typed: bool,
}

impl Bcp47Factory {
    pub fn new(filters: SharedFilters, typed: bool) -> Self {
        Self { filters, typed }
    }

    pub fn class_description(&self, def: &StringType) -> ClassDescription {
        self.class_description_from_native(name_or(&def.meta.name, "bcp47"))
    }

    pub fn class_description_from_native(&self, name: &str) -> ClassDescription {
        let field = self.filters.property_name(name);

        let mut class = ClassDescription::value_object(ValueObjectKind::Bcp47, self.typed);
        class.add_property(PropertyDescription::private(&field, "string"));
        class.add_property(PropertyDescription::private("language", "?string"));
        class.add_property(PropertyDescription::private("region", "?string"));

        class.add_method(method_from_native("fromString", "string", &field));
        class.add_method(
            MethodDescription::private("__construct")
                .param(ParamDescription::new(&field, "string"))
                .body([
                    format!("$this->{field} = ${field};"),
                    format!("$parsed = locale_parse(${field}) ?: [];"),
                    "$this->language = $parsed['language'] ?? null;".to_string(),
                    "$this->region = $parsed['region'] ?? null;".to_string(),
                ]),
        );
        class.add_method(method_accessor("toString", "string", &field));
        class.add_method(method_accessor("language", "?string", "language"));
        class.add_method(method_accessor("region", "?string", "region"));
        class.add_method(method_equals(&field));
        class.add_method(method_magic_to_string(&format!("$this->{field}")));
        class
    }
}
