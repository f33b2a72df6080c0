use crate::ir::StringType;
use crate::model::{ClassDescription, MethodDescription, ParamDescription, PropertyDescription, ValueObjectKind};
use crate::naming::SharedFilters;

use super::{method_equals_with, method_magic_to_string, method_private_construct, name_or};

const NATIVE: &str = "UuidInterface";

/// `ramsey/uuid` backed wrapper. Parsing errors from `Uuid::fromString` propagate.
pub struct UuidFactory {
    filters: SharedFilters,
    typed: bool,
}

impl UuidFactory {
    pub fn new(filters: SharedFilters, typed: bool) -> Self {
        Self { filters, typed }
    }

    pub fn class_description(&self, def: &StringType) -> ClassDescription {
        self.class_description_from_native(name_or(&def.meta.name, "uuid"))
    }

    pub fn class_description_from_native(&self, name: &str) -> ClassDescription {
        let field = self.filters.property_name(name);

        let mut class = ClassDescription::value_object(ValueObjectKind::Uuid, self.typed);
        class.require_import("Ramsey\\Uuid\\Uuid");
        class.require_import("Ramsey\\Uuid\\UuidInterface");
        class.add_property(PropertyDescription::private(&field, NATIVE));
        class.add_method(
            MethodDescription::named_constructor("fromString")
                .param(ParamDescription::new(&field, "string"))
                .body([format!("return new self(Uuid::fromString(${field}));")]),
        );
        class.add_method(method_private_construct(NATIVE, &field));
        class.add_method(
            MethodDescription::public("toString")
                .returns("string")
                .body([format!("return $this->{field}->toString();")]),
        );
        class.add_method(method_equals_with(&format!(
            "$this->{field}->toString() === $other->{field}->toString()"
        )));
        class.add_method(method_magic_to_string(&format!("$this->{field}->toString()")));
        class
    }
}
