use crate::ir::StringType;
use crate::model::{ClassDescription, PropertyDescription, ValueObjectKind};
use crate::naming::SharedFilters;

use super::{method_accessor, method_equals, method_from_native, method_magic_to_string, method_private_construct, name_or};

/// Plain string wrapper: `fromString`, `toString`, `equals`, `__toString`.
pub struct StringFactory {
    filters: SharedFilters,
    typed: bool,
}

impl StringFactory {
    pub fn new(filters: SharedFilters, typed: bool) -> Self {
        Self { filters, typed }
    }

    pub fn class_description(&self, def: &StringType) -> ClassDescription {
        self.class_description_from_native(name_or(&def.meta.name, "text"))
    }

    pub fn class_description_from_native(&self, name: &str) -> ClassDescription {
        let field = self.filters.property_name(name);
        let mut class = ClassDescription::value_object(ValueObjectKind::String, self.typed);
        class.add_property(PropertyDescription::private(&field, "string"));
        class.add_method(method_from_native("fromString", "string", &field));
        class.add_method(method_private_construct("string", &field));
        class.add_method(method_accessor("toString", "string", &field));
        class.add_method(method_equals(&field));
        class.add_method(method_magic_to_string(&format!("$this->{field}")));
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Visibility;
    use crate::naming::ConventionalNames;
    use std::sync::Arc;

    #[test]
    fn string_value_object_has_the_canonical_shape() {
        let class = StringFactory::new(Arc::new(ConventionalNames), true).class_description_from_native("city");
        let methods: Vec<_> = class.methods.keys().cloned().collect();
        assert_eq!(methods, ["fromString", "__construct", "toString", "equals", "__toString"]);
        assert_eq!(class.properties["city"].type_hint, "string");
        assert_eq!(class.properties["city"].visibility, Visibility::Private);
        assert_eq!(class.methods["__construct"].visibility, Visibility::Private);
        assert!(class.methods["fromString"].is_static);
        assert_eq!(class.methods["fromString"].body, ["return new self($city);"]);
        assert_eq!(class.methods["equals"].body.last().unwrap(), "return $this->city === $other->city;");
        assert!(class.is_value_object());
    }

    #[test]
    fn field_name_goes_through_the_property_filter() {
        let class = StringFactory::new(Arc::new(ConventionalNames), true).class_description_from_native("street_address");
        assert!(class.properties.contains_key("streetAddress"));
        assert_eq!(class.methods["toString"].body, ["return $this->streetAddress;"]);
    }
}
