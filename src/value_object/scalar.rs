//! Integer, number and boolean wrappers. They differ only in the native type,
//! the `from*`/`to*` suffix and how `__toString` renders the value.
use crate::ir::ScalarType;
use crate::model::{ClassDescription, PropertyDescription, ValueObjectKind};
use crate::naming::SharedFilters;

use super::{method_accessor, method_equals, method_from_native, method_magic_to_string, method_private_construct, name_or};

#[derive(Debug, Clone)]
struct NativeScalar {
    kind: ValueObjectKind,
    native: &'static str,
    suffix: &'static str,
    default_name: &'static str,
}

const INTEGER: NativeScalar = NativeScalar { kind: ValueObjectKind::Integer, native: "int", suffix: "Int", default_name: "number" };
const NUMBER: NativeScalar = NativeScalar { kind: ValueObjectKind::Number, native: "float", suffix: "Float", default_name: "number" };
const BOOLEAN: NativeScalar = NativeScalar { kind: ValueObjectKind::Boolean, native: "bool", suffix: "Bool", default_name: "boolean" };

pub struct ScalarFactory {
    filters: SharedFilters,
    typed: bool,
    scalar: NativeScalar,
}

impl ScalarFactory {
    pub fn integer(filters: SharedFilters, typed: bool) -> Self {
        Self { filters, typed, scalar: INTEGER }
    }
    pub fn number(filters: SharedFilters, typed: bool) -> Self {
        Self { filters, typed, scalar: NUMBER }
    }
    pub fn boolean(filters: SharedFilters, typed: bool) -> Self {
        Self { filters, typed, scalar: BOOLEAN }
    }

    pub fn class_description(&self, def: &ScalarType) -> ClassDescription {
        self.class_description_from_native(name_or(&def.meta.name, self.scalar.default_name))
    }

    pub fn class_description_from_native(&self, name: &str) -> ClassDescription {
        let NativeScalar { kind, native, suffix, .. } = &self.scalar;
        let (native, suffix) = (*native, *suffix);
        let field = self.filters.property_name(name);
        let to_string = if native == "bool" {
            format!("$this->{field} ? 'TRUE' : 'FALSE'")
        } else {
            format!("(string) $this->{field}")
        };

        let mut class = ClassDescription::value_object(kind.clone(), self.typed);
        class.add_property(PropertyDescription::private(&field, native));
        class.add_method(method_from_native(&format!("from{suffix}"), native, &field));
        class.add_method(method_private_construct(native, &field));
        class.add_method(method_accessor(&format!("to{suffix}"), native, &field));
        class.add_method(method_equals(&field));
        class.add_method(method_magic_to_string(&to_string));
        class
    }
}
