//! Optional passes over a finished collection. Value objects, and hand-built
//! classes carrying a marker method, are left alone; members that already
//! exist are never replaced, so both passes are idempotent.
use crate::model::{ClassDescription, ClassDescriptionCollection, ConstValue, MethodDescription, Visibility};
use crate::naming::NameFilters;

/// One accessor per property, returning the property with its declared type.
pub fn add_getter_methods(collection: &mut ClassDescriptionCollection, filters: &dyn NameFilters, typed: bool) {
    for class in collection.iter_mut().filter(|c| !is_value_object_like(c)) {
        let mut getters = Vec::new();
        for property in class.properties.values() {
            let method_name = filters.method_name(&property.name);
            if class.has_method(&method_name) {
                continue;
            }
            let mut getter = MethodDescription::public(method_name).body([format!("return $this->{};", property.name)]);
            if typed {
                getter.return_type = Some(property.type_hint.clone());
            }
            getter.return_doc_hint = property.doc_hint.clone();
            getters.push(getter);
        }
        for getter in getters {
            class.add_method(getter);
        }
    }
}

/// One public constant per property: `BILLING_ADDRESS = 'billing_address'`.
pub fn add_class_constants_for_properties(collection: &mut ClassDescriptionCollection, filters: &dyn NameFilters) {
    for class in collection.iter_mut().filter(|c| !is_value_object_like(c)) {
        let constants: Vec<_> = class
            .properties
            .values()
            .map(|p| (filters.const_name(&p.name), filters.const_value(&p.name)))
            .filter(|(name, _)| !class.has_constant(name))
            .collect();
        for (name, value) in constants {
            class.add_constant(name, ConstValue::String(value), Visibility::Public);
        }
    }
}

fn is_value_object_like(class: &ClassDescription) -> bool {
    class.is_value_object() || class.has_marker_method()
}
