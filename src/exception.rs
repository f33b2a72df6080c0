//! Companion `Invalid<Type>` exceptions thrown by enum value objects.
use crate::error::{GenerateError, Result};
use crate::ir::TypeDefinition;
use crate::model::{ClassDescription, ClassKind, MethodDescription, ParamDescription, ValueObjectKind, qualify, split_fqcn};
use crate::naming::{NameFilters, SharedFilters};

/// `Acme` → `Acme\Exception`.
pub fn exception_namespace(value_object_namespace: &str) -> String {
    qualify(value_object_namespace, "Exception")
}

/// Exception class name and its named constructor for an enum type name.
pub fn exception_names(filters: &dyn NameFilters, source_name: &str) -> (String, String) {
    (
        format!("Invalid{}", filters.class_name(source_name)),
        filters.method_name(&format!("for_{source_name}")),
    )
}

pub struct ExceptionCodeFactory {
    filters: SharedFilters,
    typed: bool,
}

impl ExceptionCodeFactory {
    pub fn new(filters: SharedFilters, typed: bool) -> Self {
        Self { filters, typed }
    }

    /// Exception for an enum string definition whose value object is `value_object_fqcn`.
    pub fn class_description(&self, definition: &TypeDefinition, value_object_fqcn: &str) -> Result<ClassDescription> {
        match definition {
            TypeDefinition::String(def) if def.enum_.is_some() => {
                let name = if def.meta.name.is_empty() { "text" } else { def.meta.name.as_str() };
                Ok(self.class_description_from_native(name, value_object_fqcn))
            }
            other => Err(GenerateError::unsupported(other.kind_name(), other.name(), "type not supported")),
        }
    }

    /// Exception for an already generated enum value object.
    pub fn class_description_for_enum(&self, value_object: &ClassDescription) -> Result<ClassDescription> {
        match &value_object.kind {
            ClassKind::ValueObject(ValueObjectKind::Enum { source_name }) => {
                Ok(self.class_description_from_native(source_name, &value_object.fqcn()))
            }
            _ => Err(GenerateError::unsupported("class", value_object.fqcn(), "type not supported")),
        }
    }

    pub fn class_description_from_native(&self, name: &str, value_object_fqcn: &str) -> ClassDescription {
        let (namespace, value_object) = split_fqcn(value_object_fqcn);
        let (class_name, method_name) = exception_names(self.filters.as_ref(), name);
        let arg = self.filters.property_name(name);

        let mut class = ClassDescription::new(class_name, exception_namespace(namespace), ClassKind::Exception);
        class.typed = self.typed;
        class.extends = Some("InvalidArgumentException".into());
        class.add_import(value_object_fqcn);
        class.add_import("InvalidArgumentException");
        class.add_method(
            MethodDescription::named_constructor(method_name)
                .param(ParamDescription::new(&arg, "string"))
                .body([format!(
                    "return new self(sprintf('Invalid value for \"{value_object}\" given. Got \"%s\", \
                     but allowed values are ' . implode(', ', {value_object}::CHOICES), ${arg}));"
                )]),
        );
        class
    }
}
