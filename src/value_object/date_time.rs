use crate::ir::StringType;
use crate::model::{
    ClassDescription, ConstValue, MethodDescription, ParamDescription, PropertyDescription, ValueObjectKind, Visibility,
};
use crate::naming::SharedFilters;

use super::{method_accessor, method_equals_with, method_magic_to_string, method_private_construct, name_or};

/// ISO 8601 with microseconds and offset.
pub const DEFAULT_OUTPUT_FORMAT: &str = "Y-m-d\\TH:i:s.uP";

const NATIVE: &str = "DateTimeImmutable";

/// `DateTimeImmutable` wrapper normalized to UTC on every construction path.
pub struct DateTimeFactory {
    filters: SharedFilters,
    typed: bool,
    output_format: String,
}

impl DateTimeFactory {
    pub fn new(filters: SharedFilters, typed: bool) -> Self {
        Self {
            filters,
            typed,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }

    /// A format string, or the name of a predefined PHP constant such as `DATE_ATOM`.
    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    pub fn class_description(&self, def: &StringType) -> ClassDescription {
        self.class_description_from_native(name_or(&def.meta.name, "dateTime"), &self.output_format)
    }

    pub fn class_description_from_native(&self, name: &str, output_format: &str) -> ClassDescription {
        let field = self.filters.property_name(name);

        let mut class = ClassDescription::value_object(ValueObjectKind::DateTime, self.typed);
        class.require_import("DateTimeImmutable");
        class.require_import("DateTimeZone");
        class.require_import("InvalidArgumentException");
        class.add_constant("OUTPUT_FORMAT", output_format_value(output_format), Visibility::Private);
        class.add_property(PropertyDescription::private(&field, NATIVE));

        class.add_method(
            MethodDescription::named_constructor("fromDateTime")
                .param(ParamDescription::new(&field, NATIVE))
                .body([
                    format!("${field} = self::ensureUtc(${field});"),
                    format!("return new self(${field});"),
                ]),
        );
        class.add_method(
            MethodDescription::named_constructor("fromString")
                .param(ParamDescription::new(&field, "string"))
                .body([
                    "try {".to_string(),
                    format!("    $dateTime = new DateTimeImmutable(${field});"),
                    "} catch (\\Exception $e) {".to_string(),
                    format!(
                        "    throw new InvalidArgumentException(sprintf('String \"%s\" is not supported. \
                         Use a date time format which is compatible with ISO 8601.', ${field}));"
                    ),
                    "}".to_string(),
                    "$dateTime = self::ensureUtc($dateTime);".to_string(),
                    "return new self($dateTime);".to_string(),
                ]),
        );
        class.add_method(method_private_construct(NATIVE, &field));
        class.add_method(
            MethodDescription::public("toString")
                .returns("string")
                .body([format!("return $this->{field}->format(self::OUTPUT_FORMAT);")]),
        );
        class.add_method(method_accessor("dateTime", NATIVE, &field));
        class.add_method(method_equals_with("$this->toString() === $other->toString()"));
        class.add_method(method_magic_to_string("$this->toString()"));
        class.add_method(
            MethodDescription::private("ensureUtc")
                .static_()
                .param(ParamDescription::new("dateTime", NATIVE))
                .returns(NATIVE)
                .body([
                    "if ($dateTime->getTimezone()->getName() !== 'UTC') {",
                    "    $dateTime = $dateTime->setTimezone(new DateTimeZone('UTC'));",
                    "}",
                    "return $dateTime;",
                ]),
        );
        class
    }
}

fn output_format_value(format: &str) -> ConstValue {
    let is_constant_name = !format.is_empty()
        && format.starts_with(|c: char| c.is_ascii_uppercase())
        && format.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    if is_constant_name {
        ConstValue::Raw(format.to_string())
    } else {
        ConstValue::String(format.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::ConventionalNames;
    use std::sync::Arc;

    fn factory() -> DateTimeFactory {
        DateTimeFactory::new(Arc::new(ConventionalNames), true)
    }

    #[test]
    fn both_construction_paths_normalize_to_utc() {
        let class = factory().class_description_from_native("created_at", DEFAULT_OUTPUT_FORMAT);
        assert_eq!(class.methods["fromDateTime"].body[0], "$createdAt = self::ensureUtc($createdAt);");
        assert!(class.methods["fromString"].body.iter().any(|l| l.contains("self::ensureUtc($dateTime)")));
        let ensure = &class.methods["ensureUtc"];
        assert!(ensure.is_static);
        assert_eq!(ensure.visibility, Visibility::Private);
        assert!(ensure.body[0].contains("!== 'UTC'"));
    }

    #[test]
    fn parse_failures_raise_invalid_argument_with_the_input() {
        let class = factory().class_description_from_native("created_at", DEFAULT_OUTPUT_FORMAT);
        let throw = class.methods["fromString"]
            .body
            .iter()
            .find(|l| l.contains("throw new InvalidArgumentException"))
            .unwrap();
        assert!(throw.contains("is not supported. Use a date time format which is compatible with ISO 8601."));
        assert!(throw.ends_with("$createdAt));"));
        assert!(class.namespace_imports.contains("InvalidArgumentException"));
    }

    #[test]
    fn output_format_defaults_to_microseconds_with_offset() {
        let class = factory().class_description(&StringType::default());
        assert_eq!(
            class.constants["OUTPUT_FORMAT"].value,
            ConstValue::String("Y-m-d\\TH:i:s.uP".into())
        );
        assert_eq!(class.methods["toString"].body, ["return $this->dateTime->format(self::OUTPUT_FORMAT);"]);
    }

    #[test]
    fn output_format_can_name_a_predefined_constant() {
        let class = factory().with_output_format("DATE_ATOM").class_description(&StringType::default());
        assert_eq!(class.constants["OUTPUT_FORMAT"].value, ConstValue::Raw("DATE_ATOM".into()));
        let class = factory().with_output_format("Y-m-d").class_description(&StringType::default());
        assert_eq!(class.constants["OUTPUT_FORMAT"].value, ConstValue::String("Y-m-d".into()));
    }
}
