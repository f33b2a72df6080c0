use crate::model::{ClassDescription, MethodDescription, PropertyDescription, ValueObjectKind};

pub const DEFAULT_POSITION_PROPERTY: &str = "position";

/// `\Iterator` + `\Countable` over a same-typed backing array.
#[derive(Debug, Clone, Copy)]
pub struct IteratorFactory {
    typed: bool,
}

impl IteratorFactory {
    pub fn new(typed: bool) -> Self {
        Self { typed }
    }

    /// Class with the iterator properties and methods. `items` is the
    /// (already filtered) backing field, `item_type` the element class.
    pub fn class_description_from_native(&self, items: &str, item_type: &str, position: &str) -> ClassDescription {
        let mut class = ClassDescription::value_object(ValueObjectKind::Array, self.typed);
        class.implements = vec!["\\Iterator".into(), "\\Countable".into()];
        class.add_property(PropertyDescription::private(position, "int").with_default("0"));
        class.add_property(PropertyDescription::private(items, "array").with_doc_hint(format!("{item_type}[]")));
        for method in self.methods(items, item_type, position) {
            class.add_method(method);
        }
        class
    }

    pub fn methods(&self, items: &str, item_type: &str, position: &str) -> Vec<MethodDescription> {
        vec![
            MethodDescription::public("rewind")
                .returns("void")
                .body([format!("$this->{position} = 0;")]),
            MethodDescription::public("current")
                .returns(item_type)
                .body([format!("return $this->{items}[$this->{position}];")]),
            MethodDescription::public("key")
                .returns("int")
                .body([format!("return $this->{position};")]),
            MethodDescription::public("next")
                .returns("void")
                .body([format!("++$this->{position};")]),
            MethodDescription::public("valid")
                .returns("bool")
                .body([format!("return isset($this->{items}[$this->{position}]);")]),
            MethodDescription::public("count")
                .returns("int")
                .body([format!("return count($this->{items});")]),
        ]
    }
}
