//! Immutable, homogeneous collection wrapper.
//!
//! Every operation that looks like a mutation (`add`, `remove`, `filter`)
//! returns a fresh instance; `$this` is never written after construction.
use crate::error::{GenerateError, Result};
use crate::ir::{ArrayType, TypeDefinition, TypeSet};
use crate::model::{ClassDescription, Conversion, MethodDescription, ParamDescription};
use crate::naming::SharedFilters;

use super::iterator::{DEFAULT_POSITION_PROPERTY, IteratorFactory};
use super::{method_equals_with, name_or};

/// The single element type of an array, after one reference hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemType {
    /// Raw name the item class is derived from.
    pub source_name: String,
    /// Named constructor and accessor the wrapper maps raw values through.
    pub conversion: Conversion,
}

impl ItemType {
    pub fn is_object(&self) -> bool {
        self.conversion == Conversion::ARRAY
    }
}

pub struct ArrayFactory {
    filters: SharedFilters,
    iterator: IteratorFactory,
}

impl ArrayFactory {
    pub fn new(filters: SharedFilters, typed: bool) -> Self {
        Self {
            filters,
            iterator: IteratorFactory::new(typed),
        }
    }

    pub fn class_description(&self, def: &ArrayType) -> Result<ClassDescription> {
        let name = name_or(&def.meta.name, "items");
        let item = determine_item_type(name, &def.items)?;
        Ok(self.class_description_from_native(name, &item))
    }

    pub fn class_description_from_native(&self, name: &str, item: &ItemType) -> ClassDescription {
        let items = self.filters.property_name(name);
        let item_class = self.filters.class_name(&item.source_name);
        let arg = self.filters.property_name(&item.source_name);
        let Conversion { native: raw_type, from: from_raw, to: to_raw } = item.conversion;

        let mut class = self
            .iterator
            .class_description_from_native(&items, &item_class, DEFAULT_POSITION_PROPERTY);

        let methods = [
            MethodDescription::named_constructor("fromArray")
                .param(ParamDescription::new("items", "array"))
                .body([
                    format!("return new self(...array_map(static function ({raw_type} $item) {{"),
                    format!("    return {item_class}::{from_raw}($item);"),
                    "}, $items));".to_string(),
                ]),
            MethodDescription::named_constructor("fromItems")
                .param(ParamDescription::new("items", &item_class).variadic())
                .body(["return new self(...$items);"]),
            MethodDescription::named_constructor("emptyList").body(["return new self();"]),
            MethodDescription::private("__construct")
                .param(ParamDescription::new(&items, &item_class).variadic())
                .body([format!("$this->{items} = ${items};")]),
            MethodDescription::public("add")
                .param(ParamDescription::new(&arg, &item_class))
                .returns("self")
                .body([
                    "$copy = clone $this;".to_string(),
                    format!("$copy->{items}[] = ${arg};"),
                    "return $copy;".to_string(),
                ]),
            MethodDescription::public("remove")
                .param(ParamDescription::new(&arg, &item_class))
                .returns("self")
                .body([
                    "$copy = clone $this;".to_string(),
                    format!("$copy->{items} = array_values(array_filter($copy->{items}, static function ($v) use (${arg}) {{"),
                    format!("    return !$v->equals(${arg});"),
                    "}));".to_string(),
                    "return $copy;".to_string(),
                ]),
            MethodDescription::public("first")
                .returns(format!("?{item_class}"))
                .body([format!("return $this->{items}[0] ?? null;")]),
            MethodDescription::public("last")
                .returns(format!("?{item_class}"))
                .body([
                    format!("if (count($this->{items}) === 0) {{"),
                    "    return null;".to_string(),
                    "}".to_string(),
                    format!("return $this->{items}[count($this->{items}) - 1];"),
                ]),
            MethodDescription::public("contains")
                .param(ParamDescription::new(&arg, &item_class))
                .returns("bool")
                .body([
                    format!("foreach ($this->{items} as $existingItem) {{"),
                    format!("    if ($existingItem->equals(${arg})) {{"),
                    "        return true;".to_string(),
                    "    }".to_string(),
                    "}".to_string(),
                    "return false;".to_string(),
                ]),
            MethodDescription::public("filter")
                .param(ParamDescription::new("filter", "callable"))
                .returns("self")
                .body([
                    format!("return new self(...array_values(array_filter($this->{items}, static function ($v) use ($filter) {{"),
                    "    return $filter($v);".to_string(),
                    "})));".to_string(),
                ]),
            MethodDescription::public("items")
                .returns("array")
                .returns_doc(format!("{item_class}[]"))
                .body([format!("return $this->{items};")]),
            MethodDescription::public("toArray")
                .returns("array")
                .body([
                    format!("return array_map(static function ({item_class} ${arg}) {{"),
                    format!("    return ${arg}->{to_raw}();"),
                    format!("}}, $this->{items});"),
                ]),
        ];
        for method in methods {
            class.add_method(method);
        }

        let mut equals = method_equals_with("$this->toArray() === $other->toArray()");
        equals.params[0].doc_hint = Some("mixed".into());
        class.add_method(equals);
        class
    }
}

/// Exactly one items set holding exactly one type; references resolve one hop.
pub fn determine_item_type(name: &str, items: &[TypeSet]) -> Result<ItemType> {
    let [set] = items else {
        return Err(GenerateError::AmbiguousTypeSet { name: name.to_string(), count: items.len() });
    };
    if set.len() != 1 {
        return Err(GenerateError::AmbiguousTypeSet { name: name.to_string(), count: set.len() });
    }

    let mut item = set.first();
    let mut source_name = item.name().to_string();
    if let TypeDefinition::Reference(reference) = item {
        let resolved = reference
            .resolved
            .as_ref()
            .ok_or_else(|| GenerateError::UnresolvedReference { pointer: reference.pointer.clone() })?;
        if resolved.len() != 1 {
            return Err(GenerateError::AmbiguousTypeSet { name: name.to_string(), count: resolved.len() });
        }
        item = resolved.first();
        source_name = name_or(item.name(), reference.target_name()).to_string();
    }

    let conversion = match item {
        TypeDefinition::Object(_) => Conversion::ARRAY,
        TypeDefinition::String(_) => Conversion::STRING,
        TypeDefinition::Integer(_) => Conversion::INT,
        TypeDefinition::Number(_) => Conversion::FLOAT,
        TypeDefinition::Boolean(_) => Conversion::BOOL,
        TypeDefinition::Array(_) | TypeDefinition::Reference(_) => {
            return Err(GenerateError::unsupported(
                item.kind_name(),
                name,
                "only scalar, object and reference items are supported",
            ));
        }
    };
    if source_name.is_empty() {
        source_name = "item".to_string();
    }
    Ok(ItemType { source_name, conversion })
}
