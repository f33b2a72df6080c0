//! Lowers a JSON Schema document into the typed model in [`crate::ir`].
//!
//! Only the keywords the class generator understands are read: `type`,
//! `properties`, `required`, `items`, `enum`, `format`, `$ref`, `title` and
//! the custom `namespace` / `ns` keyword. Everything else is ignored.
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{GenerateError, Result};
use crate::ir::{ArrayType, Meta, ObjectType, ReferenceType, ScalarType, StringType, TypeDefinition, TypeSet};

/// Parse `root` into a type set named `name`. The root is always required.
pub fn parse_schema(root: &Value, name: &str) -> Result<TypeSet> {
    let mut lowering = Lowering {
        root,
        resolved: HashMap::new(),
        in_progress: HashSet::new(),
    };
    let set = lowering.lower(root, "", name)?;
    Ok(with_required(set, true))
}

struct Lowering<'a> {
    root: &'a Value,
    resolved: HashMap<String, Option<TypeSet>>,
    in_progress: HashSet<String>,
}

impl<'a> Lowering<'a> {
    fn lower(&mut self, node: &Value, pointer: &str, name: &str) -> Result<TypeSet> {
        let Some(obj) = node.as_object() else {
            return Err(GenerateError::invalid_schema(display_pointer(pointer), "schema node must be an object"));
        };

        let meta = Meta {
            name: name.to_string(),
            required: false,
            nullable: false,
            namespace: obj
                .get("namespace")
                .or_else(|| obj.get("ns"))
                .and_then(Value::as_str)
                .map(str::to_string),
        };

        if let Some(target) = obj.get("$ref") {
            let target = target
                .as_str()
                .ok_or_else(|| GenerateError::invalid_schema(display_pointer(pointer), "`$ref` must be a string"))?;
            let resolved = self.resolve(target)?;
            return Ok(TypeSet::single(TypeDefinition::Reference(ReferenceType {
                meta,
                pointer: target.to_string(),
                resolved,
            })));
        }

        let (kinds, nullable) = declared_types(obj, pointer)?;
        let mut definitions = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let mut meta = meta.clone();
            meta.nullable = nullable;
            let definition = match kind.as_str() {
                "object" => TypeDefinition::Object(self.lower_object(obj, pointer, meta)?),
                "array" => TypeDefinition::Array(self.lower_array(obj, pointer, meta)?),
                "string" => TypeDefinition::String(lower_string(obj, pointer, meta)?),
                "integer" => TypeDefinition::Integer(ScalarType { meta }),
                "number" => TypeDefinition::Number(ScalarType { meta }),
                "boolean" => TypeDefinition::Boolean(ScalarType { meta }),
                other => {
                    return Err(GenerateError::invalid_schema(
                        display_pointer(pointer),
                        format!("unsupported type `{other}`"),
                    ));
                }
            };
            definitions.push(definition);
        }

        TypeSet::from_vec(definitions)
            .ok_or_else(|| GenerateError::invalid_schema(display_pointer(pointer), "no usable type"))
    }

    fn lower_object(&mut self, obj: &Map<String, Value>, pointer: &str, meta: Meta) -> Result<ObjectType> {
        let required: HashSet<&str> = match obj.get("required") {
            None => HashSet::new(),
            Some(Value::Array(xs)) => xs.iter().filter_map(Value::as_str).collect(),
            Some(_) => {
                return Err(GenerateError::invalid_schema(display_pointer(pointer), "`required` must be an array"));
            }
        };

        let mut properties = IndexMap::new();
        match obj.get("properties") {
            None => {}
            Some(Value::Object(props)) => {
                for (key, schema) in props {
                    let child = format!("{pointer}/properties/{}", escape_token(key));
                    let set = self.lower(schema, &child, key)?;
                    properties.insert(key.clone(), with_required(set, required.contains(key.as_str())));
                }
            }
            Some(_) => {
                return Err(GenerateError::invalid_schema(display_pointer(pointer), "`properties` must be an object"));
            }
        }

        Ok(ObjectType { meta, properties })
    }

    fn lower_array(&mut self, obj: &Map<String, Value>, pointer: &str, meta: Meta) -> Result<ArrayType> {
        let items = match obj.get("items") {
            Some(item @ Value::Object(_)) => {
                let name = item_name(item, &meta.name);
                vec![self.lower(item, &format!("{pointer}/items"), &name)?]
            }
            Some(Value::Array(xs)) if !xs.is_empty() => {
                let mut sets = Vec::with_capacity(xs.len());
                for (ix, item) in xs.iter().enumerate() {
                    let name = item_name(item, &meta.name);
                    sets.push(self.lower(item, &format!("{pointer}/items/{ix}"), &name)?);
                }
                sets
            }
            _ => {
                return Err(GenerateError::invalid_schema(
                    display_pointer(pointer),
                    "arrays need an `items` schema",
                ));
            }
        };
        Ok(ArrayType { meta, items })
    }

    /// Resolve a local pointer once. Cycles and foreign documents stay unresolved.
    fn resolve(&mut self, target: &str) -> Result<Option<TypeSet>> {
        let Some(local) = target.strip_prefix('#') else {
            tracing::warn!(pointer = target, "only local references are resolved");
            return Ok(None);
        };
        if let Some(hit) = self.resolved.get(target) {
            return Ok(hit.clone());
        }
        if self.in_progress.contains(target) {
            tracing::warn!(pointer = target, "recursive reference left unresolved");
            return Ok(None);
        }
        let Some(node) = self.root.pointer(local) else {
            self.resolved.insert(target.to_string(), None);
            return Ok(None);
        };

        let name = local.rsplit('/').next().unwrap_or_default().replace("~1", "/").replace("~0", "~");
        self.in_progress.insert(target.to_string());
        let lowered = self.lower(node, local, &name);
        self.in_progress.remove(target);
        let set = lowered?;
        self.resolved.insert(target.to_string(), Some(set.clone()));
        Ok(Some(set))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Declared kinds without `null`, plus whether `null` was among them.
fn declared_types(obj: &Map<String, Value>, pointer: &str) -> Result<(Vec<String>, bool)> {
    let kinds: Vec<String> = match obj.get("type") {
        Some(Value::String(kind)) => vec![kind.clone()],
        Some(Value::Array(kinds)) => {
            let mut out = Vec::with_capacity(kinds.len());
            for kind in kinds {
                let kind = kind.as_str().ok_or_else(|| {
                    GenerateError::invalid_schema(display_pointer(pointer), "`type` entries must be strings")
                })?;
                out.push(kind.to_string());
            }
            out
        }
        Some(_) => {
            return Err(GenerateError::invalid_schema(display_pointer(pointer), "`type` must be a string or array"));
        }
        None if obj.contains_key("properties") => vec!["object".into()],
        None if obj.contains_key("items") => vec!["array".into()],
        None if obj.contains_key("enum") => vec!["string".into()],
        None => {
            return Err(GenerateError::invalid_schema(display_pointer(pointer), "missing `type`"));
        }
    };
    let nullable = kinds.iter().any(|k| k == "null");
    let kinds: Vec<String> = kinds.into_iter().filter(|k| k != "null").collect();
    if kinds.is_empty() {
        return Err(GenerateError::invalid_schema(display_pointer(pointer), "a null-only type has no class"));
    }
    Ok((kinds, nullable))
}

fn lower_string(obj: &Map<String, Value>, pointer: &str, meta: Meta) -> Result<StringType> {
    let format = obj.get("format").and_then(Value::as_str).map(str::to_string);
    let enum_ = match obj.get("enum") {
        None => None,
        Some(Value::Array(values)) => {
            let mut out = Vec::with_capacity(values.len());
            for value in values {
                match value {
                    Value::String(s) => out.push(s.clone()),
                    Value::Null => {} // covered by nullability
                    other => {
                        return Err(GenerateError::invalid_schema(
                            display_pointer(pointer),
                            format!("enum values must be strings, got {other}"),
                        ));
                    }
                }
            }
            Some(out)
        }
        Some(_) => {
            return Err(GenerateError::invalid_schema(display_pointer(pointer), "`enum` must be an array"));
        }
    };
    Ok(StringType { meta, format, enum_ })
}

fn item_name(item: &Value, array_name: &str) -> String {
    if let Some(title) = item.get("title").and_then(Value::as_str) {
        return title.to_string();
    }
    if array_name.is_empty() {
        String::new()
    } else {
        format!("{array_name}_item")
    }
}

fn with_required(set: TypeSet, required: bool) -> TypeSet {
    let definitions = set
        .iter()
        .cloned()
        .map(|mut def| {
            def.meta_mut().required = required;
            def
        })
        .collect();
    TypeSet::from_vec(definitions).unwrap_or(set)
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn display_pointer(pointer: &str) -> String {
    if pointer.is_empty() { "/".to_string() } else { pointer.to_string() }
}
