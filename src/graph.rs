//! Recursive walk from a schema type graph to class descriptions.
//!
//! Objects become entity classes with one typed property per schema property.
//! Scalars, enums and arrays become value objects through the
//! [`ValueObjectDispatcher`]. References are followed one hop and build the
//! referenced type under its own name. Every class lands in the collection
//! exactly once per fully-qualified name.
use crate::error::{GenerateError, Result};
use crate::ir::{TypeDefinition, TypeSet};
use crate::model::{
    ClassDescription, ClassDescriptionCollection, ClassKind, MethodDescription, ParamDescription, PropertyDescription,
    qualify, split_fqcn,
};
use crate::naming::SharedFilters;
use crate::value_object::ValueObjectDispatcher;
use crate::value_object::array::determine_item_type;

pub struct ClassGraphBuilder {
    dispatcher: ValueObjectDispatcher,
    filters: SharedFilters,
}

impl ClassGraphBuilder {
    pub fn new(dispatcher: ValueObjectDispatcher) -> Self {
        let filters = dispatcher.filters().clone();
        Self { dispatcher, filters }
    }

    /// Populate `target` from `type_set` and add it, plus every class it
    /// depends on, to `collection`. `namespace` is the ambient namespace
    /// custom namespace segments are appended to.
    pub fn generate_classes(
        &self,
        mut target: ClassDescription,
        collection: &mut ClassDescriptionCollection,
        type_set: &TypeSet,
        namespace: &str,
        name_override: Option<&str>,
    ) -> Result<()> {
        let ty = resolve_first(type_set)?;
        let class_name = name_override.unwrap_or(&target.name).to_string();

        match ty {
            TypeDefinition::Object(object) => {
                for (property_name, property_set) in &object.properties {
                    let property_type = first(property_set);
                    let property_name = property_name.as_str();
                    let class = self.property_class(property_name, property_type, collection, namespace)?;
                    target.add_import(&class);
                    let (_, short_name) = split_fqcn(&class);
                    let type_hint = property_type_hint(short_name, property_type);
                    target.add_property(
                        PropertyDescription::private(self.filters.property_name(property_name), type_hint)
                            .with_source_name(property_name),
                    );
                }
                // a rebuilt entity keeps the raw conversion an earlier array gave it
                if let Some(previous) = collection.get(&target.fqcn()) {
                    for name in ["fromArray", "toArray"] {
                        if let Some(method) = previous.methods.get(name) {
                            target.add_method(method.clone());
                        }
                    }
                }
                tracing::debug!(class = %target.fqcn(), properties = target.properties.len(), "generated class");
                collection.add(target);
            }
            TypeDefinition::Array(array) => {
                let item = determine_item_type(name_or(array.meta.name.as_str(), &class_name), &array.items)?;
                let item_set = &array.items[0];
                let item_type = resolve_first(item_set)?;
                let item_namespace = extract_namespace(namespace, item_type);
                let item_class = self.filters.class_name(&item.source_name);
                self.generate_classes(
                    ClassDescription::entity(item_class.clone(), item_namespace.clone()),
                    collection,
                    item_set,
                    namespace,
                    Some(&item.source_name),
                )?;
                if item.is_object() {
                    self.add_array_conversion(collection, &qualify(&item_namespace, &item_class))?;
                }

                let mut wrapper = self.dispatcher.generate_value_object(
                    &self.filters.class_name(&class_name),
                    &extract_namespace(namespace, ty),
                    ty,
                )?;
                wrapper.add_import(&qualify(&item_namespace, &item_class));
                collection.add(wrapper);
            }
            TypeDefinition::String(_) | TypeDefinition::Integer(_) | TypeDefinition::Number(_) | TypeDefinition::Boolean(_) => {
                let value_object = self.dispatcher.generate_value_object(
                    &self.filters.class_name(&class_name),
                    &extract_namespace(namespace, ty),
                    ty,
                )?;
                collection.add(value_object);
            }
            TypeDefinition::Reference(reference) => {
                // resolve_first never yields a reference
                return Err(GenerateError::UnresolvedReference { pointer: reference.pointer.clone() });
            }
        }
        Ok(())
    }

    /// Give an entity `fromArray`/`toArray` over its raw schema keys so a
    /// collection wrapper can map it. Entity properties get the same pair.
    fn add_array_conversion(&self, collection: &mut ClassDescriptionCollection, fqcn: &str) -> Result<()> {
        let Some(class) = collection.get(fqcn) else {
            return Ok(());
        };
        if class.kind != ClassKind::Entity || class.has_method("fromArray") {
            return Ok(());
        }

        let mut from_body = vec!["$instance = new self();".to_string()];
        let mut to_body = vec!["return [".to_string()];
        let mut nested = Vec::new();
        for property in class.properties.values() {
            let short_name = property.type_hint.trim_start_matches('?');
            let property_fqcn = imported_or_local(class, short_name);
            let property_class = collection.get(&property_fqcn);
            let conversion = property_class.and_then(|c| c.kind.conversion()).ok_or_else(|| {
                GenerateError::unsupported("property", property_fqcn.clone(), "class has no raw array conversion")
            })?;
            if property_class.is_some_and(|c| c.kind == ClassKind::Entity) {
                nested.push(property_fqcn);
            }

            let (name, key) = (&property.name, php_key(property.raw_key()));
            if property.is_nullable() {
                from_body.push(format!(
                    "$instance->{name} = isset($data[{key}]) ? {short_name}::{}($data[{key}]) : null;",
                    conversion.from
                ));
                to_body.push(format!("    {key} => $this->{name}?->{}(),", conversion.to));
            } else {
                from_body.push(format!("$instance->{name} = {short_name}::{}($data[{key}]);", conversion.from));
                to_body.push(format!("    {key} => $this->{name}->{}(),", conversion.to));
            }
        }
        from_body.push("return $instance;".to_string());
        to_body.push("];".to_string());

        if let Some(class) = collection.get_mut(fqcn) {
            class.add_method(
                MethodDescription::named_constructor("fromArray")
                    .param(ParamDescription::new("data", "array"))
                    .body(from_body),
            );
            class.add_method(MethodDescription::public("toArray").returns("array").body(to_body));
        }
        for nested in nested {
            self.add_array_conversion(collection, &nested)?;
        }
        Ok(())
    }

    /// Build the class backing one object property and return its FQCN.
    fn property_class(
        &self,
        property_name: &str,
        property_type: &TypeDefinition,
        collection: &mut ClassDescriptionCollection,
        namespace: &str,
    ) -> Result<String> {
        let property_class = self.filters.class_name(property_name);
        let property_namespace = extract_namespace(namespace, property_type);

        match property_type {
            TypeDefinition::Object(_) | TypeDefinition::Array(_) => {
                self.generate_classes(
                    ClassDescription::entity(property_class.clone(), property_namespace.clone()),
                    collection,
                    &TypeSet::single(property_type.clone()),
                    namespace,
                    Some(property_name),
                )?;
                Ok(qualify(&property_namespace, &property_class))
            }
            TypeDefinition::Reference(reference) => {
                let resolved = reference
                    .resolved
                    .as_ref()
                    .ok_or_else(|| GenerateError::UnresolvedReference { pointer: reference.pointer.clone() })?;
                let resolved_type = first(resolved);
                let source_name = name_or(resolved_type.name(), reference.target_name()).to_string();
                let resolved_class = self.filters.class_name(&source_name);
                let resolved_namespace = extract_namespace(namespace, resolved_type);
                self.generate_classes(
                    ClassDescription::entity(resolved_class.clone(), resolved_namespace.clone()),
                    collection,
                    resolved,
                    namespace,
                    Some(&source_name),
                )?;
                Ok(qualify(&resolved_namespace, &resolved_class))
            }
            TypeDefinition::String(_) | TypeDefinition::Integer(_) | TypeDefinition::Number(_) | TypeDefinition::Boolean(_) => {
                let value_object =
                    self.dispatcher
                        .generate_value_object(&property_class, &property_namespace, property_type)?;
                let fqcn = value_object.fqcn();
                collection.add(value_object);
                Ok(fqcn)
            }
        }
    }
}

/// `<ambient>\<custom>` when the type carries a custom namespace segment.
pub fn extract_namespace(namespace: &str, ty: &TypeDefinition) -> String {
    match ty.custom_namespace() {
        Some(custom) => format!("{}\\{}", namespace.trim_matches('\\'), custom.trim_matches('\\'))
            .trim_matches('\\')
            .to_string(),
        None => namespace.trim_matches('\\').to_string(),
    }
}

/// `?Class` when the property is optional or nullable.
pub fn property_type_hint(class_name: &str, ty: &TypeDefinition) -> String {
    if !ty.is_required() || ty.is_nullable() {
        format!("?{class_name}")
    } else {
        class_name.to_string()
    }
}

fn first(set: &TypeSet) -> &TypeDefinition {
    if set.len() > 1 {
        tracing::warn!(
            name = set.first().name(),
            alternatives = set.len(),
            "only the first type of a union is generated"
        );
    }
    set.first()
}

/// First type of the set, following one reference hop.
fn resolve_first(set: &TypeSet) -> Result<&TypeDefinition> {
    match first(set) {
        TypeDefinition::Reference(reference) => {
            let resolved = reference
                .resolved
                .as_ref()
                .ok_or_else(|| GenerateError::UnresolvedReference { pointer: reference.pointer.clone() })?;
            match first(resolved) {
                TypeDefinition::Reference(inner) => Err(GenerateError::unsupported(
                    "reference",
                    inner.pointer.clone(),
                    "reference chains longer than one hop are not followed",
                )),
                ty => Ok(ty),
            }
        }
        ty => Ok(ty),
    }
}

/// FQCN of a class referenced by short name from `class`.
fn imported_or_local(class: &ClassDescription, short_name: &str) -> String {
    class
        .namespace_imports
        .iter()
        .find(|import| split_fqcn(import).1 == short_name)
        .cloned()
        .unwrap_or_else(|| qualify(&class.namespace, short_name))
}

/// Single-quoted array key.
fn php_key(key: &str) -> String {
    format!("'{}'", key.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn name_or<'a>(name: &'a str, default: &'a str) -> &'a str {
    if name.is_empty() { default } else { name }
}
