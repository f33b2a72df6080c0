//! One generation run: schema → class collection → rendered files.
use std::sync::Arc;

use serde_json::Value;

use crate::config::GeneratorConfig;
use crate::emit::{CodeEmitter, PhpEmitter, RenderedFiles, SourceLayout};
use crate::error::Result;
use crate::exception::ExceptionCodeFactory;
use crate::graph::{ClassGraphBuilder, extract_namespace};
use crate::lower::parse_schema;
use crate::model::{ClassDescription, ClassDescriptionCollection, ClassKind, ValueObjectKind};
use crate::naming::{ConventionalNames, SharedFilters};
use crate::post_process::{add_class_constants_for_properties, add_getter_methods};
use crate::value_object::ValueObjectDispatcher;

pub struct Generator {
    config: GeneratorConfig,
    filters: SharedFilters,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_filters(config, Arc::new(ConventionalNames))
    }

    pub fn with_filters(config: GeneratorConfig, filters: SharedFilters) -> Self {
        Self { config, filters }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build every class for `schema`, with `root_name` naming the top-level type.
    pub fn generate(&self, schema: &Value, root_name: &str) -> Result<ClassDescriptionCollection> {
        let type_set = parse_schema(schema, root_name)?;

        let mut dispatcher = ValueObjectDispatcher::new(self.filters.clone(), self.config.typed);
        if let Some(format) = &self.config.date_time_format {
            dispatcher = dispatcher.with_date_time_format(format.clone());
        }
        let builder = ClassGraphBuilder::new(dispatcher);

        let namespace = self.config.namespace.trim_matches('\\');
        let root = ClassDescription::entity(
            self.filters.class_name(root_name),
            extract_namespace(namespace, type_set.first()),
        );
        let mut collection = ClassDescriptionCollection::new();
        builder.generate_classes(root, &mut collection, &type_set, namespace, None)?;

        for class in collection.iter_mut() {
            class.typed = self.config.typed;
        }
        if self.config.getters {
            add_getter_methods(&mut collection, self.filters.as_ref(), self.config.typed);
        }
        if self.config.constants {
            add_class_constants_for_properties(&mut collection, self.filters.as_ref());
        }
        if self.config.exceptions {
            let factory = ExceptionCodeFactory::new(self.filters.clone(), self.config.typed);
            let exceptions = collection
                .iter()
                .filter(|c| matches!(c.kind, ClassKind::ValueObject(ValueObjectKind::Enum { .. })))
                .map(|c| factory.class_description_for_enum(c))
                .collect::<Result<Vec<_>>>()?;
            collection.extend(exceptions);
        }

        tracing::info!(root = root_name, classes = collection.len(), "generated class model");
        Ok(collection)
    }

    /// PHP emitter laid out per the configured namespace and source root.
    pub fn emitter(&self) -> PhpEmitter {
        PhpEmitter::new(SourceLayout::new(&self.config.src_root, &self.config.namespace))
    }

    pub fn render(&self, collection: &ClassDescriptionCollection, emitter: &dyn CodeEmitter) -> Result<RenderedFiles> {
        emitter.render(collection)
    }
}
