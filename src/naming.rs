//! Naming policy for generated code.
//!
//! The graph builder and the factories never hardcode a casing rule; every
//! class, property, method and constant name goes through a [`NameFilters`]
//! implementation injected at construction.
use std::sync::Arc;

use convert_case::{Case, Casing};

/// Pure, total string transforms applied to raw schema names.
pub trait NameFilters: Send + Sync {
    fn class_name(&self, raw: &str) -> String;
    fn property_name(&self, raw: &str) -> String;
    fn method_name(&self, raw: &str) -> String;
    fn const_name(&self, raw: &str) -> String;
    fn const_value(&self, raw: &str) -> String;
}

pub type SharedFilters = Arc<dyn NameFilters>;

/// `PascalCase` classes, `camelCase` members, `UPPER_SNAKE` constant names
/// and `snake_case` constant values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalNames;

impl NameFilters for ConventionalNames {
    fn class_name(&self, raw: &str) -> String {
        sanitize(raw).to_case(Case::Pascal)
    }
    fn property_name(&self, raw: &str) -> String {
        sanitize(raw).to_case(Case::Camel)
    }
    fn method_name(&self, raw: &str) -> String {
        sanitize(raw).to_case(Case::Camel)
    }
    fn const_name(&self, raw: &str) -> String {
        sanitize(raw).to_case(Case::UpperSnake)
    }
    fn const_value(&self, raw: &str) -> String {
        sanitize(raw).to_case(Case::Snake)
    }
}

type Filter = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Filters backed by closures. Unset slots fall back to [`ConventionalNames`].
#[derive(Default)]
pub struct FnNameFilters {
    class_name: Option<Filter>,
    property_name: Option<Filter>,
    method_name: Option<Filter>,
    const_name: Option<Filter>,
    const_value: Option<Filter>,
}

impl FnNameFilters {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_class_name(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.class_name = Some(Box::new(f));
        self
    }
    pub fn with_property_name(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.property_name = Some(Box::new(f));
        self
    }
    pub fn with_method_name(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.method_name = Some(Box::new(f));
        self
    }
    pub fn with_const_name(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.const_name = Some(Box::new(f));
        self
    }
    pub fn with_const_value(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.const_value = Some(Box::new(f));
        self
    }
}

impl NameFilters for FnNameFilters {
    fn class_name(&self, raw: &str) -> String {
        self.class_name.as_ref().map_or_else(|| ConventionalNames.class_name(raw), |f| f(raw))
    }
    fn property_name(&self, raw: &str) -> String {
        self.property_name.as_ref().map_or_else(|| ConventionalNames.property_name(raw), |f| f(raw))
    }
    fn method_name(&self, raw: &str) -> String {
        self.method_name.as_ref().map_or_else(|| ConventionalNames.method_name(raw), |f| f(raw))
    }
    fn const_name(&self, raw: &str) -> String {
        self.const_name.as_ref().map_or_else(|| ConventionalNames.const_name(raw), |f| f(raw))
    }
    fn const_value(&self, raw: &str) -> String {
        self.const_value.as_ref().map_or_else(|| ConventionalNames.const_value(raw), |f| f(raw))
    }
}

impl std::fmt::Debug for FnNameFilters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnNameFilters")
            .field("class_name", &self.class_name.is_some())
            .field("property_name", &self.property_name.is_some())
            .field("method_name", &self.method_name.is_some())
            .field("const_name", &self.const_name.is_some())
            .field("const_value", &self.const_value.is_some())
            .finish()
    }
}

/// Identifier characters only; everything else becomes a word break.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}
