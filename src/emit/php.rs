//! PHP printer for the class model.
//!
//! The layout is fixed: one class per file, members in declaration order
//! (constants, properties, methods), four-space indentation and docblocks
//! only where a type cannot be expressed natively.
use std::fmt::Write as _;

use crate::error::Result;
use crate::model::{
    ClassDescription, ClassDescriptionCollection, ConstValue, ConstantDescription, MethodDescription,
    PropertyDescription, split_fqcn,
};

use super::{CodeEmitter, ExistingSource, PreservedMember, RenderedFiles, SourceLayout};

pub const CUSTOM_START: &str = "// @custom-start";
pub const CUSTOM_END: &str = "// @custom-end";

const INDENT: &str = "    ";

pub struct PhpEmitter {
    layout: SourceLayout,
    existing: Option<Box<dyn ExistingSource>>,
}

impl PhpEmitter {
    pub fn new(layout: SourceLayout) -> Self {
        Self { layout, existing: None }
    }

    pub fn with_existing_source(mut self, existing: impl ExistingSource + 'static) -> Self {
        self.existing = Some(Box::new(existing));
        self
    }
}

impl CodeEmitter for PhpEmitter {
    fn render(&self, collection: &ClassDescriptionCollection) -> Result<RenderedFiles> {
        let mut files = RenderedFiles::new();
        for class in collection.iter() {
            let path = self.layout.path_for(class);
            let preserved = match &self.existing {
                Some(existing) => existing.existing_members(class, &path)?.unwrap_or_default(),
                None => Vec::new(),
            };
            tracing::debug!(class = %class.fqcn(), path = %path.display(), preserved = preserved.len(), "rendering");
            files.insert(path, render_class(class, &preserved));
        }
        Ok(files)
    }
}

/// Complete file text for one class.
pub fn render_class(class: &ClassDescription, preserved: &[PreservedMember]) -> String {
    let mut out = String::from("<?php\n\n");
    if class.is_strict {
        out.push_str("declare (strict_types=1);\n");
    }
    if !class.namespace.is_empty() {
        let _ = writeln!(out, "namespace {};", class.namespace);
    }
    if class.is_strict || !class.namespace.is_empty() {
        out.push('\n');
    }
    for import in &class.namespace_imports {
        let (namespace, _) = split_fqcn(import);
        if namespace != class.namespace {
            let _ = writeln!(out, "use {import};");
        }
    }

    if class.is_final {
        out.push_str("final ");
    }
    let _ = write!(out, "class {}", class.name);
    if let Some(parent) = &class.extends {
        let _ = write!(out, " extends {parent}");
    }
    if !class.implements.is_empty() {
        let _ = write!(out, " implements {}", class.implements.join(", "));
    }
    out.push_str("\n{\n");

    for constant in class.constants.values() {
        render_constant(&mut out, constant);
    }
    for property in class.properties.values() {
        render_property(&mut out, property, class.typed);
    }
    for method in class.methods.values() {
        render_method(&mut out, method, class.typed);
    }

    let kept: Vec<_> = preserved.iter().filter(|m| !declares(class, &m.name)).collect();
    if !kept.is_empty() {
        let _ = writeln!(out, "{INDENT}{CUSTOM_START}");
        for member in kept {
            out.push_str(member.source.trim_end_matches('\n'));
            out.push('\n');
        }
        let _ = writeln!(out, "{INDENT}{CUSTOM_END}");
    }

    out.push_str("}\n");
    out
}

fn declares(class: &ClassDescription, name: &str) -> bool {
    class.methods.contains_key(name) || class.properties.contains_key(name) || class.constants.contains_key(name)
}

fn render_constant(out: &mut String, constant: &ConstantDescription) {
    let value = match &constant.value {
        ConstValue::String(s) => quote(s),
        ConstValue::SelfList(names) => {
            let refs: Vec<_> = names.iter().map(|n| format!("self::{n}")).collect();
            format!("[{}]", refs.join(", "))
        }
        ConstValue::Raw(raw) => raw.clone(),
    };
    let _ = writeln!(out, "{INDENT}{} const {} = {value};", constant.visibility.keyword(), constant.name);
}

fn render_property(out: &mut String, property: &PropertyDescription, typed: bool) {
    let doc = match (&property.doc_hint, typed) {
        (Some(hint), _) => Some(hint.as_str()),
        (None, false) => Some(property.type_hint.as_str()),
        (None, true) => None,
    };
    if let Some(doc) = doc {
        render_docblock(out, &[format!("@var {doc}")]);
    }
    let _ = write!(out, "{INDENT}{} ", property.visibility.keyword());
    if typed {
        let _ = write!(out, "{} ", property.type_hint);
    }
    let _ = write!(out, "${}", property.name);
    if let Some(default) = &property.default {
        let _ = write!(out, " = {default}");
    }
    out.push_str(";\n");
}

fn render_method(out: &mut String, method: &MethodDescription, typed: bool) {
    let mut doc = Vec::new();
    for param in &method.params {
        let hint = param.doc_hint.as_ref().or(if typed { None } else { param.type_hint.as_ref() });
        if let Some(hint) = hint {
            let dots = if param.variadic { "..." } else { "" };
            doc.push(format!("@param {hint} {dots}${}", param.name));
        }
    }
    let return_doc = method
        .return_doc_hint
        .as_ref()
        .or(if typed && doc.is_empty() { None } else { method.return_type.as_ref() });
    if let Some(hint) = return_doc {
        doc.push(format!("@return {hint}"));
    }
    if !doc.is_empty() {
        render_docblock(out, &doc);
    }

    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| {
            let mut param = String::new();
            if let (true, Some(hint)) = (typed, &p.type_hint) {
                param.push_str(hint);
                param.push(' ');
            }
            if p.variadic {
                param.push_str("...");
            }
            param.push('$');
            param.push_str(&p.name);
            param
        })
        .collect();

    let _ = write!(out, "{INDENT}{} ", method.visibility.keyword());
    if method.is_static {
        out.push_str("static ");
    }
    let _ = write!(out, "function {}({})", method.name, params.join(", "));
    if let (true, Some(return_type)) = (typed, &method.return_type) {
        let _ = write!(out, " : {return_type}");
    }
    let _ = writeln!(out, "\n{INDENT}{{");
    for line in &method.body {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "{INDENT}{INDENT}{line}");
        }
    }
    let _ = writeln!(out, "{INDENT}}}");
}

fn render_docblock(out: &mut String, lines: &[String]) {
    let _ = writeln!(out, "{INDENT}/**");
    for line in lines {
        let _ = writeln!(out, "{INDENT} * {line}");
    }
    let _ = writeln!(out, "{INDENT} */");
}

/// Single-quoted PHP string literal.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodDescription, ParamDescription, Visibility};

    fn order() -> ClassDescription {
        let mut class = ClassDescription::entity("Order", "Acme");
        class.add_import("Acme\\Address");
        class.add_import("Acme\\Geo\\City");
        class.add_constant("BILLING_ADDRESS", ConstValue::String("billing_address".into()), Visibility::Public);
        class.add_property(PropertyDescription::private("billingAddress", "Address"));
        class.add_property(PropertyDescription::private("city", "?City"));
        class.add_method(
            MethodDescription::public("billingAddress")
                .returns("Address")
                .body(["return $this->billingAddress;"]),
        );
        class
    }

    #[test]
    fn renders_a_complete_file() {
        let expected = "<?php

declare (strict_types=1);
namespace Acme;

use Acme\\Geo\\City;
final class Order
{
    public const BILLING_ADDRESS = 'billing_address';
    private Address $billingAddress;
    private ?City $city;
    public function billingAddress() : Address
    {
        return $this->billingAddress;
    }
}
";
        assert_eq!(render_class(&order(), &[]), expected);
    }

    #[test]
    fn doc_hints_become_docblocks() {
        let mut class = ClassDescription::entity("Tags", "Acme");
        class.implements = vec!["\\Iterator".into(), "\\Countable".into()];
        class.add_property(PropertyDescription::private("position", "int").with_default("0"));
        class.add_property(PropertyDescription::private("tags", "array").with_doc_hint("Tag[]"));
        class.add_method(
            MethodDescription::named_constructor("fromItems")
                .param(ParamDescription::new("tags", "Tag").variadic())
                .body(["return new self(...$tags);"]),
        );
        class.add_method(
            MethodDescription::public("equals")
                .param(ParamDescription::untyped("other").with_doc_hint("mixed"))
                .returns("bool")
                .body(["return false;"]),
        );
        let source = render_class(&class, &[]);
        assert!(source.contains("final class Tags implements \\Iterator, \\Countable\n{"));
        assert!(source.contains("    private int $position = 0;\n"));
        assert!(source.contains("    /**\n     * @var Tag[]\n     */\n    private array $tags;\n"));
        assert!(source.contains("    public static function fromItems(Tag ...$tags) : self\n"));
        assert!(source.contains("     * @param mixed $other\n     * @return bool\n"));
    }

    #[test]
    fn untyped_classes_move_types_into_docblocks() {
        let mut class = order();
        class.typed = false;
        let source = render_class(&class, &[]);
        assert!(source.contains("     * @var Address\n     */\n    private $billingAddress;\n"));
        assert!(source.contains("     * @return Address\n     */\n    public function billingAddress()\n"));
    }

    #[test]
    fn constant_lists_and_escaping() {
        let mut class = ClassDescription::entity("When", "");
        class.is_strict = false;
        class.add_constant("CHOICES", ConstValue::SelfList(vec!["A".into(), "B".into()]), Visibility::Public);
        class.add_constant("OUTPUT_FORMAT", ConstValue::String("Y-m-d\\TH:i".into()), Visibility::Private);
        class.add_constant("ATOM", ConstValue::Raw("DATE_ATOM".into()), Visibility::Private);
        class.add_constant("QUOTE", ConstValue::String("it's".into()), Visibility::Private);
        let source = render_class(&class, &[]);
        assert!(source.starts_with("<?php\n\nfinal class When\n{\n"));
        assert!(source.contains("public const CHOICES = [self::A, self::B];"));
        assert!(source.contains("private const OUTPUT_FORMAT = 'Y-m-d\\\\TH:i';"));
        assert!(source.contains("private const ATOM = DATE_ATOM;"));
        assert!(source.contains("private const QUOTE = 'it\\'s';"));
    }

    #[test]
    fn preserved_members_are_fenced_and_never_shadow_generated_ones() {
        let preserved = vec![
            PreservedMember { name: "billingAddress".into(), source: "    public function billingAddress() {}\n".into() },
            PreservedMember { name: "total".into(), source: "    public function total() : int\n    {\n        return 1;\n    }\n".into() },
        ];
        let source = render_class(&order(), &preserved);
        assert_eq!(source.matches("function billingAddress").count(), 1);
        assert!(source.contains("    // @custom-start\n    public function total() : int\n"));
        assert!(source.ends_with("    }\n    // @custom-end\n}\n"));
    }

    #[test]
    fn emitter_maps_classes_to_paths_and_consults_the_hook() {
        let mut collection = ClassDescriptionCollection::new();
        collection.add(order());
        collection.add(ClassDescription::entity("City", "Acme\\Geo"));
        let emitter = PhpEmitter::new(SourceLayout::new("src", "Acme")).with_existing_source(
            |class: &ClassDescription, _: &std::path::Path| {
                (class.name == "City").then(|| vec![PreservedMember { name: "zip".into(), source: "    private $zip;".into() }])
            },
        );
        let files = emitter.render(&collection).unwrap();
        let paths: Vec<_> = files.keys().cloned().collect();
        assert_eq!(paths, [std::path::PathBuf::from("src/Order.php"), std::path::PathBuf::from("src/Geo/City.php")]);
        assert!(files[&std::path::PathBuf::from("src/Geo/City.php")].contains("    private $zip;\n"));
        assert!(!files[&std::path::PathBuf::from("src/Order.php")].contains(CUSTOM_START));
    }
}
