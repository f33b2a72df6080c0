use std::path::PathBuf;

use json_vo::emit::{CodeEmitter, PreservedMember, write_files};
use json_vo::model::{ClassKind, ConstValue, ValueObjectKind, Visibility};
use json_vo::{ClassDescription, GenerateError, Generator, GeneratorConfig};
use serde_json::json;

fn generator() -> Generator {
    Generator::new(GeneratorConfig { namespace: "Acme".into(), ..GeneratorConfig::default() })
}

#[test]
fn status_enum_exposes_choices_and_named_constructors() {
    let schema = json!({
        "type": "object",
        "properties": {"status": {"type": "string", "enum": ["active", "inactive"]}}
    });
    let generator = generator();
    let collection = generator.generate(&schema, "account").unwrap();

    let status = collection.get("Acme\\Status").unwrap();
    assert_eq!(status.kind, ClassKind::ValueObject(ValueObjectKind::Enum { source_name: "status".into() }));
    assert_eq!(status.constants["ACTIVE"].value, ConstValue::String("active".into()));
    assert_eq!(status.constants["INACTIVE"].value, ConstValue::String("inactive".into()));
    assert_eq!(status.constants["CHOICES"].visibility, Visibility::Public);
    for method in ["fromString", "active", "inactive", "toString", "equals", "isOneOf", "__toString"] {
        assert!(status.has_method(method), "missing {method}");
    }

    let files = generator.render(&collection, &generator.emitter()).unwrap();
    let source = &files[&PathBuf::from("src/Status.php")];
    assert!(source.contains("    private const ACTIVE = 'active';\n"));
    assert!(source.contains("    public const CHOICES = [self::ACTIVE, self::INACTIVE];\n"));
    assert!(source.contains("    public static function active() : self\n    {\n        return new self(self::ACTIVE);\n    }\n"));
    assert!(source.contains("use Acme\\Exception\\InvalidStatus;\n"));

    let exception = &files[&PathBuf::from("src/Exception/InvalidStatus.php")];
    assert!(exception.contains("final class InvalidStatus extends InvalidArgumentException\n"));
    assert!(exception.contains("Status::CHOICES"));
}

#[test]
fn tags_array_wraps_string_items_immutably() {
    let schema = json!({"type": "array", "items": {"type": "string"}});
    let generator = generator();
    let collection = generator.generate(&schema, "tags").unwrap();

    let names: Vec<_> = collection.names().collect();
    assert_eq!(names, ["Acme\\TagsItem", "Acme\\Tags"]);

    let tags = collection.get("Acme\\Tags").unwrap();
    assert_eq!(tags.kind, ClassKind::ValueObject(ValueObjectKind::Array));
    assert_eq!(tags.implements, ["\\Iterator", "\\Countable"]);
    assert_eq!(tags.methods["emptyList"].body, ["return new self();"]);
    assert_eq!(tags.methods["add"].body[0], "$copy = clone $this;");
    assert_eq!(tags.methods["count"].return_type.as_deref(), Some("int"));

    let files = generator.render(&collection, &generator.emitter()).unwrap();
    let source = &files[&PathBuf::from("src/Tags.php")];
    assert!(source.contains("return TagsItem::fromString($item);"));
    assert!(source.contains("return $tagsItem->toString();"));
}

#[test]
fn optional_references_are_nullable_and_required_ones_are_not() {
    let schema = json!({
        "type": "object",
        "required": ["billing_address"],
        "properties": {
            "billing_address": {"$ref": "#/definitions/address"},
            "shipping_address": {"$ref": "#/definitions/address"}
        },
        "definitions": {
            "address": {"type": "object", "properties": {"city": {"type": "string"}}}
        }
    });
    let generator = generator();
    let collection = generator.generate(&schema, "order").unwrap();
    let files = generator.render(&collection, &generator.emitter()).unwrap();
    let order = &files[&PathBuf::from("src/Order.php")];
    assert!(order.contains("    private Address $billingAddress;\n"));
    assert!(order.contains("    private ?Address $shippingAddress;\n"));
    assert!(order.contains("    public function shippingAddress() : ?Address\n"));
}

#[test]
fn order_schema_renders_one_file_per_class() {
    let schema = json!({
        "type": "object",
        "required": ["id", "placed_at", "lines"],
        "properties": {
            "id": {"type": "string", "format": "uuid"},
            "placed_at": {"type": "string", "format": "date-time"},
            "locale": {"type": "string", "format": "BCP 47"},
            "paid": {"type": "boolean"},
            "lines": {
                "type": "array",
                "items": {"$ref": "#/definitions/line"}
            }
        },
        "definitions": {
            "line": {
                "type": "object",
                "required": ["quantity"],
                "properties": {
                    "quantity": {"type": "integer"},
                    "price": {"type": "number", "namespace": "Money"}
                }
            }
        }
    });
    let generator = Generator::new(GeneratorConfig {
        namespace: "Acme".into(),
        constants: true,
        src_root: PathBuf::from("lib"),
        ..GeneratorConfig::default()
    });
    let collection = generator.generate(&schema, "order").unwrap();
    let files = generator.render(&collection, &generator.emitter()).unwrap();

    let mut paths: Vec<_> = files.keys().map(|p| p.to_string_lossy().replace('\\', "/")).collect();
    paths.sort();
    assert_eq!(
        paths,
        [
            "lib/Id.php",
            "lib/Line.php",
            "lib/Lines.php",
            "lib/Locale.php",
            "lib/Money/Price.php",
            "lib/Order.php",
            "lib/Paid.php",
            "lib/PlacedAt.php",
            "lib/Quantity.php",
        ]
    );

    let order = &files[&PathBuf::from("lib/Order.php")];
    assert!(order.starts_with("<?php\n\ndeclare (strict_types=1);\nnamespace Acme;\n\nfinal class Order\n{\n"));
    assert!(order.contains("    public const PLACED_AT = 'placed_at';\n"));
    assert!(order.contains("    private PlacedAt $placedAt;\n"));

    let line = &files[&PathBuf::from("lib/Line.php")];
    assert!(line.contains("use Acme\\Money\\Price;\n"));
    assert!(line.contains("    private ?Price $price;\n"));

    let placed_at = &files[&PathBuf::from("lib/PlacedAt.php")];
    assert!(placed_at.contains("use DateTimeImmutable;\n"));
}

#[test]
fn written_files_keep_custom_members_on_regeneration() {
    let dir = tempfile::tempdir().unwrap();
    let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
    let generator = Generator::new(GeneratorConfig {
        namespace: "Acme".into(),
        src_root: dir.path().join("src"),
        ..GeneratorConfig::default()
    });
    let collection = generator.generate(&schema, "person").unwrap();
    write_files(&generator.render(&collection, &generator.emitter()).unwrap()).unwrap();

    let path = dir.path().join("src/Person.php");
    let first = std::fs::read_to_string(&path).unwrap();
    let body = first.strip_suffix("}\n").unwrap();
    let edited = format!(
        "{body}    // @custom-start\n    public function greet() : string\n    {{\n        return 'hi';\n    }}\n    // @custom-end\n}}\n"
    );
    std::fs::write(&path, edited).unwrap();

    let emitter = generator.emitter().with_existing_source(json_vo::emit::PreservingSource);
    let files = emitter.render(&collection).unwrap();
    let regenerated = &files[&path];
    assert!(regenerated.contains("    public function greet() : string\n"));
    assert_eq!(regenerated.matches("// @custom-start").count(), 1);
}

#[test]
fn closure_hooks_supply_preserved_members() {
    let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
    let generator = generator();
    let collection = generator.generate(&schema, "person").unwrap();
    let hook = |class: &ClassDescription, _: &std::path::Path| {
        (class.name == "Person").then(|| {
            vec![PreservedMember { name: "LIMIT".into(), source: "    private const LIMIT = 3;\n".into() }]
        })
    };
    let files = generator.emitter().with_existing_source(hook).render(&collection).unwrap();
    assert!(files[&PathBuf::from("src/Person.php")].contains("    private const LIMIT = 3;\n"));
    assert!(!files[&PathBuf::from("src/Name.php")].contains("@custom-start"));
}

#[test]
fn failures_abort_the_whole_run() {
    let schema = json!({
        "type": "object",
        "properties": {"matrix": {"type": "array", "items": {"type": "array", "items": {"type": "integer"}}}}
    });
    let err = generator().generate(&schema, "grid").unwrap_err();
    assert!(matches!(err, GenerateError::UnsupportedType { .. }), "{err}");

    let err = generator().generate(&json!({"type": "tuple"}), "x").unwrap_err();
    assert!(matches!(err, GenerateError::InvalidSchema { .. }), "{err}");
}
