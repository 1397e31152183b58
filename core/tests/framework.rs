//! End-to-end tests for the component, prototype, and property triad
//!
//! These tests exercise the complete flow: a factory resolves a prototype
//! identifier, the component validates its property bag, and behavioral
//! calls delegate to the prototype with structured failures instead of
//! panics.

use anyhow::Result;
use std::collections::HashMap;

use armature_core::component::Factory;
use armature_core::{FrameworkError, Options, Property, PropertyError, Validation, Value, ValueKind};

/// Test fixture bundling a factory with its builtin prototypes
struct FrameworkTest {
    factory: Factory,
}

impl FrameworkTest {
    fn new() -> Self {
        Self {
            factory: Factory::with_builtins(),
        }
    }

    fn values(entries: &[(&str, Value)]) -> HashMap<String, Value> {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

#[test]
fn date_format_component_end_to_end() -> Result<()> {
    let fixture = FrameworkTest::new();

    // Constructing with the required format succeeds
    let mut filter = fixture.factory.filter(
        "date_format",
        FrameworkTest::values(&[("format", Value::text("%Y-%m-%d"))]),
        HashMap::new(),
    )?;

    // Processing an integer timestamp renders the date
    let rendered = filter.filter(Value::Int(86_400));
    assert_eq!(rendered.unwrap(), Value::text("1970-01-02"));

    // Non-integer input returns a failure signal without panicking
    let failure = filter.filter(Value::text("tomorrow"));
    let err = failure.unwrap_err();
    assert_eq!(err.prototype, "date_format");
    assert_eq!(err.value, Value::text("tomorrow"));

    Ok(())
}

#[test]
fn missing_required_property_fails_at_construction() {
    let fixture = FrameworkTest::new();

    let result = fixture
        .factory
        .filter("date_format", HashMap::new(), HashMap::new());

    match result {
        Err(FrameworkError::Property(PropertyError::MissingRequired { names, .. })) => {
            assert_eq!(names, vec!["format".to_string()]);
        }
        other => panic!("expected MissingRequired, got {other:?}"),
    }
}

#[test]
fn unknown_identifier_constructs_nothing() {
    let fixture = FrameworkTest::new();

    let result = fixture
        .factory
        .build("sha3_shake", HashMap::new(), HashMap::new());

    match result {
        Err(FrameworkError::UnknownPrototype { identifier }) => {
            assert_eq!(identifier, "sha3_shake");
        }
        other => panic!("expected UnknownPrototype, got {other:?}"),
    }
}

#[test]
fn hash_pipeline_with_constraints() -> Result<()> {
    let fixture = FrameworkTest::new();

    let mut non_empty = fixture
        .factory
        .constraint("non_empty", HashMap::new(), HashMap::new())?;
    let mut hash = fixture.factory.filter(
        "hash",
        FrameworkTest::values(&[("algorithm", Value::text("sha256"))]),
        HashMap::new(),
    )?;

    let input = Value::text("hello");
    non_empty.evaluate(&input).map_err(anyhow::Error::from)?;
    let digest = hash.filter(input).map_err(anyhow::Error::from)?;

    assert_eq!(
        digest,
        Value::text("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
    );

    // The empty input is stopped by the constraint before hashing
    assert!(non_empty.evaluate(&Value::text("")).is_err());

    Ok(())
}

#[test]
fn component_properties_stay_validated_after_construction() -> Result<()> {
    let fixture = FrameworkTest::new();

    let mut filter = fixture.factory.filter(
        "hash",
        FrameworkTest::values(&[("encoding", Value::text("base64"))]),
        HashMap::new(),
    )?;

    // Component properties are finalized; plain properties reject writes
    let result = filter
        .component_mut()
        .properties_mut()
        .set("encoding", "hex");
    assert!(matches!(
        result,
        Err(PropertyError::Finalized { .. })
    ));

    Ok(())
}

#[test]
fn options_reuse_the_property_manager() -> Result<()> {
    let mut options = Options::builder("export")
        .declare(Property::text("directory").required(true))?
        .declare(
            Property::new("attempts")
                .validation(Validation::new().kind(ValueKind::Int))
                .default_value(3i64),
        )?
        .set("directory", "/tmp/out")?
        .build()?;

    assert_eq!(options.get("directory")?, Value::text("/tmp/out"));
    assert_eq!(options.get("attempts")?, Value::Int(3));

    // Constraint checks behave exactly as they do on components
    let rejected = options.set("attempts", "many");
    assert!(matches!(
        rejected,
        Err(PropertyError::CoercionFailed { .. })
    ));

    Ok(())
}

#[test]
fn lazy_options_resolve_once_on_read() -> Result<()> {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let computations = Arc::new(AtomicUsize::new(0));
    let observed = Arc::clone(&computations);

    let mut options = Options::builder("session")
        .declare(Property::text("cache_key").lazy(move |owner| {
            observed.fetch_add(1, Ordering::SeqCst);
            let directory = owner.get("directory")?;
            Ok(Value::text(format!("session:{directory}")))
        }))?
        .declare(Property::text("directory").default_value("/var/cache"))?
        .build()?;

    for _ in 0..3 {
        assert_eq!(
            options.get("cache_key")?,
            Value::text("session:/var/cache")
        );
    }
    assert_eq!(computations.load(Ordering::SeqCst), 1);

    Ok(())
}
