use graphql_util::{
    resolve, Client, Endpoint, Error, SchemaCache, SchemaResolutionError, TransportError,
};
use graphql_util_test_utils::{fixtures, MockTransport, TestProject};
use serde_json::{json, Value};
use std::fs;

fn endpoint() -> Endpoint {
    Endpoint::new(fixtures::ENDPOINT).unwrap()
}

#[test]
fn test_missing_artifact_is_fetched_once() {
    let project = TestProject::new();
    let transport = MockTransport::new();
    let cache = SchemaCache::new(project.schema_path());
    assert!(!cache.exists());

    let schema = cache.resolve(&endpoint(), &transport).unwrap();
    assert_eq!(transport.introspection_count(), 1);
    assert!(cache.exists());
    assert_eq!(schema.sdl(), fixtures::SCHEMA_SDL);

    cache.resolve(&endpoint(), &transport).unwrap();
    assert_eq!(transport.introspection_count(), 1);
}

#[test]
fn test_existing_artifact_is_never_refetched() {
    let project = TestProject::new().with_schema_artifact();
    let transport = MockTransport::new();

    let first = resolve(&endpoint(), project.schema_path(), &transport).unwrap();
    let second = resolve(&endpoint(), project.schema_path(), &transport).unwrap();

    assert_eq!(transport.introspection_count(), 0);
    assert_eq!(first.sdl(), second.sdl());
    assert_eq!(first.introspection(), second.introspection());
}

#[test]
fn test_artifact_holds_the_introspection_response() {
    let project = TestProject::new();
    resolve(&endpoint(), project.schema_path(), &MockTransport::new()).unwrap();

    let stored: Value =
        serde_json::from_str(&fs::read_to_string(project.schema_path()).unwrap()).unwrap();
    assert_eq!(stored, fixtures::introspection_response());
}

#[test]
fn test_parent_directories_are_created() {
    let project = TestProject::new();
    let path = project.path().join("cache").join("nested").join("schema.json");

    resolve(&endpoint(), &path, &MockTransport::new()).unwrap();
    assert!(path.is_file());
}

#[test]
fn test_failed_introspection_is_reported() {
    let project = TestProject::new();
    let transport = MockTransport::with_introspection(Err(TransportError::Http(
        401,
        "unauthorized".into(),
    )));
    let endpoint = endpoint().with_token("secret");

    let err = resolve(&endpoint, project.schema_path(), &transport).unwrap_err();
    assert!(matches!(
        err,
        SchemaResolutionError::Introspection(TransportError::Http(401, _))
    ));
    assert_eq!(transport.introspection_count(), 1);
    assert!(!project.schema_path().exists());
}

#[test]
fn test_rejected_introspection_leaves_no_artifact() {
    let project = TestProject::new();
    let transport = MockTransport::with_introspection(Ok(json!({
        "errors": [{ "message": "introspection is disabled" }]
    })));

    let err = resolve(&endpoint(), project.schema_path(), &transport).unwrap_err();
    assert!(matches!(err, SchemaResolutionError::InvalidIntrospection(_)));
    assert!(err.to_string().contains("introspection is disabled"));
    assert!(!project.schema_path().exists());
}

#[test]
fn test_corrupt_artifact_is_fatal() {
    let project = TestProject::new().with_file("schema.json", r#"{ "data": { "__schema": 42 } }"#);
    let transport = MockTransport::new();

    let err = Client::configure_with_transport(&project.target_config(), transport.clone())
        .unwrap_err();
    let Error::SchemaResolution(SchemaResolutionError::Corrupt { path, .. }) = &err else {
        panic!("expected Corrupt, got {err}");
    };
    assert_eq!(path, &project.schema_path());
    assert_eq!(transport.introspection_count(), 0);
}

#[test]
fn test_refresh_overwrites_artifact() {
    let project = TestProject::new().with_file("schema.json", "stale");
    let transport = MockTransport::new();
    let cache = SchemaCache::new(project.schema_path());

    let schema = cache.refresh(&endpoint(), &transport).unwrap();
    assert_eq!(transport.introspection_count(), 1);
    assert_eq!(schema.sdl(), fixtures::SCHEMA_SDL);
    assert_eq!(cache.load().unwrap().sdl(), fixtures::SCHEMA_SDL);
}

#[test]
fn test_clear_then_resolve_refetches() {
    let project = TestProject::new().with_schema_artifact();
    let transport = MockTransport::new();
    let cache = SchemaCache::new(project.schema_path());

    assert!(cache.clear().unwrap());
    assert!(!cache.clear().unwrap());

    cache.resolve(&endpoint(), &transport).unwrap();
    assert_eq!(transport.introspection_count(), 1);
}

#[test]
fn test_enums() {
    let project = TestProject::new().with_schema_artifact();
    let client = Client::configure_with_transport(&project.target_config(), MockTransport::new())
        .unwrap();

    let enums = client.enums();
    assert_eq!(enums.len(), 1);
    assert_eq!(
        enums.get("role"),
        Some(&vec!["ADMIN".to_string(), "MEMBER".to_string()])
    );
    assert!(!enums.contains_key("__typekind"));
}
