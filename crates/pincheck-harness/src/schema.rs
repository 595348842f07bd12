//! Response body schemas
//!
//! Structural validators for the response bodies the pinning service
//! specification defines. Validation checks required fields and their
//! shapes; unknown extra fields are allowed so services remain free to
//! extend their responses.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::DateTime;
use serde_json::{Map, Value};

// ============================================================================
// Schema
// ============================================================================

/// A named structural validator for a response body.
#[derive(Clone)]
pub struct Schema {
    name: String,
    validate: Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema").field("name", &self.name).finish()
    }
}

impl Schema {
    /// Creates a schema from a name and a validation function.
    pub fn new(
        name: impl Into<String>,
        validate: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            validate: Arc::new(validate),
        }
    }

    /// The schema's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks a body against the schema.
    ///
    /// # Errors
    /// Returns a description of the first structural violation found
    pub fn check(&self, body: &Value) -> Result<(), String> {
        (self.validate)(body)
    }
}

// ============================================================================
// Builtin validators
// ============================================================================

fn require_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, String> {
    value
        .as_object()
        .ok_or_else(|| format!("{what} must be a JSON object"))
}

fn require_field<'a>(
    map: &'a Map<String, Value>,
    field: &str,
    what: &str,
) -> Result<&'a Value, String> {
    map.get(field)
        .ok_or_else(|| format!("{what} is missing required field '{field}'"))
}

fn validate_failure(body: &Value) -> Result<(), String> {
    let map = require_object(body, "failure body")?;
    let error = require_object(require_field(map, "error", "failure body")?, "'error'")?;

    if !require_field(error, "reason", "'error'")?.is_string() {
        return Err("'error.reason' must be a string".to_string());
    }

    if let Some(details) = error.get("details") {
        if !details.is_string() && !details.is_null() {
            return Err("'error.details' must be a string".to_string());
        }
    }

    Ok(())
}

fn validate_pin(value: &Value) -> Result<(), String> {
    let map = require_object(value, "'pin'")?;
    if !require_field(map, "cid", "'pin'")?.is_string() {
        return Err("'pin.cid' must be a string".to_string());
    }
    Ok(())
}

fn validate_pin_status(body: &Value) -> Result<(), String> {
    let map = require_object(body, "pin status body")?;

    if !require_field(map, "requestid", "pin status body")?.is_string() {
        return Err("'requestid' must be a string".to_string());
    }

    match require_field(map, "status", "pin status body")?.as_str() {
        Some("queued" | "pinning" | "pinned" | "failed") => {}
        Some(other) => return Err(format!("'status' has unknown value '{other}'")),
        None => return Err("'status' must be a string".to_string()),
    }

    let created = require_field(map, "created", "pin status body")?;
    match created.as_str() {
        Some(s) if DateTime::parse_from_rfc3339(s).is_ok() => {}
        Some(s) => return Err(format!("'created' is not an RFC 3339 timestamp: '{s}'")),
        None => return Err("'created' must be a string".to_string()),
    }

    validate_pin(require_field(map, "pin", "pin status body")?)?;

    let delegates = require_field(map, "delegates", "pin status body")?;
    match delegates.as_array() {
        Some(entries) if entries.iter().all(Value::is_string) => {}
        Some(_) => return Err("'delegates' entries must be strings".to_string()),
        None => return Err("'delegates' must be an array".to_string()),
    }

    Ok(())
}

fn validate_pin_results(body: &Value) -> Result<(), String> {
    let map = require_object(body, "pin results body")?;

    if !require_field(map, "count", "pin results body")?.is_u64() {
        return Err("'count' must be a non-negative integer".to_string());
    }

    let results = require_field(map, "results", "pin results body")?
        .as_array()
        .ok_or_else(|| "'results' must be an array".to_string())?;

    for (i, entry) in results.iter().enumerate() {
        validate_pin_status(entry).map_err(|e| format!("results[{i}]: {e}"))?;
    }

    Ok(())
}

// ============================================================================
// Registry
// ============================================================================

/// Registry of response schemas available to checks.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// An empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the pinning service response schemas:
    /// `Failure`, `PinStatus` and `PinResults`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.register(Schema::new("Failure", validate_failure));
        registry.register(Schema::new("PinStatus", validate_pin_status));
        registry.register(Schema::new("PinResults", validate_pin_results));
        registry
    }

    /// Adds a schema, replacing any existing one with the same name.
    pub fn register(&mut self, schema: Schema) {
        self.schemas.insert(schema.name().to_string(), schema);
    }

    /// Looks up a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Registered schema names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ============================================================================
// Tests
// ============================================================================
