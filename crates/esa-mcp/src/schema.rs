//! Declared argument schemas and their validation.
//!
//! A [`ToolDefinition`] is the single source of truth for a tool: the same
//! [`ArgumentSchema`] produces the JSON Schema advertised in `tools/list` and
//! checks the raw arguments of every call. Validation collects every
//! violation, applies defaults, and only then decodes into the tool's typed
//! argument struct.

use esa_core::{Error, FieldViolation, Result};
use rmcp::model::Tool;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::sync::Arc;

// ============================================================================
// Parameters
// ============================================================================

/// Accepted value shape of one parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamKind {
    /// Any string.
    String,
    /// A JSON integer within optional inclusive bounds.
    Integer {
        /// Smallest accepted value.
        min: Option<i64>,
        /// Largest accepted value.
        max: Option<i64>,
    },
    /// `true` or `false`.
    Boolean,
    /// A list of strings.
    StringList,
    /// A list of integers, each within optional inclusive bounds.
    IntegerList {
        /// Smallest accepted item.
        min: Option<i64>,
        /// Largest accepted item.
        max: Option<i64>,
    },
    /// One of a fixed set of strings.
    OneOf(&'static [&'static str]),
}

impl ParamKind {
    /// An integer with no bounds.
    pub const fn integer() -> Self {
        Self::Integer {
            min: None,
            max: None,
        }
    }

    /// An integer within `min..=max`.
    pub const fn bounded(min: Option<i64>, max: Option<i64>) -> Self {
        Self::Integer { min, max }
    }

    /// A list of integers, each within `min..=max`.
    pub const fn bounded_list(min: Option<i64>, max: Option<i64>) -> Self {
        Self::IntegerList { min, max }
    }

    fn json_schema(&self) -> Map<String, Value> {
        let schema = match self {
            Self::String => json!({"type": "string"}),
            Self::Integer { min, max } => integer_schema(*min, *max),
            Self::Boolean => json!({"type": "boolean"}),
            Self::StringList => json!({"type": "array", "items": {"type": "string"}}),
            Self::IntegerList { min, max } => {
                json!({"type": "array", "items": integer_schema(*min, *max)})
            }
            Self::OneOf(names) => json!({"type": "string", "enum": names}),
        };
        match schema {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn check(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            Self::String if value.is_string() => Ok(()),
            Self::String => Err("expected a string".to_string()),
            Self::Integer { min, max } => check_integer(value, *min, *max),
            Self::Boolean if value.is_boolean() => Ok(()),
            Self::Boolean => Err("expected a boolean".to_string()),
            Self::StringList => match value.as_array() {
                Some(items) if items.iter().all(Value::is_string) => Ok(()),
                _ => Err("expected a list of strings".to_string()),
            },
            Self::IntegerList { min, max } => {
                let items = value.as_array().ok_or("expected a list of integers")?;
                items.iter().enumerate().try_for_each(|(index, item)| {
                    check_integer(item, *min, *max).map_err(|e| format!("item {index}: {e}"))
                })
            }
            Self::OneOf(names) => match value.as_str() {
                Some(s) if names.contains(&s) => Ok(()),
                _ => Err(format!("expected one of: {}", names.join(", "))),
            },
        }
    }
}

fn integer_schema(min: Option<i64>, max: Option<i64>) -> Value {
    let mut schema = json!({"type": "integer"});
    if let Some(min) = min {
        schema["minimum"] = json!(min);
    }
    if let Some(max) = max {
        schema["maximum"] = json!(max);
    }
    schema
}

fn check_integer(
    value: &Value,
    min: Option<i64>,
    max: Option<i64>,
) -> std::result::Result<(), String> {
    let n = as_integer(value).ok_or("expected an integer")?;
    if let Some(min) = min.filter(|min| n < *min) {
        return Err(format!("must be at least {min}"));
    }
    if let Some(max) = max.filter(|max| n > *max) {
        return Err(format!("must be at most {max}"));
    }
    Ok(())
}

/// Integer value of a JSON number, saturating above `i64::MAX`.
fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|_| i64::MAX))
}

/// One named parameter of a tool.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    name: &'static str,
    kind: ParamKind,
    description: &'static str,
    required: bool,
    default: Option<Value>,
}

impl Param {
    /// A parameter the caller must supply.
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: true,
            default: None,
        }
    }

    /// A parameter the caller may omit.
    pub fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind, description)
        }
    }

    /// Value applied when the caller omits the parameter.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

// ============================================================================
// ArgumentSchema
// ============================================================================

/// Ordered set of parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArgumentSchema {
    params: Vec<Param>,
}

impl ArgumentSchema {
    /// A schema with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// JSON Schema advertised to clients.
    pub fn to_json_schema(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            let mut property = param.kind.json_schema();
            property.insert("description".to_string(), json!(param.description));
            if let Some(default) = &param.default {
                property.insert("default".to_string(), default.clone());
            }
            properties.insert(param.name.to_string(), Value::Object(property));
            if param.required {
                required.push(json!(param.name));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        schema
    }

    /// Check raw arguments and apply defaults.
    ///
    /// A `null` payload counts as `{}`, a `null` value counts as absent, and
    /// unknown keys are dropped.
    pub fn validate(&self, tool: &str, raw: Value) -> Result<Map<String, Value>> {
        let mut provided = match raw {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => {
                return Err(Error::validation(
                    tool,
                    vec![FieldViolation::new("arguments", "expected an object")],
                ))
            }
        };

        let mut validated = Map::new();
        let mut violations = Vec::new();

        for param in &self.params {
            match provided.remove(param.name).filter(|v| !v.is_null()) {
                Some(value) => match param.kind.check(&value) {
                    Ok(()) => {
                        validated.insert(param.name.to_string(), value);
                    }
                    Err(message) => violations.push(FieldViolation::new(param.name, message)),
                },
                None => {
                    if let Some(default) = &param.default {
                        validated.insert(param.name.to_string(), default.clone());
                    } else if param.required {
                        violations.push(FieldViolation::new(param.name, "is required"));
                    }
                }
            }
        }

        if !provided.is_empty() {
            let ignored: Vec<&str> = provided.keys().map(String::as_str).collect();
            log::debug!("{tool}: ignoring unknown arguments {ignored:?}");
        }

        if violations.is_empty() {
            Ok(validated)
        } else {
            Err(Error::validation(tool, violations))
        }
    }

    /// Validate and decode into a typed argument struct.
    pub fn parse<T: DeserializeOwned>(&self, tool: &str, raw: Value) -> Result<T> {
        let validated = self.validate(tool, raw)?;
        serde_json::from_value(Value::Object(validated)).map_err(|e| {
            Error::validation(tool, vec![FieldViolation::new("arguments", e.to_string())])
        })
    }
}

// ============================================================================
// ToolDefinition
// ============================================================================

/// Name, description and argument schema of one tool.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: &'static str,
    /// Description shown to the calling agent.
    pub description: String,
    /// Argument schema.
    pub schema: ArgumentSchema,
}

impl ToolDefinition {
    /// Create a definition.
    pub fn new(name: &'static str, description: impl Into<String>, schema: ArgumentSchema) -> Self {
        Self {
            name,
            description: description.into(),
            schema,
        }
    }

    /// Protocol-level tool description.
    pub fn to_tool(&self) -> Tool {
        Tool::new(
            self.name,
            self.description.clone(),
            Arc::new(self.schema.to_json_schema()),
        )
    }

    /// Validate raw arguments against this tool's schema.
    pub fn parse<T: DeserializeOwned>(&self, raw: Value) -> Result<T> {
        self.schema.parse(self.name, raw)
    }
}

// ============================================================================
// Tests
// ============================================================================
