//! Tool catalog: typed descriptors for the tools discovered at session start.
//!
//! Owns tool *metadata* only; the implementations live behind the transport.
//! A catalog is built once from the discovery response and never mutated
//! afterwards. A reconnect builds a fresh one.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// =============================================================================
// Parameter types
// =============================================================================

/// Declared type of a tool parameter, as read from its JSON Schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Integer,
    Number,
    String,
    /// Any other declared type, kept verbatim (`boolean`, `array`, ...).
    Other(String),
}

impl ParamType {
    /// Map a JSON Schema `type` keyword. A missing keyword is `Other("any")`.
    pub fn from_schema(schema: &Value) -> Self {
        match schema.get("type").and_then(Value::as_str) {
            Some("integer") => ParamType::Integer,
            Some("number") => ParamType::Number,
            Some("string") => ParamType::String,
            Some(other) => ParamType::Other(other.to_string()),
            None => ParamType::Other("any".to_string()),
        }
    }

    /// Human-readable type name for prompt generation.
    pub fn display_name(&self) -> &str {
        match self {
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::String => "string",
            ParamType::Other(name) => name,
        }
    }
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub required: bool,
}

// =============================================================================
// Tool descriptor
// =============================================================================

/// Complete descriptor of one discovered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters in schema declaration order.
    pub parameters: Vec<ParamSpec>,
    /// Required parameter names in the order the schema lists them.
    pub required: Vec<String>,
}

impl ToolDescriptor {
    /// Build a descriptor from an MCP `inputSchema` object.
    ///
    /// `properties` supplies the declared parameters; `required` supplies the
    /// binding order. A required name with no property entry becomes an
    /// untyped parameter so it is still bound during resolution.
    pub fn from_input_schema(
        name: impl Into<String>,
        description: Option<String>,
        input_schema: &Value,
    ) -> Self {
        let required: Vec<String> = input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut parameters: Vec<ParamSpec> = input_schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(key, schema)| ParamSpec {
                        name: key.clone(),
                        param_type: ParamType::from_schema(schema),
                        required: required.contains(key),
                    })
                    .collect()
            })
            .unwrap_or_default();

        for name in &required {
            if !parameters.iter().any(|p| &p.name == name) {
                parameters.push(ParamSpec {
                    name: name.clone(),
                    param_type: ParamType::Other("any".to_string()),
                    required: true,
                });
            }
        }

        Self {
            name: name.into(),
            description: description.filter(|d| !d.trim().is_empty()),
            parameters,
            required,
        }
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Required parameters in binding order.
    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> + '_ {
        self.required.iter().filter_map(|name| self.param(name))
    }

    /// Generate a prompt line for this tool.
    ///
    /// Format: `- name(param1: type, param2?: type): description`
    pub fn to_prompt_line(&self, placeholder: &str) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let optional = if p.required { "" } else { "?" };
                format!("{}{}: {}", p.name, optional, p.param_type.display_name())
            })
            .collect();

        format!(
            "- {}({}): {}",
            self.name,
            params.join(", "),
            self.description.as_deref().unwrap_or(placeholder)
        )
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Immutable, discovery-ordered set of tool descriptors.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    entries: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Build a catalog from a discovery response.
    ///
    /// A repeated name replaces the earlier descriptor but keeps its position.
    pub fn from_descriptors(descriptors: Vec<ToolDescriptor>) -> Result<Self> {
        let mut entries: Vec<ToolDescriptor> = Vec::with_capacity(descriptors.len());
        let mut index = HashMap::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if descriptor.name.is_empty() {
                return Err(Error::validation("Tool name cannot be empty"));
            }
            match index.get(&descriptor.name) {
                Some(&pos) => {
                    tracing::warn!("duplicate_tool_descriptor: {}", descriptor.name);
                    entries[pos] = descriptor;
                }
                None => {
                    index.insert(descriptor.name.clone(), entries.len());
                    entries.push(descriptor);
                }
            }
        }

        Ok(Self { entries, index })
    }

    /// Get a tool descriptor by name.
    pub fn get(&self, name: &str) -> Result<&ToolDescriptor> {
        self.index
            .get(name)
            .map(|&pos| &self.entries[pos])
            .ok_or_else(|| Error::tool_not_found(name))
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Descriptors in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> + '_ {
        self.entries.iter()
    }

    /// Tool names in discovery order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_descriptor() -> ToolDescriptor {
        ToolDescriptor::from_input_schema(
            "add",
            Some("Add two numbers".to_string()),
            &json!({
                "type": "object",
                "properties": {
                    "a": {"type": "integer", "title": "A"},
                    "b": {"type": "integer", "title": "B"}
                },
                "required": ["a", "b"]
            }),
        )
    }

    #[test]
    fn test_from_input_schema_keeps_declaration_order() {
        let tool = ToolDescriptor::from_input_schema(
            "mixed",
            None,
            &json!({
                "properties": {
                    "zeta": {"type": "number"},
                    "alpha": {"type": "string"},
                    "mid": {"type": "boolean"}
                },
                "required": ["alpha", "zeta"]
            }),
        );

        let names: Vec<&str> = tool.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(tool.required, vec!["alpha", "zeta"]);

        let required: Vec<&str> = tool.required_params().map(|p| p.name.as_str()).collect();
        assert_eq!(required, vec!["alpha", "zeta"]);
        assert_eq!(
            tool.param("mid").unwrap().param_type,
            ParamType::Other("boolean".to_string())
        );
        assert!(!tool.param("mid").unwrap().required);
    }

    #[test]
    fn test_required_without_property_is_untyped() {
        let tool = ToolDescriptor::from_input_schema("f", None, &json!({"required": ["x"]}));
        let param = tool.param("x").unwrap();
        assert!(param.required);
        assert_eq!(param.param_type, ParamType::Other("any".to_string()));
    }

    #[test]
    fn test_blank_description_is_none() {
        let tool = ToolDescriptor::from_input_schema("f", Some("  ".to_string()), &json!({}));
        assert!(tool.description.is_none());
        assert!(tool.parameters.is_empty());
        assert!(tool.required.is_empty());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ToolCatalog::from_descriptors(vec![add_descriptor()]).unwrap();

        assert!(catalog.contains("add"));
        assert!(!catalog.contains("nonexistent"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("add").unwrap().description.as_deref(),
            Some("Add two numbers")
        );
        assert!(matches!(
            catalog.get("weather"),
            Err(Error::ToolNotFound(name)) if name == "weather"
        ));
    }

    #[test]
    fn test_catalog_discovery_order() {
        let names = ["sqrt", "add", "cosine"];
        let catalog = ToolCatalog::from_descriptors(
            names
                .iter()
                .map(|n| ToolDescriptor::from_input_schema(*n, None, &json!({})))
                .collect(),
        )
        .unwrap();
        assert_eq!(catalog.names(), vec!["sqrt", "add", "cosine"]);
    }

    #[test]
    fn test_catalog_duplicate_replaces_in_place() {
        let first = ToolDescriptor::from_input_schema("add", None, &json!({}));
        let other = ToolDescriptor::from_input_schema("sqrt", None, &json!({}));
        let catalog =
            ToolCatalog::from_descriptors(vec![first, other, add_descriptor()]).unwrap();

        assert_eq!(catalog.names(), vec!["add", "sqrt"]);
        assert_eq!(catalog.get("add").unwrap().required, vec!["a", "b"]);
    }

    #[test]
    fn test_catalog_empty_name_fails() {
        let mut tool = add_descriptor();
        tool.name = String::new();
        assert!(ToolCatalog::from_descriptors(vec![tool]).is_err());
    }

    #[test]
    fn test_prompt_line_format() {
        let tool = ToolDescriptor::from_input_schema(
            "get_recent_calculations",
            None,
            &json!({"properties": {"n": {"type": "integer", "default": 5}}}),
        );
        assert_eq!(
            tool.to_prompt_line("No description"),
            "- get_recent_calculations(n?: integer): No description"
        );
        assert_eq!(
            add_descriptor().to_prompt_line("No description"),
            "- add(a: integer, b: integer): Add two numbers"
        );
    }
}
