// Tool registry and trait definition
//
// Declares the catalog of read operations the model may call and provides
// name-based dispatch. The catalog is built once at startup and is immutable
// afterwards.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::providers::{FunctionDeclaration, ToolDeclaration};

/// A named, schema-described read operation the model may request.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (e.g., "list_classes")
    fn name(&self) -> &str;

    /// Human-readable description, used by the model to decide relevance
    fn description(&self) -> &str;

    /// JSON Schema describing the accepted arguments
    fn parameters(&self) -> Value;

    /// Run the read with the model-supplied arguments
    async fn execute(&self, args: Value) -> Result<Value>;

    /// Full declaration in the function-calling wire format
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            tool_type: "function".to_string(),
            function: FunctionDeclaration {
                name: self.name().to_string(),
                description: self.description().to_string(),
                parameters: self.parameters(),
            },
        }
    }
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|b| b.as_ref())
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Declarations for every registered tool, passed verbatim to the model.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools.values().map(|t| t.declaration()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run one tool call and shape the outcome as a result payload.
    ///
    /// Never faults: an unknown tool name or a failing executor produces an
    /// `{"error": ...}` payload so the model can relay it conversationally,
    /// and one failing call does not abort the rest of the turn.
    pub async fn dispatch(&self, name: &str, args: Value) -> Value {
        let Some(tool) = self.get(name) else {
            warn!(tool = %name, "model requested unknown tool");
            return json!({ "error": format!("tool not found: {}", name) });
        };

        info!(tool = %name, "executing tool");

        match tool.execute(args).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(tool = %name, error = %e, "tool execution failed");
                json!({ "error": e.to_string() })
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTool {
        name: String,
        should_fail: bool,
    }

    #[async_trait]
    impl Tool for MockTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "A mock tool for testing"
        }

        fn parameters(&self) -> Value {
            json!({ "type": "object", "properties": {} })
        }

        async fn execute(&self, args: Value) -> Result<Value> {
            if self.should_fail {
                anyhow::bail!("mock failure");
            }
            Ok(json!({ "echo": args }))
        }
    }

    fn registry_with(name: &str, should_fail: bool) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(MockTool {
            name: name.to_string(),
            should_fail,
        }));
        registry
    }

    #[test]
    fn test_registration() {
        let registry = registry_with("test", false);
        assert!(registry.has_tool("test"));
        assert!(!registry.has_tool("nonexistent"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_declarations_use_function_format() {
        let registry = registry_with("test", false);
        let declarations = registry.declarations();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].tool_type, "function");
        assert_eq!(declarations[0].function.name, "test");
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let registry = registry_with("test", false);
        let result = registry.dispatch("test", json!({ "a": 1 })).await;
        assert_eq!(result, json!({ "echo": { "a": 1 } }));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_returns_error_payload() {
        let registry = registry_with("test", false);
        let result = registry.dispatch("nonexistent", json!({})).await;
        assert_eq!(
            result["error"].as_str().unwrap(),
            "tool not found: nonexistent"
        );
    }

    #[tokio::test]
    async fn test_dispatch_failure_contained_as_payload() {
        let registry = registry_with("test", true);
        let result = registry.dispatch("test", json!({})).await;
        assert_eq!(result["error"].as_str().unwrap(), "mock failure");
    }
}
