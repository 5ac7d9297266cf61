//! Tool registry - ordered lookup table of the tools exposed to the agent

use crate::agent::ToolDefinition;
use crate::error::Result;

use super::traits::{Tool, ToolCall, ToolResult};

/// Ordered registry of available tools.
///
/// Declaration order is preserved so the tool schema presented to the
/// reasoning service is stable across runs. Constructed once at startup and
/// read-only afterwards.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ToolRegistry { tools: Vec::new() }
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.push(Box::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Get all tool definitions, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Execute a tool call.
    ///
    /// An unknown tool name yields a failure result rather than an error, so
    /// the conversation loop can feed it back to the reasoning service as a
    /// correctable turn result.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        match self.get(&call.name) {
            Some(tool) => tool.execute(call.arguments.clone()).await,
            None => Ok(ToolResult::failure(format!("Unknown tool: {}", call.name))),
        }
    }

    /// Get tool count
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// List tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_tool_is_a_sentinel_not_an_error() {
        let registry = ToolRegistry::new();
        let call = ToolCall {
            id: "call_1".to_string(),
            name: "unknown_tool".to_string(),
            arguments: json!({"query": "Acme"}),
        };
        let result = registry.execute(&call).await.unwrap();
        assert!(!result.success);
        assert!(result.into_text().contains("Unknown tool"));
    }

    #[test]
    fn test_tool_result_text() {
        assert_eq!(ToolResult::success("Done!").into_text(), "Done!");
        assert_eq!(ToolResult::failure("Oops!").into_text(), "Error: Oops!");
    }
}
