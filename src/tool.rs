//! The tool interface this plugin exposes to its agent host.
//!
//! Each action implements [`DynTool`]: a name, a chat-facing description,
//! a JSON-schema parameter definition, and a JSON-in/JSON-out call. The
//! host registers the boxed tools and routes extracted parameter bags to
//! [`DynTool::call_json`]; errors come back as [`ToolError`] values for the
//! host to render as plain text without crashing.

use async_trait::async_trait;
use serde_json::Value;

/// Boxed, type-erased tool handle the host registers.
pub type BoxedTool = Box<dyn DynTool>;

/// Definition of a tool as presented to the language model.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's parameters.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Error type for tool execution failures.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ToolError {
    /// Error during tool execution.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Invalid arguments provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Generic error.
    #[error("Tool error: {0}")]
    Other(String),
}

impl ToolError {
    /// Create an execution error.
    #[must_use]
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

/// Object-safe tool interface.
#[async_trait]
pub trait DynTool: Send + Sync {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// Chat-facing description of what the tool does.
    fn description(&self) -> String;

    /// Definition presented to the language model.
    fn definition(&self) -> ToolDefinition;

    /// Execute with an extracted parameter bag.
    async fn call_json(&self, args: Value) -> Result<Value, ToolError>;
}
