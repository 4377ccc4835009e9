//! Tool calling traits and types for OpenAI-style function calling.
//!
//! Tools have typed arguments with a generated JSON schema and return plain text,
//! which is what the model reads back.
//!
//! # Example
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct EchoArgs {
//!     message: String,
//! }
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Tool for Echo {
//!     const NAME: &'static str = "echo";
//!     type Args = EchoArgs;
//!     type Error = std::convert::Infallible;
//!
//!     fn description(&self) -> &str {
//!         "Echo back the input message"
//!     }
//!
//!     async fn call(&self, args: Self::Args) -> Result<String, Self::Error> {
//!         Ok(args.message)
//!     }
//! }
//! ```

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A tool that can be called by the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    const NAME: &'static str;

    /// The argument type for this tool (must derive `Deserialize` and `JsonSchema`).
    type Args: DeserializeOwned + JsonSchema + Send;

    /// The error type for this tool.
    type Error: std::error::Error + Send + Sync + 'static;

    /// A description of what this tool does, shown to the model.
    fn description(&self) -> &str;

    /// Execute the tool with the given arguments.
    async fn call(&self, args: Self::Args) -> Result<String, Self::Error>;

    /// Generate the tool definition for this tool.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: self.description().to_string(),
            parameters: args_schema::<Self::Args>(),
        }
    }
}

/// JSON schema for a tool's arguments, without the `$schema`/`title` noise
fn args_schema<T: JsonSchema>() -> serde_json::Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    schema
}

/// Tool definition as sent to the API.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's parameters.
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Convert to the chat-completions `tools` entry format.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// The ID of this tool call (for matching responses).
    pub id: String,

    /// The name of the tool to call.
    pub name: String,

    /// The arguments as a JSON string.
    pub arguments: String,
}

impl ToolCall {
    /// Parse a tool call from the API's response format.
    pub fn from_openai_value(value: &serde_json::Value) -> Option<Self> {
        Some(Self {
            id: value.get("id")?.as_str()?.to_string(),
            name: value.get("function")?.get("name")?.as_str()?.to_string(),
            arguments: value.get("function")?.get("arguments")?.as_str()?.to_string(),
        })
    }
}

/// Type-erased tool for storing heterogeneous tools in one `Vec<Box<dyn ErasedTool>>`.
#[async_trait]
pub trait ErasedTool: Send + Sync {
    fn name(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with JSON arguments.
    async fn call_erased(&self, arguments: &str) -> Result<String, ToolError>;
}

/// Error type for erased tool calls.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Failed to parse arguments: {0}")]
    ArgumentParse(String),

    #[error("Tool execution failed: {0}")]
    Execution(String),
}

#[async_trait]
impl<T: Tool> ErasedTool for T {
    fn name(&self) -> &str {
        T::NAME
    }

    fn definition(&self) -> ToolDefinition {
        Tool::definition(self)
    }

    async fn call_erased(&self, arguments: &str) -> Result<String, ToolError> {
        // Some models send "" for tools whose arguments are all optional.
        let arguments = if arguments.trim().is_empty() {
            "{}"
        } else {
            arguments
        };

        let args: T::Args = serde_json::from_str(arguments)
            .map_err(|e| ToolError::ArgumentParse(e.to_string()))?;

        self.call(args)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))
    }
}
