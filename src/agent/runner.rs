//! Agent with automatic tool calling loop.
//!
//! # Example
//!
//! ```rust,ignore
//! let response = client
//!     .agent("gpt-4o")
//!     .system("You are a research assistant")
//!     .tool(search_tool)
//!     .max_iterations(5)
//!     .build()
//!     .chat("What does Acme sell?")
//!     .await?;
//! ```

use crate::agent::client::ChatClient;
use crate::agent::tool::{ErasedTool, Tool, ToolCall};
use crate::report::truncate_chars;
use crate::AgentError;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Reply sent for a tool call whose name or arguments could not be read
const MALFORMED_TOOL_CALL: &str = "Error: malformed tool call";

/// Builder for creating an Agent.
pub struct AgentBuilder<'a> {
    client: &'a ChatClient,
    model: String,
    system_prompt: Option<String>,
    tools: Vec<Box<dyn ErasedTool>>,
    max_iterations: usize,
    temperature: Option<f32>,
    json_output: bool,
}

impl<'a> AgentBuilder<'a> {
    pub(crate) fn new(client: &'a ChatClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: None,
            tools: Vec::new(),
            max_iterations: 10,
            temperature: None,
            json_output: false,
        }
    }

    /// Set the system prompt.
    pub fn system(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Add a tool to the agent.
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// Set the maximum number of model round-trips. Default is 10.
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the temperature for generation.
    pub fn temperature(mut self, temp: Option<f32>) -> Self {
        self.temperature = temp;
        self
    }

    /// Ask the model to answer with a single JSON object.
    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    pub fn build(self) -> Agent<'a> {
        Agent {
            client: self.client,
            model: self.model,
            system_prompt: self.system_prompt,
            tools: self.tools,
            max_iterations: self.max_iterations,
            temperature: self.temperature,
            json_output: self.json_output,
        }
    }
}

/// An LLM agent that can call tools before answering.
pub struct Agent<'a> {
    client: &'a ChatClient,
    model: String,
    system_prompt: Option<String>,
    tools: Vec<Box<dyn ErasedTool>>,
    max_iterations: usize,
    temperature: Option<f32>,
    json_output: bool,
}

/// Response from an agent chat.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final text response from the agent.
    pub content: String,

    /// Names of the tools called, in order.
    pub tool_calls_made: Vec<String>,

    /// Number of API calls made.
    pub iterations: usize,
}

impl<'a> Agent<'a> {
    /// Send a message to the agent and get a response.
    ///
    /// This method handles the tool-calling loop automatically:
    /// 1. Send the conversation to the model
    /// 2. If the model requests tool calls, execute them
    /// 3. Append tool results to the conversation
    /// 4. Repeat until the model responds with content or max iterations is reached
    pub async fn chat(&self, user_message: impl Into<String>) -> Result<AgentResponse, AgentError> {
        let mut messages = Vec::new();

        if let Some(ref system) = self.system_prompt {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": user_message.into() }));

        self.run_tool_loop(messages).await
    }

    /// Like [`Agent::chat`], then deserializes the final content as JSON
    ///
    /// A surrounding markdown code fence is tolerated.
    pub async fn chat_structured<T: DeserializeOwned>(
        &self,
        user_message: impl Into<String>,
    ) -> Result<(T, AgentResponse), AgentError> {
        let response = self.chat(user_message).await?;
        let parsed = serde_json::from_str(strip_code_fence(&response.content)).map_err(|e| {
            AgentError::Parse(format!(
                "Final response is not valid JSON for the expected type: {} (response: {})",
                e,
                truncate_chars(&response.content, 200)
            ))
        })?;
        Ok((parsed, response))
    }

    async fn run_tool_loop(
        &self,
        mut messages: Vec<serde_json::Value>,
    ) -> Result<AgentResponse, AgentError> {
        let mut tool_calls_made = Vec::new();
        let mut iterations = 0;

        let tool_defs: Vec<serde_json::Value> = self
            .tools
            .iter()
            .map(|t| t.definition().to_openai_format())
            .collect();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                warn!("Agent reached max iterations ({})", self.max_iterations);
                return Err(AgentError::MaxIterations(self.max_iterations));
            }

            info!(
                "Agent iteration {} ({} messages, {} tools)",
                iterations,
                messages.len(),
                self.tools.len()
            );

            let mut request = serde_json::json!({
                "model": self.model,
                "messages": messages,
            });
            if !self.tools.is_empty() {
                request["tools"] = serde_json::Value::Array(tool_defs.clone());
                request["tool_choice"] = serde_json::json!("auto");
            }
            if let Some(temp) = self.temperature {
                request["temperature"] = serde_json::json!(temp);
            }
            if self.json_output {
                request["response_format"] = serde_json::json!({ "type": "json_object" });
            }

            let response = self.client.chat_completion(&request).await?;

            let message = response
                .get("choices")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("message"))
                .ok_or_else(|| AgentError::Parse("No message in response".into()))?;

            let tool_calls = message
                .get("tool_calls")
                .and_then(|tc| tc.as_array())
                .cloned()
                .unwrap_or_default();

            if tool_calls.is_empty() {
                let content = message
                    .get("content")
                    .and_then(|c| c.as_str())
                    .unwrap_or("")
                    .to_string();

                info!(
                    "Agent finished after {} iterations and {} tool calls",
                    iterations,
                    tool_calls_made.len()
                );
                debug!("Agent final response: {}", truncate_chars(&content, 500));

                return Ok(AgentResponse {
                    content,
                    tool_calls_made,
                    iterations,
                });
            }

            // Every echoed tool call needs a `role: tool` reply, so calls without an id
            // are dropped from the assistant message.
            let (tool_calls, unanswerable): (Vec<_>, Vec<_>) = tool_calls
                .into_iter()
                .partition(|tc| tc.get("id").and_then(|id| id.as_str()).is_some());
            for tc_value in &unanswerable {
                warn!("Dropping tool call without an id: {:?}", tc_value);
            }
            let mut assistant = message.clone();
            if tool_calls.is_empty() {
                if let Some(object) = assistant.as_object_mut() {
                    object.remove("tool_calls");
                }
            } else {
                assistant["tool_calls"] = serde_json::Value::Array(tool_calls.clone());
            }
            messages.push(assistant);

            for tc_value in &tool_calls {
                let Some(tc) = ToolCall::from_openai_value(tc_value) else {
                    warn!("Failed to parse tool call: {:?}", tc_value);
                    messages.push(serde_json::json!({
                        "role": "tool",
                        "tool_call_id": tc_value["id"],
                        "content": MALFORMED_TOOL_CALL
                    }));
                    continue;
                };

                info!("Executing tool {} ({})", tc.name, tc.arguments);
                tool_calls_made.push(tc.name.clone());

                let result = self.execute_tool(&tc).await;
                debug!(
                    "Tool {} returned {} chars: {}",
                    tc.name,
                    result.len(),
                    truncate_chars(&result, 200)
                );

                messages.push(serde_json::json!({
                    "role": "tool",
                    "tool_call_id": tc.id,
                    "content": result
                }));
            }
        }
    }

    /// Executes one tool call; failures become an error string for the model
    async fn execute_tool(&self, call: &ToolCall) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.name() == call.name) else {
            warn!("Unknown tool requested: {}", call.name);
            return format!("Error: Unknown tool '{}'", call.name);
        };

        match tool.call_erased(&call.arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool {} failed: {}", call.name, e);
                format!("Error executing tool: {}", e)
            }
        }
    }
}

/// Strips a surrounding ```` ```json ```` fence, if present
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
