//! Bounded reasoning/tool loop
//!
//! Drives one user turn: call the reasoning service with the running history
//! and tool schema, execute any requested tool calls sequentially in the
//! order received, append each result tagged with its call id, and repeat
//! until the service answers without tool calls or the iteration budget runs
//! out. The budget caps worst-case cost against a service that loops on tool
//! calls indefinitely.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agent::client::ReasoningClient;
use crate::agent::conversation::Conversation;
use crate::error::Result;
use crate::tools::{ToolCall, ToolRegistry};

/// Sentinel returned when the iteration budget is exhausted
pub const MAX_ITERATIONS_MESSAGE: &str =
    "Max iterations reached. Please try a more specific query.";

/// Configurable limits for the turn loop
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Maximum reasoning round-trips per user turn
    pub max_iterations: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig { max_iterations: 10 }
    }
}

/// Hooks for callers to observe loop events (e.g. print tool traces to the
/// terminal).
#[async_trait]
pub trait TurnObserver: Send + Sync {
    /// Called before a requested tool is executed
    async fn on_tool_call(&self, _name: &str, _arguments: &Value) {}
    /// Called after a tool produced its result text
    async fn on_tool_result(&self, _name: &str, _result: &str) {}
}

/// Default no-op observer
pub struct NoOpObserver;

#[async_trait]
impl TurnObserver for NoOpObserver {}

/// Run one user turn to completion.
///
/// Appends the user input, then loops reasoning and tool execution until a
/// final (non-tool) message arrives or the budget is exhausted. A reasoning
/// failure aborts the turn with an error; history keeps whatever was already
/// appended and the session stays usable.
pub async fn run_turn(
    conversation: &mut Conversation,
    user_input: &str,
    client: &dyn ReasoningClient,
    tools: &ToolRegistry,
    config: &LoopConfig,
    observer: &dyn TurnObserver,
) -> Result<String> {
    conversation.add_user_message(user_input);
    let definitions = tools.definitions();

    for iteration in 1..=config.max_iterations {
        debug!(iteration, max = config.max_iterations, "turn iteration");

        let response = client
            .chat_with_tools(conversation.api_messages(), definitions.clone())
            .await?;

        let Some(choice) = response.choices.into_iter().next() else {
            warn!("reasoning service returned no choices");
            return Err(crate::error::Error::Reasoning(
                "empty response from reasoning service".to_string(),
            ));
        };
        let message = choice.message;

        let tool_calls = message.tool_calls.clone().unwrap_or_default();
        if tool_calls.is_empty() {
            // Final answer for this turn
            let answer = message.content;
            conversation.add_assistant_message(&answer);
            info!(iteration, "turn completed");
            return Ok(answer);
        }

        info!(count = tool_calls.len(), "reasoning requested tool calls");
        conversation.add_message(message);

        // Sequential, in declared order. Invocations within one turn are
        // independent reads; order only has to match for history tagging.
        for tc in tool_calls {
            let arguments: Value = serde_json::from_str(&tc.function.arguments)
                .unwrap_or_else(|e| {
                    warn!(tool = %tc.function.name, error = %e, "unparseable tool arguments");
                    Value::Object(Default::default())
                });

            observer.on_tool_call(&tc.function.name, &arguments).await;

            let call = ToolCall {
                id: tc.id.clone(),
                name: tc.function.name.clone(),
                arguments,
            };
            let text = match tools.execute(&call).await {
                Ok(result) => result.into_text(),
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "tool execution failed");
                    format!("Tool error: {}", e)
                }
            };

            observer.on_tool_result(&call.name, &text).await;
            conversation.add_message(crate::agent::types::Message::tool(&tc.id, &text));
        }
    }

    warn!(max = config.max_iterations, "iteration budget exhausted");
    conversation.add_assistant_message(MAX_ITERATIONS_MESSAGE);
    Ok(MAX_ITERATIONS_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::prompts::SYSTEM_PROMPT;
    use crate::agent::types::*;
    use crate::error::Error;
    use crate::search::{ResultRecord, SearchBackend, SearchRequest};
    use crate::tools::account_tools;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Reasoning stub replaying a scripted sequence of responses.
    struct ScriptedClient {
        responses: tokio::sync::Mutex<Vec<ChatCompletionResponse>>,
        calls: AtomicU32,
    }

    impl ScriptedClient {
        fn new(mut responses: Vec<ChatCompletionResponse>) -> Self {
            responses.reverse();
            ScriptedClient {
                responses: tokio::sync::Mutex::new(responses),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ReasoningClient for ScriptedClient {
        async fn chat_with_tools(
            &self,
            _messages: Vec<Message>,
            _tools: Vec<ToolDefinition>,
        ) -> Result<ChatCompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().await;
            match responses.pop() {
                Some(r) => Ok(r),
                // Empty script: keep requesting the same tool forever
                None => Ok(tool_call_response("search_salesforce_opportunities")),
            }
        }
    }

    struct StubBackend {
        records: Vec<ResultRecord>,
    }

    #[async_trait]
    impl SearchBackend for StubBackend {
        async fn search(&self, _request: &SearchRequest) -> Result<Vec<ResultRecord>> {
            Ok(self.records.clone())
        }

        async fn read_document(&self, _url: &str) -> Result<String> {
            Ok("No content found.".to_string())
        }
    }

    fn tool_call_response(tool: &str) -> ChatCompletionResponse {
        ChatCompletionResponse {
            choices: vec![Choice {
                message: Message {
                    role: Role::Assistant,
                    content: String::new(),
                    tool_call_id: None,
                    tool_calls: Some(vec![AssistantToolCall {
                        id: "call_1".to_string(),
                        call_type: "function".to_string(),
                        function: FunctionCall {
                            name: tool.to_string(),
                            arguments: "{\"query\":\"Acme renewal\"}".to_string(),
                        },
                    }]),
                },
                finish_reason: Some("tool_calls".to_string()),
            }],
            usage: None,
        }
    }

    fn final_response(text: &str) -> ChatCompletionResponse {
        ChatCompletionResponse {
            choices: vec![Choice {
                message: Message::assistant(text),
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        }
    }

    fn acme_record() -> ResultRecord {
        ResultRecord {
            title: "Acme — Renewal FY26".to_string(),
            url: "https://crm.example/opp/1".to_string(),
            source: "salescloud".to_string(),
            author: None,
            updated: Some("2026-08-12T10:00:00Z".to_string()),
            content: "Renewal closes 2026-08-30.".to_string(),
            error: None,
        }
    }

    #[tokio::test]
    async fn test_loop_terminates_at_iteration_ceiling() {
        let client = ScriptedClient::new(Vec::new()); // always requests a tool
        let tools = account_tools(Arc::new(StubBackend { records: Vec::new() }));
        let mut conv = Conversation::new(SYSTEM_PROMPT);
        let config = LoopConfig { max_iterations: 5 };

        let answer = run_turn(
            &mut conv,
            "When is Acme's renewal?",
            &client,
            &tools,
            &config,
            &NoOpObserver,
        )
        .await
        .unwrap();

        assert_eq!(answer, MAX_ITERATIONS_MESSAGE);
        assert_eq!(client.calls.load(Ordering::SeqCst), 5);
        // Final sentinel is appended so the transcript stays coherent
        assert_eq!(conv.messages.last().unwrap().content, MAX_ITERATIONS_MESSAGE);
    }

    #[tokio::test]
    async fn test_end_to_end_renewal_scenario() {
        let client = ScriptedClient::new(vec![
            tool_call_response("search_salesforce_opportunities"),
            final_response(
                "Acme's renewal closes 2026-08-30. \
                 [Source: Acme — Renewal FY26 (Salesforce, 2026-08-12) - https://crm.example/opp/1]",
            ),
        ]);
        let tools = account_tools(Arc::new(StubBackend {
            records: vec![acme_record()],
        }));
        let mut conv = Conversation::new(SYSTEM_PROMPT);

        let answer = run_turn(
            &mut conv,
            "When is Acme's renewal?",
            &client,
            &tools,
            &LoopConfig::default(),
            &NoOpObserver,
        )
        .await
        .unwrap();

        assert!(answer.contains("Acme — Renewal FY26"));
        assert!(answer.contains("https://crm.example/opp/1"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);

        // History: user, assistant(tool_calls), tool result, final answer
        assert_eq!(conv.messages.len(), 4);
        let tool_msg = &conv.messages[2];
        assert_eq!(tool_msg.role, Role::Tool);
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool_msg.content.contains("Acme — Renewal FY26"));
        assert!(tool_msg.content.contains("https://crm.example/opp/1"));
    }

    #[tokio::test]
    async fn test_unknown_tool_feeds_back_as_text() {
        let client = ScriptedClient::new(vec![
            tool_call_response("search_everything_everywhere"),
            final_response("done"),
        ]);
        let tools = account_tools(Arc::new(StubBackend { records: Vec::new() }));
        let mut conv = Conversation::new(SYSTEM_PROMPT);

        let answer = run_turn(
            &mut conv,
            "hello",
            &client,
            &tools,
            &LoopConfig::default(),
            &NoOpObserver,
        )
        .await
        .unwrap();

        assert_eq!(answer, "done");
        assert!(conv.messages[2]
            .content
            .contains("Unknown tool: search_everything_everywhere"));
    }

    #[tokio::test]
    async fn test_reasoning_failure_aborts_turn_but_keeps_history() {
        struct FailingClient;
        #[async_trait]
        impl ReasoningClient for FailingClient {
            async fn chat_with_tools(
                &self,
                _messages: Vec<Message>,
                _tools: Vec<ToolDefinition>,
            ) -> Result<ChatCompletionResponse> {
                Err(Error::Reasoning("connection refused".to_string()))
            }
        }

        let tools = account_tools(Arc::new(StubBackend { records: Vec::new() }));
        let mut conv = Conversation::new(SYSTEM_PROMPT);

        let err = run_turn(
            &mut conv,
            "hello",
            &FailingClient,
            &tools,
            &LoopConfig::default(),
            &NoOpObserver,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::Reasoning(_)));
        // The user message survives; the next turn can proceed
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(conv.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn test_empty_search_result_flows_back_as_sentinel() {
        let client = ScriptedClient::new(vec![
            tool_call_response("search_salesforce_opportunities"),
            final_response("I could not locate that in Salesforce. Would you like me to search all sources?"),
        ]);
        let tools = account_tools(Arc::new(StubBackend { records: Vec::new() }));
        let mut conv = Conversation::new(SYSTEM_PROMPT);

        run_turn(
            &mut conv,
            "When is Acme's renewal?",
            &client,
            &tools,
            &LoopConfig::default(),
            &NoOpObserver,
        )
        .await
        .unwrap();

        assert_eq!(
            conv.messages[2].content,
            "No results found in Salesforce Opportunities."
        );
    }
}
