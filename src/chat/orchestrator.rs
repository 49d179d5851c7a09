// Two-phase tool-calling orchestration
//
// Phase one sends the composed context with the full tool catalog and lets
// the model decide whether it needs data. Phase two, entered only when the
// model requested tools, executes every call in model order, feeds the
// results back and asks for the final answer with no catalog attached.
// Nothing is persisted across requests.

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::providers::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, CompletionBackend};
use crate::tools::ToolRegistry;

use super::prompt::system_prompt;

/// How many trailing history messages are kept in the context window.
const HISTORY_LIMIT: usize = 10;

/// Fixed low-randomness setting for factual phrasing.
const TEMPERATURE: f32 = 0.3;

/// One prior message supplied by the caller.
#[derive(Debug, Clone)]
pub struct HistoryTurn {
    pub role: String,
    pub content: String,
}

pub struct Orchestrator {
    backend: Arc<dyn CompletionBackend>,
    registry: Arc<ToolRegistry>,
    model: String,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        registry: Arc<ToolRegistry>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            registry,
            model: model.into(),
        }
    }

    /// Run one full conversation turn and return the final answer text.
    pub async fn run_turn(&self, message: &str, history: &[HistoryTurn]) -> Result<String> {
        let mut messages = self.build_context(message, history);

        let first = self.initial_completion(&messages).await?;
        let assistant = first
            .message()
            .context("model returned no choices")?
            .clone();

        let tool_calls = assistant.tool_calls.clone().unwrap_or_default();
        if tool_calls.is_empty() {
            // No data needed: the first response is the final answer.
            return assistant.content.context("model returned an empty message");
        }

        messages.push(assistant);

        for call in &tool_calls {
            let args: Value =
                serde_json::from_str(&call.function.arguments).unwrap_or(Value::Object(Default::default()));
            debug!(tool = %call.function.name, args = %args, "model requested tool");

            let payload = self.registry.dispatch(&call.function.name, args).await;
            let content =
                serde_json::to_string(&payload).context("failed to serialize tool result")?;
            messages.push(ChatMessage::tool(call.id.clone(), content));
        }

        info!(tools = tool_calls.len(), "tool results attached, requesting final answer");

        let last = self.final_completion(&messages).await?;
        last.message()
            .context("model returned no choices")?
            .content
            .clone()
            .context("model returned an empty final message")
    }

    /// System instructions + trimmed history + current user message.
    fn build_context(&self, message: &str, history: &[HistoryTurn]) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(system_prompt(Local::now().date_naive()))];

        let start = history.len().saturating_sub(HISTORY_LIMIT);
        for turn in &history[start..] {
            messages.push(ChatMessage::new(turn.role.clone(), turn.content.clone()));
        }

        messages.push(ChatMessage::user(message));
        messages
    }

    /// Phase one: completion with the full tool catalog, tool choice left
    /// to the model.
    async fn initial_completion(&self, messages: &[ChatMessage]) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: Some(TEMPERATURE),
            tools: Some(self.registry.declarations()),
            tool_choice: Some("auto".to_string()),
        };
        self.backend.complete(&request).await
    }

    /// Phase two: completion over the full exchange, no catalog attached.
    async fn final_completion(&self, messages: &[ChatMessage]) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: Some(TEMPERATURE),
            tools: None,
            tool_choice: None,
        };
        self.backend.complete(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Choice, FunctionCall, ToolCall};
    use crate::tools::registry::Tool;
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Backend that replays canned responses and records every request.
    struct ScriptedBackend {
        responses: Mutex<Vec<ChatCompletionResponse>>,
        requests: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<ChatCompletionResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatCompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
            self.requests.lock().unwrap().push(request.clone());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                anyhow::bail!("no scripted response left");
            }
            Ok(responses.remove(0))
        }
    }

    fn text_response(text: &str) -> ChatCompletionResponse {
        ChatCompletionResponse {
            id: "chatcmpl-test".to_string(),
            model: "gpt-4.1-mini".to_string(),
            choices: vec![Choice {
                index: 0,
                message: ChatMessage::assistant(text),
                finish_reason: Some("stop".to_string()),
            }],
            usage: None,
        }
    }

    fn tool_call_response(calls: Vec<(&str, &str, &str)>) -> ChatCompletionResponse {
        let tool_calls = calls
            .into_iter()
            .map(|(id, name, arguments)| ToolCall {
                id: id.to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            })
            .collect();
        ChatCompletionResponse {
            id: "chatcmpl-test".to_string(),
            model: "gpt-4.1-mini".to_string(),
            choices: vec![Choice {
                index: 0,
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: None,
                    tool_calls: Some(tool_calls),
                    tool_call_id: None,
                },
                finish_reason: Some("tool_calls".to_string()),
            }],
            usage: None,
        }
    }

    struct CountingTool {
        payload: Value,
        invocations: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            "aggregate_statistics"
        }

        fn description(&self) -> &str {
            "school statistics"
        }

        fn parameters(&self) -> Value {
            json!({ "type": "object", "properties": {} })
        }

        async fn execute(&self, _args: Value) -> Result<Value> {
            *self.invocations.lock().unwrap() += 1;
            Ok(self.payload.clone())
        }
    }

    fn counting_registry(payload: Value) -> (Arc<ToolRegistry>, Arc<Mutex<usize>>) {
        let invocations = Arc::new(Mutex::new(0));
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CountingTool {
            payload,
            invocations: Arc::clone(&invocations),
        }));
        (Arc::new(registry), invocations)
    }

    #[tokio::test]
    async fn test_greeting_answered_without_tools() {
        let backend = Arc::new(ScriptedBackend::new(vec![text_response("Olá! Como posso ajudar?")]));
        let (registry, invocations) = counting_registry(json!({}));
        let orchestrator = Orchestrator::new(backend.clone(), registry, "gpt-4.1-mini");

        let answer = orchestrator.run_turn("bom dia!", &[]).await.unwrap();

        assert_eq!(answer, "Olá! Como posso ajudar?");
        assert_eq!(*invocations.lock().unwrap(), 0);
        // Single round-trip, catalog attached
        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].tools.is_some());
    }

    #[tokio::test]
    async fn test_delinquency_question_runs_statistics_once() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            tool_call_response(vec![("call_1", "aggregate_statistics", "{}")]),
            text_response("Há 7 alunos inadimplentes."),
        ]));
        let (registry, invocations) = counting_registry(json!({ "alunos_inadimplentes": 7 }));
        let orchestrator = Orchestrator::new(backend.clone(), registry, "gpt-4.1-mini");

        let answer = orchestrator
            .run_turn("quantos alunos estão inadimplentes?", &[])
            .await
            .unwrap();

        assert_eq!(answer, "Há 7 alunos inadimplentes.");
        assert_eq!(*invocations.lock().unwrap(), 1);

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);

        // Second call sees the tool result and carries no catalog.
        let followup = &requests[1];
        assert!(followup.tools.is_none());
        let tool_message = followup
            .messages
            .iter()
            .find(|m| m.role == "tool")
            .expect("tool result message attached");
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool_message.content.as_ref().unwrap().contains("alunos_inadimplentes"));
    }

    #[tokio::test]
    async fn test_unknown_tool_contained_in_turn() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            tool_call_response(vec![("call_1", "drop_all_tables", "{}")]),
            text_response("Não consegui executar essa consulta."),
        ]));
        let (registry, _) = counting_registry(json!({}));
        let orchestrator = Orchestrator::new(backend.clone(), registry, "gpt-4.1-mini");

        let answer = orchestrator.run_turn("faça algo estranho", &[]).await.unwrap();

        assert_eq!(answer, "Não consegui executar essa consulta.");
        let requests = backend.requests();
        let tool_message = requests[1]
            .messages
            .iter()
            .find(|m| m.role == "tool")
            .unwrap();
        assert!(tool_message.content.as_ref().unwrap().contains("tool not found"));
    }

    #[tokio::test]
    async fn test_results_attached_in_model_order() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            tool_call_response(vec![
                ("call_a", "aggregate_statistics", "{}"),
                ("call_b", "aggregate_statistics", "{}"),
            ]),
            text_response("Pronto."),
        ]));
        let (registry, invocations) = counting_registry(json!({ "total_alunos": 42 }));
        let orchestrator = Orchestrator::new(backend.clone(), registry, "gpt-4.1-mini");

        orchestrator.run_turn("estatísticas, duas vezes", &[]).await.unwrap();

        assert_eq!(*invocations.lock().unwrap(), 2);
        let requests = backend.requests();
        let ids: Vec<_> = requests[1]
            .messages
            .iter()
            .filter(|m| m.role == "tool")
            .map(|m| m.tool_call_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["call_a", "call_b"]);
    }

    #[tokio::test]
    async fn test_history_trimmed_to_last_ten() {
        let backend = Arc::new(ScriptedBackend::new(vec![text_response("ok")]));
        let (registry, _) = counting_registry(json!({}));
        let orchestrator = Orchestrator::new(backend.clone(), registry, "gpt-4.1-mini");

        let history: Vec<HistoryTurn> = (0..15)
            .map(|i| HistoryTurn {
                role: if i % 2 == 0 { "user" } else { "assistant" }.to_string(),
                content: format!("mensagem {}", i),
            })
            .collect();

        orchestrator.run_turn("e agora?", &history).await.unwrap();

        let request = &backend.requests()[0];
        // system + 10 history + current user message
        assert_eq!(request.messages.len(), 12);
        assert_eq!(request.messages[1].content.as_deref(), Some("mensagem 5"));
        assert_eq!(
            request.messages.last().unwrap().content.as_deref(),
            Some("e agora?")
        );
    }

    #[tokio::test]
    async fn test_model_fault_aborts_request() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let (registry, _) = counting_registry(json!({}));
        let orchestrator = Orchestrator::new(backend, registry, "gpt-4.1-mini");

        let result = orchestrator.run_turn("oi", &[]).await;
        assert!(result.is_err());
    }
}
