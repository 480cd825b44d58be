//! Interactive loop integration tests: input lines through dispatcher and transport to output.

use async_trait::async_trait;
use mcp_intent::repl;
use mcp_intent::resolve::{
    AssistedResolver, CompletionBackend, Dispatcher, Session, WeatherIntercept,
    NOT_UNDERSTOOD_MESSAGE,
};
use mcp_intent::transport::{ToolOutput, ToolTransport};
use mcp_intent::types::Config;
use mcp_intent::{Error, Result, ToolDescriptor, ToolInvocation};
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn calculator_tools() -> Vec<ToolDescriptor> {
    let binary = json!({
        "type": "object",
        "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
        "required": ["a", "b"]
    });
    vec![
        ToolDescriptor::from_input_schema("add", Some("Add two numbers".into()), &binary),
        ToolDescriptor::from_input_schema("subtract", Some("Subtract b from a".into()), &binary),
        ToolDescriptor::from_input_schema(
            "sqrt",
            None,
            &json!({"properties": {"a": {"type": "integer"}}, "required": ["a"]}),
        ),
        ToolDescriptor::from_input_schema(
            "get_recent_calculations",
            Some("Recent calculation log".into()),
            &json!({"properties": {"n": {"type": "integer", "default": 5}}}),
        ),
        ToolDescriptor::from_input_schema(
            "get_weather_forecast",
            None,
            &json!({"properties": {"city_name": {"type": "string"}}, "required": ["city_name"]}),
        ),
    ]
}

/// In-process tool server that records every call it receives.
#[derive(Debug, Clone, Default)]
struct FakeCalculator {
    calls: Arc<Mutex<Vec<ToolInvocation>>>,
}

fn int_arg(args: &Map<String, Value>, key: &str) -> Result<i64> {
    args.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::tool_call(format!("missing integer '{}'", key)))
}

#[async_trait]
impl ToolTransport for FakeCalculator {
    async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>> {
        Ok(calculator_tools())
    }

    async fn call_tool(&mut self, name: &str, args: Map<String, Value>) -> Result<ToolOutput> {
        self.calls
            .lock()
            .unwrap()
            .push(ToolInvocation::new(name, args.clone()));
        let text = match name {
            "add" => (int_arg(&args, "a")? + int_arg(&args, "b")?).to_string(),
            "subtract" => (int_arg(&args, "a")? - int_arg(&args, "b")?).to_string(),
            "sqrt" => (int_arg(&args, "a")? as f64).sqrt().to_string(),
            "get_recent_calculations" => "[]".to_string(),
            other => return Err(Error::tool_call(format!("Unknown tool: {}", other))),
        };
        Ok(ToolOutput::text(text))
    }
}

/// Assistant that is never reachable.
#[derive(Debug)]
struct OfflineAssistant;

#[async_trait]
impl CompletionBackend for OfflineAssistant {
    async fn complete(&self, _instructions: &str, _user_text: &str) -> Result<String> {
        Err(Error::assisted_transport("connection refused"))
    }
}

/// Assistant that always picks `subtract(10, 4)`.
#[derive(Debug)]
struct SubtractingAssistant;

#[async_trait]
impl CompletionBackend for SubtractingAssistant {
    async fn complete(&self, _instructions: &str, _user_text: &str) -> Result<String> {
        Ok(r#"{"tool": "subtract", "args": {"a": 10, "b": 4}}"#.to_string())
    }
}

fn dispatcher(backend: Box<dyn CompletionBackend>) -> Dispatcher {
    Dispatcher::new(
        vec![Box::new(WeatherIntercept::new("Nashville"))],
        Some(AssistedResolver::new(backend, Duration::from_secs(1))),
    )
}

async fn run_script(dispatcher: &Dispatcher, script: &str) -> (String, Vec<ToolInvocation>) {
    let transport = FakeCalculator::default();
    let calls = transport.calls.clone();
    let mut session = Session::connect(Box::new(transport)).await.unwrap();

    let mut output: Vec<u8> = Vec::new();
    repl::run(script.as_bytes(), &mut output, dispatcher, &mut session)
        .await
        .unwrap();

    let recorded = calls.lock().unwrap().clone();
    (String::from_utf8(output).unwrap(), recorded)
}

#[tokio::test]
async fn test_offline_session_uses_intercepts_and_keywords() {
    let dispatcher = dispatcher(Box::new(OfflineAssistant));
    let script = "tools\n\nadd 5 and 3\nsqrt 16\nrecent\nadd 5\nweather\nquit\nadd 1 1\n";

    let (output, calls) = run_script(&dispatcher, script).await;

    assert!(output.contains("=== Available MCP Tools ==="));
    assert!(output.contains("- add: Add two numbers"));
    assert!(output.contains("- sqrt: (no description)"));
    assert!(output.contains("add(a=5, b=3) = 8"));
    assert!(output.contains("sqrt(a=16) = 4"));
    assert!(output.contains("get_recent_calculations() = []"));
    assert!(output.contains(NOT_UNDERSTOOD_MESSAGE));
    assert!(output.contains("Error: tool call failed: Unknown tool: weather"));
    assert!(output.trim_end().ends_with("Bye!"));

    let names: Vec<&str> = calls.iter().map(|c| c.tool_name.as_str()).collect();
    assert_eq!(names, vec!["add", "sqrt", "get_recent_calculations", "weather"]);
    assert_eq!(calls[3].args["location"], "Nashville");
}

#[tokio::test]
async fn test_assistant_answer_takes_priority_over_keywords() {
    let dispatcher = dispatcher(Box::new(SubtractingAssistant));

    let (output, calls) = run_script(&dispatcher, "add 5 and 3\nexit\n").await;

    assert!(output.contains("subtract(a=10, b=4) = 6"));
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tool_name, "subtract");
}

#[tokio::test]
async fn test_intercept_wins_over_assistant() {
    let dispatcher = dispatcher(Box::new(SubtractingAssistant));

    let (_, calls) = run_script(&dispatcher, "What's the weather in Memphis\n").await;

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tool_name, "weather");
    assert_eq!(calls[0].args["location"], "memphis");
}

#[tokio::test]
async fn test_eof_ends_loop() {
    let dispatcher = Dispatcher::new(vec![], None);
    let (output, calls) = run_script(&dispatcher, "9 minus 4").await;

    assert!(output.contains("subtract(a=9, b=4) = 5"));
    assert_eq!(calls.len(), 1);
}

#[tokio::test]
async fn test_dispatcher_from_config_without_assistant() {
    let mut config = Config::default();
    config.assistant.enabled = false;
    config.intercepts.default_location = "Oslo".to_string();
    let dispatcher = Dispatcher::from_config(&config).unwrap();

    let (_, calls) = run_script(&dispatcher, "forecast\nadd 2 2\n").await;

    assert_eq!(calls[0].args["location"], "Oslo");
    assert_eq!(calls[1].tool_name, "add");
}
