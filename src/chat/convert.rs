
use serde_json::Value;

use crate::chat::request::{WireMessage, WireRole};
use crate::core::{ChatRole, Message, ToolCall};

/// Flatten a conversation into the role-tagged text turns the backend accepts.
///
/// The backend has no tool-call representation, so tool calls become an
/// assistant turn listing each call and tool results become user turns
/// prefixed with the originating call id. `System` turns inside the history
/// are dropped; `system_message` is the only system turn sent.
pub fn convert_messages(system_message: Option<&str>, messages: &[Message]) -> Vec<WireMessage> {
    let mut wire = Vec::with_capacity(messages.len() + 1);

    if let Some(system) = system_message.filter(|s| !s.is_empty()) {
        wire.push(WireMessage::new(WireRole::System, system));
    }

    for message in messages {
        match message.role {
            ChatRole::User => {
                wire.push(WireMessage::new(WireRole::User, message.content.as_str()));
            }
            ChatRole::Assistant => {
                if !message.content.is_empty() {
                    wire.push(WireMessage::new(
                        WireRole::Assistant,
                        message.content.as_str(),
                    ));
                }

                if !message.tool_calls.is_empty() {
                    wire.push(WireMessage::new(
                        WireRole::Assistant,
                        describe_tool_calls(&message.tool_calls),
                    ));
                }
            }
            ChatRole::Tool => {
                wire.extend(message.tool_results.iter().map(|result| {
                    WireMessage::new(
                        WireRole::User,
                        format!("Tool result for {}: {}", result.tool_call_id, result.content),
                    )
                }));
            }
            ChatRole::System => {}
        }
    }

    wire
}

fn describe_tool_calls(calls: &[ToolCall]) -> String {
    let mut text = String::from("I need to use the following tools:\n");
    for call in calls {
        text.push_str(&format!(
            "- Tool: {}\n  Arguments: {}\n",
            call.name,
            render_arguments(&call.arguments)
        ));
    }
    text
}

fn render_arguments(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ToolCallResult;
    use serde_json::json;

    fn call(id: &str, name: &str, arguments: Value) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }
    }

    fn result(id: &str, content: &str) -> ToolCallResult {
        ToolCallResult {
            tool_call_id: id.to_string(),
            content: content.to_string(),
        }
    }

    fn sample_history() -> Vec<Message> {
        vec![
            Message::user("What's the weather in Lisbon?"),
            Message::assistant("Let me check.").with_tool_calls(vec![call(
                "call_1",
                "get_weather",
                json!({ "city": "Lisbon" }),
            )]),
            Message::tool_results(vec![result("call_1", "19C, clear")]),
            Message::assistant("It's 19C and clear."),
        ]
    }

    #[test]
    fn test_system_message_comes_first() {
        let mut history = sample_history();
        history.push(Message::system("ignored history system turn"));

        let wire = convert_messages(Some("You are terse."), &history);

        assert_eq!(wire[0], WireMessage::new(WireRole::System, "You are terse."));
        assert_eq!(
            wire.iter().filter(|m| m.role == WireRole::System).count(),
            1
        );
    }

    #[test]
    fn test_empty_system_message_is_skipped() {
        let wire = convert_messages(Some(""), &[Message::user("hi")]);
        assert_eq!(wire, vec![WireMessage::new(WireRole::User, "hi")]);

        let wire = convert_messages(None, &[Message::user("hi")]);
        assert_eq!(wire, vec![WireMessage::new(WireRole::User, "hi")]);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let history = sample_history();
        assert_eq!(
            convert_messages(Some("sys"), &history),
            convert_messages(Some("sys"), &history)
        );
    }

    #[test]
    fn test_assistant_with_text_and_tool_calls_emits_two_turns() {
        let history = vec![Message::assistant("Checking.").with_tool_calls(vec![
            call("call_1", "get_weather", json!({ "city": "Lisbon" })),
            call("call_2", "get_time", json!("{\"tz\":\"UTC\"}")),
        ])];

        let wire = convert_messages(None, &history);

        assert_eq!(
            wire,
            vec![
                WireMessage::new(WireRole::Assistant, "Checking."),
                WireMessage::new(
                    WireRole::Assistant,
                    "I need to use the following tools:\n\
                     - Tool: get_weather\n  Arguments: {\"city\":\"Lisbon\"}\n\
                     - Tool: get_time\n  Arguments: {\"tz\":\"UTC\"}\n"
                ),
            ]
        );
    }

    #[test]
    fn test_empty_assistant_with_tool_calls_emits_one_turn() {
        let history = vec![Message::assistant("").with_tool_calls(vec![call(
            "call_1",
            "list_files",
            json!({}),
        )])];

        let wire = convert_messages(None, &history);

        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].role, WireRole::Assistant);
        assert!(wire[0].content.contains("- Tool: list_files"));
    }

    #[test]
    fn test_empty_assistant_without_tool_calls_emits_nothing() {
        let wire = convert_messages(None, &[Message::assistant("")]);
        assert!(wire.is_empty());
    }

    #[test]
    fn test_tool_results_become_user_turns() {
        let history = vec![Message::tool_results(vec![
            result("call_1", "first"),
            result("call_2", "second"),
            result("call_3", "third"),
        ])];

        let wire = convert_messages(None, &history);

        assert_eq!(wire.len(), 3);
        assert!(wire.iter().all(|m| m.role == WireRole::User));
        assert_eq!(wire[1].content, "Tool result for call_2: second");
    }

    #[test]
    fn test_history_order_is_preserved() {
        let wire = convert_messages(None, &sample_history());
        let roles: Vec<WireRole> = wire.iter().map(|m| m.role).collect();

        assert_eq!(
            roles,
            vec![
                WireRole::User,
                WireRole::Assistant,
                WireRole::Assistant,
                WireRole::User,
                WireRole::Assistant,
            ]
        );
    }
}
