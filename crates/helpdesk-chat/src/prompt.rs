//! Prompt construction for the generation backend.

use helpdesk_core::types::{Message, Role};

/// Number of most recent history entries sent as context.
pub const CONTEXT_WINDOW: usize = 10;

/// Persona given to the model on every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI customer support agent. Your role is to:

1. Provide friendly, professional, and helpful responses
2. Ask clarifying questions when needed
3. Offer practical solutions to customer problems
4. Be empathetic and understanding
5. Keep responses concise but informative
6. If you don't know something, admit it and offer to escalate to a human agent

Always maintain a helpful and positive tone. Focus on solving the customer's problem efficiently.";

/// The most recent `CONTEXT_WINDOW` entries of `history`, oldest first.
pub fn context_window(history: &[Message]) -> &[Message] {
    let start = history.len().saturating_sub(CONTEXT_WINDOW);
    &history[start..]
}

/// Multi-turn prompt: system line, recent history, the new user line and an
/// open `Assistant:` line for the model to complete.
pub fn build_context_prompt(system: &str, history: &[Message], user_message: &str) -> String {
    let window = context_window(history);
    let mut lines = Vec::with_capacity(window.len() + 3);

    lines.push(format!("System: {}", system));
    for message in window {
        lines.push(format!("{}: {}", message.role.prompt_label(), message.content));
    }
    lines.push(format!("{}: {}", Role::User.prompt_label(), user_message));
    lines.push(format!("{}:", Role::Assistant.prompt_label()));

    lines.join("\n")
}

/// Single-turn prompt without history.
pub fn build_simple_prompt(system: &str, user_message: &str) -> String {
    format!("{}\n\nUser: {}\nAssistant:", system, user_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                let role = if i % 2 == 0 { Role::User } else { Role::Assistant };
                Message::new("s", role, format!("turn {}", i))
            })
            .collect()
    }

    #[test]
    fn test_context_prompt_without_history() {
        let prompt = build_context_prompt("Be nice.", &[], "Hi");
        assert_eq!(prompt, "System: Be nice.\nUser: Hi\nAssistant:");
    }

    #[test]
    fn test_context_prompt_labels_roles() {
        let prompt = build_context_prompt("Be nice.", &history(2), "Next");
        assert_eq!(
            prompt,
            "System: Be nice.\nUser: turn 0\nAssistant: turn 1\nUser: Next\nAssistant:"
        );
    }

    #[test]
    fn test_context_window_keeps_most_recent_ten() {
        let h = history(14);
        let window = context_window(&h);
        assert_eq!(window.len(), CONTEXT_WINDOW);
        assert_eq!(window[0].content, "turn 4");
        assert_eq!(window[9].content, "turn 13");

        let prompt = build_context_prompt("S", &h, "now");
        assert!(!prompt.contains("turn 3\n"));
        assert!(prompt.contains("turn 4"));
        assert_eq!(prompt.lines().count(), 1 + CONTEXT_WINDOW + 2);
    }

    #[test]
    fn test_context_window_short_history_untouched() {
        let h = history(3);
        assert_eq!(context_window(&h).len(), 3);
    }

    #[test]
    fn test_simple_prompt_format() {
        assert_eq!(
            build_simple_prompt("Be nice.", "Hello"),
            "Be nice.\n\nUser: Hello\nAssistant:"
        );
    }

    #[test]
    fn test_system_prompt_describes_support_agent() {
        assert!(SYSTEM_PROMPT.starts_with("You are a helpful AI customer support agent."));
        assert!(SYSTEM_PROMPT.contains("escalate to a human agent"));
    }
}
