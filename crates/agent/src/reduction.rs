//! Context reduction for the budgeted strategy.
//!
//! Three passes, always in this order: truncate oversized tool outputs,
//! window the non-system tail, clip the non-system tail to the character
//! budget. System messages are exempt from every pass. All limits are in
//! characters, not bytes, so multi-byte content never splits mid-scalar.

use sgr_core::config::ReductionConfig;
use sgr_core::message::{Message, Role};

/// Appended to tool outputs cut by [`truncate_tool_outputs`].
pub const TRUNCATION_MARKER: &str = "\n... [tool output truncated]";

/// Apply all three reduction passes.
pub fn reduce(messages: Vec<Message>, config: &ReductionConfig) -> Vec<Message> {
    let messages = truncate_tool_outputs(messages, config.tool_output_max_chars);
    let messages = window_messages(messages, config.keep_last_messages);
    clip_to_char_budget(messages, config.char_budget)
}

/// Cut tool-result messages down to `max_chars`, marking the cut.
pub fn truncate_tool_outputs(mut messages: Vec<Message>, max_chars: usize) -> Vec<Message> {
    for message in &mut messages {
        if message.role == Role::Tool && message.content.chars().count() > max_chars {
            let kept: String = message.content.chars().take(max_chars).collect();
            message.content = format!("{kept}{TRUNCATION_MARKER}");
        }
    }
    messages
}

/// Keep every system message and the last `keep_last` non-system messages,
/// preserving relative order.
pub fn window_messages(messages: Vec<Message>, keep_last: usize) -> Vec<Message> {
    let non_system = messages.iter().filter(|m| !m.is_system()).count();
    let mut to_drop = non_system.saturating_sub(keep_last);
    messages
        .into_iter()
        .filter(|m| {
            if m.is_system() {
                true
            } else if to_drop > 0 {
                to_drop -= 1;
                false
            } else {
                true
            }
        })
        .collect()
}

/// Enforce a character budget over the non-system messages, newest first.
/// System messages always survive in full. The oldest surviving non-system
/// message may be clipped to its trailing slice; everything older is
/// dropped.
pub fn clip_to_char_budget(messages: Vec<Message>, budget: usize) -> Vec<Message> {
    let (system, rest): (Vec<Message>, Vec<Message>) =
        messages.into_iter().partition(Message::is_system);

    let mut kept: Vec<Message> = Vec::new();
    let mut remaining = budget;
    for mut message in rest.into_iter().rev() {
        if remaining == 0 {
            break;
        }
        let len = message.content.chars().count();
        if len <= remaining {
            remaining -= len;
        } else {
            let chars: Vec<char> = message.content.chars().collect();
            message.content = chars[len - remaining..].iter().collect();
            remaining = 0;
        }
        kept.push(message);
    }
    kept.reverse();

    let mut result = system;
    result.extend(kept);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_msg(content: &str) -> Message {
        Message::tool_result("1-action", content)
    }

    #[test]
    fn short_tool_outputs_pass_untouched() {
        let messages = truncate_tool_outputs(vec![tool_msg("short")], 800);
        assert_eq!(messages[0].content, "short");
    }

    #[test]
    fn oversized_tool_outputs_get_the_marker() {
        let long = "x".repeat(1000);
        let messages = truncate_tool_outputs(vec![tool_msg(&long)], 800);
        assert!(messages[0].content.starts_with(&"x".repeat(800)));
        assert!(messages[0].content.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            messages[0].content.chars().count(),
            800 + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn boundary_length_is_not_truncated() {
        let exact = "y".repeat(800);
        let messages = truncate_tool_outputs(vec![tool_msg(&exact)], 800);
        assert_eq!(messages[0].content, exact);
    }

    #[test]
    fn non_tool_messages_are_never_truncated() {
        let long = "z".repeat(1000);
        let messages = truncate_tool_outputs(vec![Message::user(&long)], 800);
        assert_eq!(messages[0].content.chars().count(), 1000);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        // four-byte scalars; a byte-based cut would split one of them
        let long = "🦀".repeat(900);
        let messages = truncate_tool_outputs(vec![tool_msg(&long)], 800);
        assert!(messages[0].content.starts_with(&"🦀".repeat(800)));
        assert!(messages[0].content.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn windowing_keeps_all_system_messages() {
        let messages = vec![
            Message::system("sys"),
            Message::user("one"),
            Message::assistant("two"),
            Message::user("three"),
            Message::assistant("four"),
        ];
        let windowed = window_messages(messages, 2);
        assert_eq!(windowed.len(), 3);
        assert!(windowed[0].is_system());
        assert_eq!(windowed[1].content, "three");
        assert_eq!(windowed[2].content, "four");
    }

    #[test]
    fn windowing_is_a_noop_under_the_limit() {
        let messages = vec![Message::system("sys"), Message::user("one")];
        let windowed = window_messages(messages, 5);
        assert_eq!(windowed.len(), 2);
    }

    #[test]
    fn char_budget_drops_oldest_first() {
        let messages = vec![
            Message::user("a".repeat(50).as_str()),
            Message::user("b".repeat(50).as_str()),
            Message::user("c".repeat(50).as_str()),
        ];
        let clipped = clip_to_char_budget(messages, 100);
        assert_eq!(clipped.len(), 2);
        assert!(clipped[0].content.starts_with('b'));
        assert!(clipped[1].content.starts_with('c'));
    }

    #[test]
    fn crossing_message_keeps_its_trailing_slice() {
        let messages = vec![
            Message::user("old-old-old"),
            Message::user("ABCDEFGHIJ"),
            Message::user("tail"),
        ];
        // budget 10: "tail" (4) + trailing 6 chars of the middle message
        let clipped = clip_to_char_budget(messages, 10);
        assert_eq!(clipped.len(), 2);
        assert_eq!(clipped[0].content, "EFGHIJ");
        assert_eq!(clipped[1].content, "tail");
    }

    #[test]
    fn char_budget_never_touches_system_messages() {
        let messages = vec![
            Message::system("s".repeat(100).as_str()),
            Message::user("u".repeat(50).as_str()),
        ];
        let clipped = clip_to_char_budget(messages, 40);
        assert_eq!(clipped.len(), 2);
        assert!(clipped[0].is_system());
        assert_eq!(clipped[0].content.chars().count(), 100);
        assert_eq!(clipped[1].content, "u".repeat(40));
    }

    #[test]
    fn exhausted_budget_still_keeps_system_messages() {
        let messages = vec![
            Message::user("dropped entirely"),
            Message::system("prompt"),
            Message::user("also dropped"),
        ];
        let clipped = clip_to_char_budget(messages, 0);
        assert_eq!(clipped.len(), 1);
        assert!(clipped[0].is_system());
        assert_eq!(clipped[0].content, "prompt");
    }

    #[test]
    fn reduce_applies_passes_in_order() {
        let config = ReductionConfig {
            tool_output_max_chars: 10,
            keep_last_messages: 2,
            char_budget: 1000,
        };
        let messages = vec![
            Message::system("system prompt"),
            Message::user("dropped by the window"),
            Message::assistant("kept"),
            tool_msg(&"t".repeat(100)),
        ];
        let reduced = reduce(messages, &config);
        assert_eq!(reduced.len(), 3);
        assert!(reduced[0].is_system());
        assert_eq!(reduced[1].content, "kept");
        assert!(reduced[2].content.ends_with(TRUNCATION_MARKER));
    }
}
