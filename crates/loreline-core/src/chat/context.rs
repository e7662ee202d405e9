//! Context assembly.
//!
//! Rebuilds the ordered message list for one generation call from the
//! campaign prompt and its persisted turns. Pure: no I/O, no truncation.

use loreline_types::chat::{ChatTurn, NewTurn};
use loreline_types::config::{CampaignConfig, FirstTurnPolicy};
use loreline_types::llm::Message;

/// The message list for one call plus what the persisted turn should record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    pub messages: Vec<Message>,
    /// The user text actually sent as the final message.
    pub user_input: String,
    /// True when no turns existed and the bootstrap exchange was synthesized.
    /// The caller must persist the sentinel along with the new exchange.
    pub bootstrapped: bool,
}

/// Builds generation contexts for campaigns.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    acknowledgment: String,
    policy: FirstTurnPolicy,
    placeholder: String,
}

impl ContextAssembler {
    pub fn new(
        acknowledgment: impl Into<String>,
        policy: FirstTurnPolicy,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            acknowledgment: acknowledgment.into(),
            policy,
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(config: &CampaignConfig) -> Self {
        Self::new(
            config.acknowledgment.clone(),
            config.first_turn_policy,
            config.first_turn_placeholder.clone(),
        )
    }

    /// The priming exchange: `[user: prompt, model: acknowledgment]`.
    pub fn bootstrap(&self, prompt: &str) -> Vec<Message> {
        vec![
            Message::user(prompt),
            Message::model(self.acknowledgment.as_str()),
        ]
    }

    /// The priming exchange as a persistable turn.
    pub fn sentinel(&self, prompt: &str) -> NewTurn {
        NewTurn::new(prompt, self.acknowledgment.as_str())
    }

    /// Assemble the context for `input`.
    ///
    /// `turns` may arrive in any order; they are sorted oldest-first by
    /// `(created_at, id)`. A history holding only the sentinel is the
    /// opening state, same as no history: the first-turn policy applies.
    pub fn assemble(&self, prompt: &str, turns: &[ChatTurn], input: &str) -> AssembledContext {
        if turns.is_empty() || self.is_sentinel_only(prompt, turns) {
            let user_input = match self.policy {
                FirstTurnPolicy::Preserve => input.to_string(),
                FirstTurnPolicy::Discard => self.placeholder.clone(),
            };
            let mut messages = self.bootstrap(prompt);
            messages.push(Message::user(user_input.as_str()));
            return AssembledContext {
                messages,
                user_input,
                bootstrapped: turns.is_empty(),
            };
        }

        let mut ordered: Vec<&ChatTurn> = turns.iter().collect();
        ordered.sort_by_key(|t| (t.created_at, t.id));

        let mut messages = Vec::with_capacity(ordered.len() * 2 + 1);
        for turn in ordered {
            messages.push(Message::user(turn.user_message.as_str()));
            messages.push(Message::model(turn.model_response.as_str()));
        }
        messages.push(Message::user(input));

        AssembledContext {
            messages,
            user_input: input.to_string(),
            bootstrapped: false,
        }
    }

    fn is_sentinel_only(&self, prompt: &str, turns: &[ChatTurn]) -> bool {
        match turns {
            [only] => only.user_message == prompt && only.model_response == self.acknowledgment,
            _ => false,
        }
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::from_config(&CampaignConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use loreline_types::llm::MessageRole;
    use uuid::Uuid;

    fn turns(pairs: &[(&str, &str)]) -> Vec<ChatTurn> {
        let campaign_id = Uuid::now_v7();
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        pairs
            .iter()
            .enumerate()
            .map(|(i, (u, r))| ChatTurn {
                id: i as i64 + 1,
                campaign_id,
                user_message: u.to_string(),
                model_response: r.to_string(),
                created_at: base + Duration::seconds(i as i64),
            })
            .collect()
    }

    fn contents(ctx: &AssembledContext) -> Vec<(MessageRole, &str)> {
        ctx.messages
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect()
    }

    #[test]
    fn test_zero_turns_preserve_policy() {
        let assembler = ContextAssembler::default();
        let ctx = assembler.assemble("You are the narrator.", &[], "I enter the tavern");

        assert!(ctx.bootstrapped);
        assert_eq!(ctx.user_input, "I enter the tavern");
        assert_eq!(
            contents(&ctx),
            vec![
                (MessageRole::User, "You are the narrator."),
                (MessageRole::Model, "Understood"),
                (MessageRole::User, "I enter the tavern"),
            ]
        );
    }

    #[test]
    fn test_zero_turns_discard_policy() {
        let assembler = ContextAssembler::new("Understood", FirstTurnPolicy::Discard, "start");
        let ctx = assembler.assemble("prompt", &[], "ignored input");

        assert_eq!(ctx.user_input, "start");
        assert_eq!(ctx.messages.len(), 3);
        assert_eq!(ctx.messages[2], Message::user("start"));
    }

    #[test]
    fn test_turns_alternate_oldest_first() {
        let assembler = ContextAssembler::default();
        let history = turns(&[("u1", "r1"), ("u2", "r2")]);
        let ctx = assembler.assemble("prompt", &history, "u3");

        assert!(!ctx.bootstrapped);
        assert_eq!(
            contents(&ctx),
            vec![
                (MessageRole::User, "u1"),
                (MessageRole::Model, "r1"),
                (MessageRole::User, "u2"),
                (MessageRole::Model, "r2"),
                (MessageRole::User, "u3"),
            ]
        );
    }

    #[test]
    fn test_turns_are_resorted_when_given_newest_first() {
        let assembler = ContextAssembler::default();
        let mut history = turns(&[("u1", "r1"), ("u2", "r2"), ("u3", "r3")]);
        history.reverse();
        let ctx = assembler.assemble("prompt", &history, "u4");

        let users: Vec<&str> = ctx
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(users, vec!["u1", "u2", "u3", "u4"]);
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_id() {
        let assembler = ContextAssembler::default();
        let mut history = turns(&[("first", "a"), ("second", "b")]);
        let at = history[0].created_at;
        history[1].created_at = at;
        history.swap(0, 1);

        let ctx = assembler.assemble("prompt", &history, "next");
        assert_eq!(ctx.messages[0].content, "first");
        assert_eq!(ctx.messages[2].content, "second");
    }

    #[test]
    fn test_sentinel_history_matches_bootstrap() {
        let assembler = ContextAssembler::default();
        let fresh = assembler.assemble("prompt", &[], "go");

        let sentinel = assembler.sentinel("prompt");
        let history = turns(&[(
            sentinel.user_message.as_str(),
            sentinel.model_response.as_str(),
        )]);
        let after_reset = assembler.assemble("prompt", &history, "go");

        assert_eq!(fresh.messages, after_reset.messages);
        assert!(fresh.bootstrapped);
        assert!(!after_reset.bootstrapped);
    }

    #[test]
    fn test_sentinel_history_applies_discard_policy() {
        let assembler = ContextAssembler::new("Understood", FirstTurnPolicy::Discard, "start");
        let fresh = assembler.assemble("prompt", &[], "hello");

        let sentinel = assembler.sentinel("prompt");
        let history = turns(&[(
            sentinel.user_message.as_str(),
            sentinel.model_response.as_str(),
        )]);
        let after_reset = assembler.assemble("prompt", &history, "hello");

        assert_eq!(after_reset.user_input, "start");
        assert_eq!(fresh.messages, after_reset.messages);
    }

    #[test]
    fn test_single_real_turn_is_not_the_opening() {
        let assembler = ContextAssembler::new("Understood", FirstTurnPolicy::Discard, "start");
        let history = turns(&[("prompt", "A different reply")]);
        let ctx = assembler.assemble("prompt", &history, "hello");

        assert_eq!(ctx.user_input, "hello");
        assert_eq!(ctx.messages.len(), 3);
        assert_eq!(ctx.messages[1].content, "A different reply");
    }

    #[test]
    fn test_long_history_is_not_truncated() {
        let assembler = ContextAssembler::default();
        let pairs: Vec<(String, String)> = (0..200)
            .map(|i| (format!("u{i}"), format!("r{i}")))
            .collect();
        let refs: Vec<(&str, &str)> = pairs.iter().map(|(u, r)| (u.as_str(), r.as_str())).collect();
        let ctx = assembler.assemble("prompt", &turns(&refs), "last");
        assert_eq!(ctx.messages.len(), 401);
    }
}
