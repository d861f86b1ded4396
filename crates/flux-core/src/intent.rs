//! Intent parsing: raw text to a structured, still-untyped `Intent`.
//!
//! Mirrors the teacher's separation of "raw input" from "validated
//! instruction" (`game-core`'s `Action` vs the runtime's action
//! providers), but collapses it into a single free function since intent
//! parsing here has no oracle dependency — it is pure string splitting.

use std::collections::HashSet;

use crate::ids::{Id, IdSource};
use crate::urn::{ActorUrn, PlaceUrn, SessionUrn};
use crate::world::Tick;

pub type IntentId = Id;

/// A parsed, still-untyped command-input with a unique id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intent {
    pub id: IntentId,
    pub ts: Tick,
    pub actor: ActorUrn,
    pub location: PlaceUrn,
    pub session: Option<SessionUrn>,
    pub text: String,
    pub normalized: String,
    pub prefix: String,
    pub verb: String,
    /// Positional arguments after the verb, original case preserved.
    pub tokens: Vec<String>,
    /// Normalized token set, for membership checks independent of order.
    pub uniques: HashSet<String>,
}

/// Parses raw actor text into an [`Intent`].
///
/// Algorithm (spec §4.2):
/// 1. Trim and lower-case to produce `normalized`.
/// 2. First whitespace token is `prefix`; second is `verb` for
///    `<prefix> <verb> ...` commands. Single-word commands leave `verb`
///    empty.
/// 3. Remaining tokens populate `tokens` (original case) and `uniques`
///    (normalized set).
/// 4. A `@`-prefixed first token is a literal verb command: `verb` is the
///    whole `@word`, `tokens` follow from the second token on.
/// 5. `id` comes from the injected [`IdSource`]; `ts` from the caller.
pub fn parse_intent(
    text: &str,
    actor: ActorUrn,
    location: PlaceUrn,
    session: Option<SessionUrn>,
    ts: Tick,
    ids: &mut dyn IdSource,
) -> Intent {
    let normalized = text.trim().to_lowercase();
    let original_words: Vec<&str> = text.trim().split_whitespace().collect();
    let normalized_words: Vec<&str> = normalized.split_whitespace().collect();

    let (prefix, verb, token_start) = if original_words
        .first()
        .is_some_and(|w| w.starts_with('@'))
    {
        let verb = normalized_words.first().copied().unwrap_or_default().to_string();
        (String::new(), verb, 1)
    } else {
        let prefix = normalized_words.first().copied().unwrap_or_default().to_string();
        let verb = normalized_words.get(1).copied().unwrap_or_default().to_string();
        (prefix, verb, 2)
    };

    let tokens: Vec<String> = original_words
        .iter()
        .skip(token_start)
        .map(|s| s.to_string())
        .collect();
    let uniques: HashSet<String> = normalized_words
        .iter()
        .skip(token_start)
        .map(|s| s.to_string())
        .collect();

    Intent {
        id: ids.next_id(),
        ts,
        actor,
        location,
        session,
        text: text.to_string(),
        normalized,
        prefix,
        verb,
        tokens,
        uniques,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CounterIdSource;

    fn actor() -> ActorUrn {
        "flux:actor:alice".parse().unwrap()
    }

    fn place() -> PlaceUrn {
        "flux:place:town:square".parse().unwrap()
    }

    #[test]
    fn single_word_command_has_empty_verb() {
        let mut ids = CounterIdSource::new("intent");
        let intent = parse_intent("look", actor(), place(), None, 0, &mut ids);
        assert_eq!(intent.prefix, "look");
        assert_eq!(intent.verb, "");
        assert!(intent.tokens.is_empty());
    }

    #[test]
    fn two_word_command_splits_prefix_and_verb() {
        let mut ids = CounterIdSource::new("intent");
        let intent = parse_intent("party invite Bob", actor(), place(), None, 0, &mut ids);
        assert_eq!(intent.prefix, "party");
        assert_eq!(intent.verb, "invite");
        assert_eq!(intent.tokens, vec!["Bob".to_string()]);
    }

    #[test]
    fn at_prefixed_verb_is_literal() {
        let mut ids = CounterIdSource::new("intent");
        let intent = parse_intent(
            "@credit flux:actor:bob gold 100",
            actor(),
            place(),
            None,
            0,
            &mut ids,
        );
        assert_eq!(intent.prefix, "");
        assert_eq!(intent.verb, "@credit");
        assert_eq!(
            intent.tokens,
            vec!["flux:actor:bob".to_string(), "gold".to_string(), "100".to_string()]
        );
    }

    #[test]
    fn tokens_preserve_case_uniques_are_normalized() {
        let mut ids = CounterIdSource::new("intent");
        let intent = parse_intent("shell rename NewName", actor(), place(), None, 0, &mut ids);
        assert_eq!(intent.tokens, vec!["NewName".to_string()]);
        assert!(intent.uniques.contains("newname"));
    }
}
