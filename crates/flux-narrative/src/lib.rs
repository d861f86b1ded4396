//! Narrative templates: the `(event, recipient) -> text` map spec.md
//! scopes as a stub (§2 item 11). Every lookup returns a pair of
//! strings, one for the actor who caused the event and one for anyone
//! else who observed it; callers pick whichever fits the recipient.
//!
//! Only a representative subset of [`EventType`] is covered — enough to
//! narrate a session end to end, not the full wire vocabulary. Errors
//! get their own table, keyed by [`ErrorCode`] rather than event type,
//! since the engine's declared errors carry no narrative payload of
//! their own (spec.md §7).

use flux_core::context::Locale;
use flux_core::error::ErrorCode;
use flux_core::event::{EventPayload, EventType, WorldEvent};

/// A rendered line pair: what the causing actor sees, and what an
/// observer at the same location sees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrativeLine {
    pub to_self: String,
    pub to_observer: String,
}

impl NarrativeLine {
    fn new(to_self: impl Into<String>, to_observer: impl Into<String>) -> Self {
        Self {
            to_self: to_self.into(),
            to_observer: to_observer.into(),
        }
    }
}

/// Renders `event` for `locale`, or `None` if this event type has no
/// template yet (the stub does not cover the full vocabulary).
pub fn narrate_event(event: &WorldEvent, locale: Locale) -> Option<NarrativeLine> {
    match locale {
        Locale::En => narrate_event_en(event),
    }
}

fn narrate_event_en(event: &WorldEvent) -> Option<NarrativeLine> {
    let actor = &event.actor;
    match (event.event_type, &event.payload) {
        (EventType::ActorDidMove, EventPayload::Move { to, .. }) => Some(NarrativeLine::new(
            format!("You move to {to}."),
            format!("{actor} arrives."),
        )),
        (EventType::ActorDidMaterialize, _) => Some(NarrativeLine::new(
            "You come into being.",
            format!("{actor} appears."),
        )),
        (EventType::ActorDidDematerialize, _) => Some(NarrativeLine::new(
            "You fade from the world.",
            format!("{actor} vanishes."),
        )),
        (EventType::ActorDidLook, _) => Some(NarrativeLine::new(
            "You take in your surroundings.",
            format!("{actor} looks around."),
        )),
        (EventType::ActorDidInviteToParty, EventPayload::Party { subject: Some(invitee), .. }) => {
            Some(NarrativeLine::new(
                format!("You invite {invitee} to your party."),
                format!("{actor} invites {invitee} to a party."),
            ))
        }
        (EventType::ActorDidJoinParty, _) => Some(NarrativeLine::new(
            "You join the party.",
            format!("{actor} joins the party."),
        )),
        (EventType::ActorDidLeaveParty, EventPayload::Party { subject, .. }) => {
            let who = subject.as_ref().map(|s| s.to_string()).unwrap_or_else(|| "everyone".to_string());
            Some(NarrativeLine::new(
                "You leave the party.",
                format!("{who} leaves the party."),
            ))
        }
        (EventType::ActorDidReceiveCurrency, EventPayload::Credited { currency, amount }) => {
            Some(NarrativeLine::new(
                format!("You receive {amount} {currency}."),
                format!("{actor} receives {amount} {currency}."),
            ))
        }
        (EventType::ActorDidRenameShell, EventPayload::ShellRenamed { old_name, new_name, .. }) => {
            Some(NarrativeLine::new(
                format!("You rename your shell from {old_name} to {new_name}."),
                format!("{actor} renames a shell to {new_name}."),
            ))
        }
        (EventType::WorkbenchSessionDidStart, _) => Some(NarrativeLine::new(
            "You sit down at the workbench.",
            format!("{actor} sits down at the workbench."),
        )),
        (EventType::WorkbenchSessionDidCommit, _) => Some(NarrativeLine::new(
            "Your shell mutations take hold.",
            format!("{actor} steps away from the workbench, changed."),
        )),
        (EventType::WorkbenchSessionDidAbandon, _) => Some(NarrativeLine::new(
            "You abandon your staged changes.",
            format!("{actor} walks away from the workbench."),
        )),
        (EventType::CombatantDidAttack, EventPayload::Attack { target, damage, hit, .. }) => {
            if *hit {
                Some(NarrativeLine::new(
                    format!("You strike {target} for {damage} damage."),
                    format!("{actor} strikes {target}."),
                ))
            } else {
                Some(NarrativeLine::new(
                    format!("You swing at {target} and miss."),
                    format!("{actor} swings at {target} and misses."),
                ))
            }
        }
        (EventType::CombatantWasAttacked, EventPayload::Attack { hit, damage, .. }) => {
            if *hit {
                Some(NarrativeLine::new(
                    format!("You take {damage} damage."),
                    format!("{actor} is struck."),
                ))
            } else {
                Some(NarrativeLine::new("You are attacked but unharmed.", format!("{actor} is attacked and unharmed.")))
            }
        }
        (EventType::CombatantDidDie, _) => Some(NarrativeLine::new(
            "You fall.",
            format!("{actor} falls."),
        )),
        (EventType::CombatSessionDidEnd, EventPayload::CombatEnded { winning_team, .. }) => {
            Some(NarrativeLine::new(
                format!("The battle ends; {winning_team} is victorious."),
                format!("The battle around {actor} ends; {winning_team} is victorious."),
            ))
        }
        (EventType::ItemDidChangeLocation, _) => Some(NarrativeLine::new(
            "You handle the item.",
            format!("{actor} handles an item."),
        )),
        _ => None,
    }
}

/// Renders a declared error code for `locale`. Unlike events, errors
/// carry no payload to interpolate; the message is static per code.
pub fn narrate_error(code: ErrorCode, locale: Locale) -> &'static str {
    match locale {
        Locale::En => narrate_error_en(code),
    }
}

fn narrate_error_en(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::UnrecognizedIntent => "That doesn't mean anything to me.",
        ErrorCode::NoHandlerForCommand => "Nothing knows how to do that.",
        ErrorCode::InvalidAction => "You can't do that right now.",
        ErrorCode::InvalidTarget => "There's nothing like that here.",
        ErrorCode::InvalidSession => "That session isn't open.",
        ErrorCode::Forbidden => "You aren't allowed to do that.",
        ErrorCode::PreconditionFailed => "Something stops you.",
        ErrorCode::InsufficientResources => "You don't have enough for that.",
        ErrorCode::InvalidArgument => "That doesn't make sense.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_core::command::CommandId;
    use flux_core::urn::Urn;

    fn event(event_type: EventType, payload: EventPayload) -> WorldEvent {
        let actor: Urn = "flux:actor:alice".parse().unwrap();
        let place: Urn = "flux:place:square".parse().unwrap();
        WorldEvent::new(flux_core::ids::Id::new("evt-1"), event_type, actor, place, CommandId::new("cmd-1"), 0, payload)
    }

    #[test]
    fn narrates_a_covered_event() {
        let evt = event(EventType::ActorDidLook, EventPayload::None);
        let line = narrate_event(&evt, Locale::En).expect("look is covered");
        assert_eq!(line.to_self, "You take in your surroundings.");
        assert!(line.to_observer.contains("looks around"));
    }

    #[test]
    fn uncovered_event_returns_none() {
        let evt = event(EventType::CombatRoundDidStart, EventPayload::None);
        assert!(narrate_event(&evt, Locale::En).is_none());
    }

    #[test]
    fn narrates_every_error_code() {
        for code in [
            ErrorCode::UnrecognizedIntent,
            ErrorCode::NoHandlerForCommand,
            ErrorCode::InvalidAction,
            ErrorCode::InvalidTarget,
            ErrorCode::InvalidSession,
            ErrorCode::Forbidden,
            ErrorCode::PreconditionFailed,
            ErrorCode::InsufficientResources,
            ErrorCode::InvalidArgument,
        ] {
            assert!(!narrate_error(code, Locale::En).is_empty());
        }
    }
}
