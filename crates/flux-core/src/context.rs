//! The transformer context: everything a reducer is handed besides the
//! world and the command itself.
//!
//! Grounded in the teacher's oracle pattern (`env::GameEnvironment`
//! bundling `RngOracle` + `ClockOracle` behind one handle passed to every
//! action handler) generalized to the event/error declaration sinks this
//! engine's reducers need instead of returning a single outcome value.

use crate::command::CommandId;
use crate::dice::RandomSource;
use crate::error::{DeclaredError, ErrorCode};
use crate::event::{EventPayload, EventType, WorldEvent};
use crate::ids::IdSource;
use crate::urn::{ActorUrn, PlaceUrn};
use crate::world::{Tick, World};

/// Locale tag for narrative lookups. Only `En` is populated by
/// `flux-narrative`'s stub table; the type exists so callers can plumb a
/// locale through without the narrative layer needing to be rewritten
/// once more locales are added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
}

/// Everything a reducer needs beyond `&mut World` and the `Command`
/// itself: id/time/randomness sources, the declared-event and
/// declared-error sinks, and the command's trace id for correlation.
pub struct TransformerContext<'a> {
    pub world: &'a mut World,
    ids: &'a mut dyn IdSource,
    rng: &'a mut dyn RandomSource,
    trace: CommandId,
    now: Tick,
    locale: Locale,
    events: Vec<WorldEvent>,
    errors: Vec<DeclaredError>,
}

impl<'a> TransformerContext<'a> {
    pub fn new(
        world: &'a mut World,
        ids: &'a mut dyn IdSource,
        rng: &'a mut dyn RandomSource,
        trace: CommandId,
        now: Tick,
    ) -> Self {
        Self {
            world,
            ids,
            rng,
            trace,
            now,
            locale: Locale::default(),
            events: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Cached dispatch timestamp; every event/error this context declares
    /// is stamped with this value, not a fresh read per call.
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn uniqid(&mut self) -> crate::ids::Id {
        self.ids.next_id()
    }

    pub fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.roll_die(sides)
    }

    /// Exposes the injected randomness source directly, for callers that
    /// need to hand it to a function taking `&mut dyn RandomSource`
    /// (e.g. [`crate::dice::roll_attack`]) rather than rolling one die at
    /// a time.
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng
    }

    pub fn trace(&self) -> &CommandId {
        &self.trace
    }

    pub fn declare_event(
        &mut self,
        event_type: EventType,
        actor: ActorUrn,
        location: PlaceUrn,
        payload: EventPayload,
    ) {
        let id = self.ids.next_id();
        self.events.push(WorldEvent::new(
            id,
            event_type,
            actor,
            location,
            self.trace.clone(),
            self.now,
            payload,
        ));
    }

    pub fn declare_error(&mut self, code: ErrorCode) {
        self.errors.push(DeclaredError::new(code, self.trace.clone()));
    }

    pub fn declared_events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn declared_errors(&self) -> &[DeclaredError] {
        &self.errors
    }

    /// Drains both sinks, handing ownership of everything declared so far
    /// to the caller (the dispatcher, once a reducer returns).
    pub fn drain(&mut self) -> (Vec<WorldEvent>, Vec<DeclaredError>) {
        (std::mem::take(&mut self.events), std::mem::take(&mut self.errors))
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::FixedSource;
    use crate::ids::CounterIdSource;

    #[test]
    fn declared_events_and_errors_drain_together() {
        let mut world = World::new();
        let mut ids = CounterIdSource::new("ctx");
        let mut rng = FixedSource(3);
        let trace = CommandId::new("cmd-1");
        let mut ctx = TransformerContext::new(&mut world, &mut ids, &mut rng, trace, 42);

        let actor: ActorUrn = "flux:actor:alice".parse().unwrap();
        let place: PlaceUrn = "flux:place:square".parse().unwrap();
        ctx.declare_event(EventType::ActorDidLook, actor.clone(), place.clone(), EventPayload::None);
        ctx.declare_error(ErrorCode::InvalidTarget);

        assert_eq!(ctx.declared_events().len(), 1);
        assert_eq!(ctx.declared_errors().len(), 1);

        let (events, errors) = ctx.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(ctx.declared_events().is_empty());
        assert!(ctx.declared_errors().is_empty());
    }
}
