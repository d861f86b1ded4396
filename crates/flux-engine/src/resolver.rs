//! Lifts a parsed [`Intent`] into a typed [`Command`], ahead of the
//! `CommandType -> reducer` map in [`crate::registry`] (spec §4.3's
//! two-phase pipeline: recognize a shape, then dispatch on its tag).
//!
//! Grounded in the same ordered-chain-of-responsibility idiom as
//! [`crate::combinators`] and [`crate::registry::HandlerRegistry`], but
//! one step earlier: a [`Resolver`] holds an ordered list of
//! [`IntentRecognizer`]s, tries each in turn, and takes the first
//! `Some`. Order is significant — "no two handlers may claim the same
//! shape" is enforced by registration order, not by detecting overlap.

use flux_core::command::{
    AdvanceArgs, AdvanceKind, AttackArgs, CreateActorArgs, CreatePlaceArgs, CreditArgs,
    DestroyEntityArgs, EquipArgs, GiveTakeItemArgs, ItemTransferArgs, MoveArgs,
    MutateResourcesArgs, MutateWeatherArgs, PartyInviteArgs, PartySelfArgs, PartyTargetArgs,
    RetreatArgs, TargetArgs, UnequipArgs, UseWorkbenchArgs, WorkbenchCommitSchemaArgs,
    WorkbenchSessionArgs, WorkbenchShellRenameArgs, WorkbenchStageMutationArgs,
};
use flux_core::world::shell::{ComponentOp, InventoryTransferOp, StatField, StatOp};
use flux_core::world::{AnatomySlot, Direction, ShellMutation, Weather, World};
use flux_core::{config, ActorUrn, Command, CommandArgs, ErrorCode, GroupUrn, Intent};

use crate::error::{DispatchError, ReducerPhase};

/// One command family's attempt to lift an [`Intent`] into [`CommandArgs`].
///
/// Takes `&World` alongside the intent since several of the textual
/// surface's mandatory forms (`move north`, `attack bob`, `party invite
/// bob`) name a direction or an entity by display name rather than by
/// URN, and resolving those requires looking the world up (spec §4.3
/// types this hook as `parse(intentCtx, intent)`, where `intentCtx`
/// carries world access).
///
/// Returns `None` to decline — the shape isn't this family's — rather
/// than erroring, so the [`Resolver`] can fall through to the next
/// recognizer. A recognizer that recognizes the prefix/verb but finds a
/// malformed or unresolvable argument also returns `None`: the intent is
/// simply unrecognized by anyone, same as if nothing had matched the
/// prefix at all.
pub trait IntentRecognizer: Send + Sync {
    fn recognize(&self, intent: &Intent, world: &World) -> Option<CommandArgs>;
}

impl<F> IntentRecognizer for F
where
    F: Fn(&Intent, &World) -> Option<CommandArgs> + Send + Sync,
{
    fn recognize(&self, intent: &Intent, world: &World) -> Option<CommandArgs> {
        self(intent, world)
    }
}

/// An ordered chain of [`IntentRecognizer`]s tried first-match-wins.
pub struct Resolver {
    recognizers: Vec<Box<dyn IntentRecognizer>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self { recognizers: Vec::new() }
    }

    pub fn push(&mut self, recognizer: impl IntentRecognizer + 'static) {
        self.recognizers.push(Box::new(recognizer));
    }

    /// Tries every recognizer in registration order and builds a
    /// [`Command`] from the first match. Declares `UNRECOGNIZED_INTENT`
    /// if none claims the shape (spec §4.3 step 1).
    pub fn resolve(&self, intent: &Intent, world: &World) -> Result<Command, DispatchError> {
        let args = self
            .recognizers
            .iter()
            .find_map(|recognizer| recognizer.recognize(intent, world))
            .ok_or_else(|| {
                DispatchError::declared(
                    ErrorCode::UnrecognizedIntent,
                    ReducerPhase::Resolve,
                    "no command shape matches this input",
                )
            })?;

        Ok(Command::new(
            intent.id.clone(),
            intent.ts,
            intent.actor.clone(),
            intent.location.clone(),
            intent.session.clone(),
            args,
        ))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

fn urn<T: std::str::FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

/// Resolves an actor reference that may be given as a URN or as a
/// display name (spec §6: `attack bob` resolves `bob` to an `ActorUrn`).
fn resolve_actor(text: &str, world: &World) -> Option<ActorUrn> {
    urn(text).or_else(|| world.actor_by_name(text).map(|actor| actor.urn.clone()))
}

fn parse_weather(text: &str) -> Option<Weather> {
    match text {
        "clear" => Some(Weather::Clear),
        "overcast" => Some(Weather::Overcast),
        "rain" => Some(Weather::Rain),
        "storm" => Some(Weather::Storm),
        "snow" => Some(Weather::Snow),
        "fog" => Some(Weather::Fog),
        _ => None,
    }
}

fn parse_stat_field(text: &str) -> Option<StatField> {
    match text {
        "pow" => Some(StatField::Pow),
        "fin" => Some(StatField::Fin),
        "res" => Some(StatField::Res),
        _ => None,
    }
}

fn parse_stat_op(text: &str) -> Option<StatOp> {
    match text {
        "add" => Some(StatOp::Add),
        "subtract" | "sub" => Some(StatOp::Subtract),
        _ => None,
    }
}

fn parse_component_op(text: &str) -> Option<ComponentOp> {
    match text {
        "mount" => Some(ComponentOp::Mount),
        "unmount" => Some(ComponentOp::Unmount),
        _ => None,
    }
}

fn parse_inventory_transfer_op(text: &str) -> Option<InventoryTransferOp> {
    match text {
        "to_vault" | "tovault" => Some(InventoryTransferOp::ToVault),
        "from_vault" | "fromvault" => Some(InventoryTransferOp::FromVault),
        _ => None,
    }
}

/// `move <direction>` resolves via the actor's origin place's exits
/// (spec §6: `move north` -> `MOVE {dest: resolved via origin.exits[north]}`).
/// A bare destination URN is also accepted, for callers (admin tooling,
/// other reducers) that already know the target place.
fn recognize_movement(intent: &Intent, world: &World) -> Option<CommandArgs> {
    if intent.prefix != "move" {
        return None;
    }
    if let Ok(direction) = intent.verb.parse::<Direction>() {
        let origin = world.place(&intent.location)?;
        let dest = origin.exits.get(&direction)?.to.clone();
        return Some(CommandArgs::Move(MoveArgs { dest }));
    }
    Some(CommandArgs::Move(MoveArgs { dest: urn(&intent.verb)? }))
}

fn recognize_presence(intent: &Intent, _world: &World) -> Option<CommandArgs> {
    match intent.prefix.as_str() {
        "materialize" => Some(CommandArgs::MaterializeActor),
        "dematerialize" => Some(CommandArgs::DematerializeActor),
        "look" => Some(CommandArgs::Look),
        "wait" => Some(CommandArgs::Wait),
        "inspect" => Some(CommandArgs::Inspect),
        _ => None,
    }
}

/// Resolves to the caller's current party, for the subcommands that act
/// on "the party I'm in" rather than naming one explicitly.
fn callers_party(intent: &Intent, world: &World) -> Option<GroupUrn> {
    world.actor(&intent.actor)?.party.clone()
}

/// `party` / `party status` (no verb, or verb `status`) both resolve to
/// `PARTY_INSPECT` on the caller's current party (spec §6). The other
/// subcommands don't take a party URN in their textual surface either —
/// `party invite bob`, `party accept`, `party kick bob`, `party leave`,
/// `party disband` all act on the caller's own party or pending
/// invitation, resolved from the world rather than typed out.
fn recognize_party(intent: &Intent, world: &World) -> Option<CommandArgs> {
    if intent.prefix != "party" {
        return None;
    }
    match intent.verb.as_str() {
        "" | "status" | "inspect" => {
            Some(CommandArgs::PartyInspect(PartySelfArgs { party: callers_party(intent, world)? }))
        }
        "invite" => {
            let invitee = resolve_actor(intent.tokens.first()?, world)?;
            Some(CommandArgs::PartyInvite(PartyInviteArgs { invitee }))
        }
        "accept" => {
            let party = world.pending_invitation_for(&intent.actor)?.urn.clone();
            Some(CommandArgs::PartyInviteAccept(PartySelfArgs { party }))
        }
        "reject" => {
            let party = world.pending_invitation_for(&intent.actor)?.urn.clone();
            Some(CommandArgs::PartyInviteReject(PartySelfArgs { party }))
        }
        "kick" => {
            let party = callers_party(intent, world)?;
            let target = resolve_actor(intent.tokens.first()?, world)?;
            Some(CommandArgs::PartyKick(PartyTargetArgs { party, target }))
        }
        "leave" => Some(CommandArgs::PartyLeave(PartySelfArgs { party: callers_party(intent, world)? })),
        "disband" => Some(CommandArgs::PartyDisband(PartySelfArgs { party: callers_party(intent, world)? })),
        _ => None,
    }
}

fn recognize_economy(intent: &Intent, _world: &World) -> Option<CommandArgs> {
    if intent.verb != "@credit" {
        return None;
    }
    let recipient = urn(intent.tokens.first()?)?;
    let currency = intent.tokens.get(1)?.to_lowercase();
    if !config::ALLOWED_CURRENCIES.contains(&currency.as_str()) {
        return None;
    }
    let amount: i64 = intent.tokens.get(2)?.parse().ok()?;
    Some(CommandArgs::Credit(CreditArgs { recipient, currency, amount }))
}

fn recognize_workbench(intent: &Intent, _world: &World) -> Option<CommandArgs> {
    if intent.prefix == "shell" && intent.verb == "rename" {
        return Some(CommandArgs::WorkbenchShellRename(match intent.tokens.len() {
            0 => return None,
            1 => WorkbenchShellRenameArgs { new_name: intent.tokens[0].clone(), shell_name_or_id: None },
            _ => WorkbenchShellRenameArgs {
                shell_name_or_id: Some(intent.tokens[0].clone()),
                new_name: intent.tokens[1].clone(),
            },
        }));
    }

    if intent.prefix != "workbench" {
        return None;
    }
    match intent.verb.as_str() {
        "use" => Some(CommandArgs::UseWorkbench(UseWorkbenchArgs {
            session_id: intent.tokens.first().and_then(|t| urn(t)),
        })),
        "preview" => Some(CommandArgs::WorkbenchPreview(WorkbenchSessionArgs { session_id: urn(intent.tokens.first()?)? })),
        "cost" => Some(CommandArgs::WorkbenchCost(WorkbenchSessionArgs { session_id: urn(intent.tokens.first()?)? })),
        "abandon" => Some(CommandArgs::WorkbenchAbandon(WorkbenchSessionArgs { session_id: urn(intent.tokens.first()?)? })),
        "commit" => Some(CommandArgs::WorkbenchCommit(WorkbenchCommitSchemaArgs {
            session_id: urn(intent.tokens.first()?)?,
            schema: intent.tokens.get(1).and_then(|t| urn(t)),
        })),
        "stage" => recognize_stage_mutation(intent),
        _ => None,
    }
}

fn recognize_stage_mutation(intent: &Intent) -> Option<CommandArgs> {
    let session_id = urn(intent.tokens.first()?)?;
    let kind = intent.tokens.get(1)?.to_lowercase();
    let mutation = match kind.as_str() {
        "stat" => ShellMutation::Stat {
            stat: parse_stat_field(&intent.tokens.get(2)?.to_lowercase())?,
            op: parse_stat_op(&intent.tokens.get(3)?.to_lowercase())?,
            amount: intent.tokens.get(4)?.parse().ok()?,
        },
        "component" => ShellMutation::Component {
            op: parse_component_op(&intent.tokens.get(2)?.to_lowercase())?,
            component_id: intent.tokens.get(3)?.clone(),
            schema: urn(intent.tokens.get(4)?)?,
        },
        "inventory" => ShellMutation::Inventory {
            op: parse_inventory_transfer_op(&intent.tokens.get(2)?.to_lowercase())?,
            item_id: urn(intent.tokens.get(3)?)?,
            quantity: intent.tokens.get(4)?.parse().ok()?,
        },
        "metadata" => ShellMutation::Metadata { new_name: intent.tokens.get(2)?.clone() },
        _ => return None,
    };
    Some(CommandArgs::WorkbenchStageMutation(WorkbenchStageMutationArgs { session_id, mutation }))
}

fn recognize_combat(intent: &Intent, world: &World) -> Option<CommandArgs> {
    match intent.prefix.as_str() {
        "strike" => Some(CommandArgs::Strike(AttackArgs { target: resolve_actor(&intent.verb, world)? })),
        "cleave" => Some(CommandArgs::Cleave(AttackArgs { target: resolve_actor(&intent.verb, world)? })),
        "attack" => Some(CommandArgs::Attack(AttackArgs { target: resolve_actor(&intent.verb, world)? })),
        "defend" => Some(CommandArgs::Defend),
        "target" => Some(CommandArgs::Target(TargetArgs { target: resolve_actor(&intent.verb, world)? })),
        "advance" => {
            if intent.verb == "close" {
                return Some(CommandArgs::Advance(AdvanceArgs { kind: AdvanceKind::CloseOnTarget }));
            }
            let distance: i64 = intent.verb.parse().ok()?;
            // spec §6: `advance 5` -> `{distance:5, direction:1}` — direction
            // defaults to forward (1), not unset (0), when omitted.
            let direction: i64 = intent.tokens.first().and_then(|t| t.parse().ok()).unwrap_or(1);
            Some(CommandArgs::Advance(AdvanceArgs { kind: AdvanceKind::Distance { distance, direction } }))
        }
        "retreat" => Some(CommandArgs::Retreat(RetreatArgs { distance: intent.verb.parse().ok()? })),
        "combat" if intent.verb == "end" => Some(CommandArgs::CombatSessionEnd),
        _ => None,
    }
}

fn recognize_inventory(intent: &Intent, _world: &World) -> Option<CommandArgs> {
    match intent.prefix.as_str() {
        "equip" => {
            let item = urn(&intent.verb)?;
            let slot: AnatomySlot = intent.tokens.first()?.parse().ok()?;
            Some(CommandArgs::EquipItem(EquipArgs { item, slot }))
        }
        "unequip" => {
            let slot: AnatomySlot = intent.verb.parse().ok()?;
            Some(CommandArgs::UnequipItem(UnequipArgs { slot }))
        }
        "drop" => {
            let item = urn(&intent.verb)?;
            let quantity = intent.tokens.first().and_then(|t| t.parse().ok()).unwrap_or(1);
            Some(CommandArgs::DropItem(ItemTransferArgs { item, quantity }))
        }
        "pickup" => {
            let item = urn(&intent.verb)?;
            let quantity = intent.tokens.first().and_then(|t| t.parse().ok()).unwrap_or(1);
            Some(CommandArgs::PickupItem(ItemTransferArgs { item, quantity }))
        }
        "give" => {
            let other = urn(&intent.verb)?;
            let item = urn(intent.tokens.first()?)?;
            let quantity = intent.tokens.get(1).and_then(|t| t.parse().ok()).unwrap_or(1);
            Some(CommandArgs::GiveItem(GiveTakeItemArgs { other, item, quantity }))
        }
        "take" => {
            let other = urn(&intent.verb)?;
            let item = urn(intent.tokens.first()?)?;
            let quantity = intent.tokens.get(1).and_then(|t| t.parse().ok()).unwrap_or(1);
            Some(CommandArgs::TakeItem(GiveTakeItemArgs { other, item, quantity }))
        }
        _ => None,
    }
}

fn recognize_world_admin(intent: &Intent, _world: &World) -> Option<CommandArgs> {
    match intent.prefix.as_str() {
        "create" => match intent.verb.as_str() {
            "actor" => {
                let actor_urn = urn(intent.tokens.first()?)?;
                let location = urn(intent.tokens.get(1)?)?;
                let name = intent.tokens.get(2..)?.join(" ");
                Some(CommandArgs::CreateActor(CreateActorArgs { urn: actor_urn, name, location }))
            }
            "place" => {
                let place_urn = urn(intent.tokens.first()?)?;
                let name = intent.tokens.get(1..)?.join(" ");
                Some(CommandArgs::CreatePlace(CreatePlaceArgs { urn: place_urn, name }))
            }
            _ => None,
        },
        "destroy" => match intent.verb.as_str() {
            "actor" => Some(CommandArgs::DestroyActor(DestroyEntityArgs { urn: urn(intent.tokens.first()?)? })),
            "place" => Some(CommandArgs::DestroyPlace(DestroyEntityArgs { urn: urn(intent.tokens.first()?)? })),
            _ => None,
        },
        "weather" => {
            let place = urn(&intent.verb)?;
            let weather = parse_weather(&intent.tokens.first()?.to_lowercase())?;
            Some(CommandArgs::MutateWeather(MutateWeatherArgs { place, weather }))
        }
        "resources" => {
            let place = urn(&intent.verb)?;
            let resource = intent.tokens.first()?.to_lowercase();
            let delta: i64 = intent.tokens.get(1)?.parse().ok()?;
            Some(CommandArgs::MutateResources(MutateResourcesArgs { place, resource, delta }))
        }
        _ => None,
    }
}

/// Builds the standard recognizer chain, in the order every deployment
/// uses. Movement and presence go first since they're the highest-
/// frequency commands; world admin goes last since `SYSTEM` is the only
/// actor that ever issues those shapes.
pub fn build_resolver() -> Resolver {
    let mut resolver = Resolver::new();
    resolver.push(recognize_movement);
    resolver.push(recognize_presence);
    resolver.push(recognize_party);
    resolver.push(recognize_economy);
    resolver.push(recognize_workbench);
    resolver.push(recognize_combat);
    resolver.push(recognize_inventory);
    resolver.push(recognize_world_admin);
    resolver
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_core::ids::CounterIdSource;
    use flux_core::world::{Actor, Exit, Place};

    fn intent(text: &str) -> Intent {
        let mut ids = CounterIdSource::new("intent");
        flux_core::parse_intent(
            text,
            "flux:actor:alice".parse().unwrap(),
            "flux:place:town:square".parse().unwrap(),
            None,
            0,
            &mut ids,
        )
    }

    /// Alice at `flux:place:town:square`, which has a north exit to
    /// `flux:place:town:gate`; Bob also present, for name resolution.
    fn world() -> World {
        let mut world = World::new();
        let square: flux_core::PlaceUrn = "flux:place:town:square".parse().unwrap();
        let gate: flux_core::PlaceUrn = "flux:place:town:gate".parse().unwrap();

        let mut square_place = Place::new(square.clone(), "Town Square");
        square_place.exits.insert(
            Direction::North,
            Exit { direction: Direction::North, label: "the north road".to_string(), to: gate.clone() },
        );
        world.insert_place(square_place);
        world.insert_place(Place::new(gate, "Town Gate"));

        world.insert_actor(Actor::new_pc("flux:actor:alice".parse().unwrap(), "Alice", square.clone(), 10));
        world.insert_actor(Actor::new_pc("flux:actor:bob".parse().unwrap(), "Bob", square, 10));
        world
    }

    #[test]
    fn resolves_move_by_direction() {
        let resolver = build_resolver();
        let command = resolver.resolve(&intent("move north"), &world()).unwrap();
        assert_eq!(command.command_type(), flux_core::CommandType::Move);
        match command.args {
            CommandArgs::Move(args) => assert_eq!(args.dest, "flux:place:town:gate".parse().unwrap()),
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn move_toward_a_direction_with_no_exit_is_unrecognized() {
        let resolver = build_resolver();
        let err = resolver.resolve(&intent("move south"), &world()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::UnrecognizedIntent));
    }

    #[test]
    fn resolves_move_by_explicit_destination_urn() {
        let resolver = build_resolver();
        let command = resolver.resolve(&intent("move flux:place:town:gate"), &world()).unwrap();
        match command.args {
            CommandArgs::Move(args) => assert_eq!(args.dest, "flux:place:town:gate".parse().unwrap()),
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn resolves_single_word_commands() {
        let resolver = build_resolver();
        let world = world();
        assert_eq!(resolver.resolve(&intent("look"), &world).unwrap().command_type(), flux_core::CommandType::Look);
        assert_eq!(resolver.resolve(&intent("wait"), &world).unwrap().command_type(), flux_core::CommandType::Wait);
    }

    #[test]
    fn resolves_party_invite_by_name() {
        let resolver = build_resolver();
        let command = resolver.resolve(&intent("party invite bob"), &world()).unwrap();
        match command.args {
            CommandArgs::PartyInvite(args) => assert_eq!(args.invitee, "flux:actor:bob".parse().unwrap()),
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn resolves_bare_party_to_inspect_callers_party() {
        let resolver = build_resolver();
        let mut world = world();
        let party: flux_core::GroupUrn = "flux:group:party:1".parse().unwrap();
        world.insert_group(flux_core::world::Group::new_party(party.clone(), "flux:actor:alice".parse().unwrap()));
        world.actor_mut(&"flux:actor:alice".parse().unwrap()).unwrap().party = Some(party.clone());

        for text in ["party", "party status"] {
            let command = resolver.resolve(&intent(text), &world).unwrap();
            match command.args {
                CommandArgs::PartyInspect(args) => assert_eq!(args.party, party),
                other => panic!("unexpected args for {text:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn party_inspect_with_no_current_party_is_unrecognized() {
        let resolver = build_resolver();
        let err = resolver.resolve(&intent("party"), &world()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::UnrecognizedIntent));
    }

    #[test]
    fn resolves_credit() {
        let resolver = build_resolver();
        let command = resolver.resolve(&intent("@credit flux:actor:bob credits 100"), &world()).unwrap();
        match command.args {
            CommandArgs::Credit(args) => {
                assert_eq!(args.recipient, "flux:actor:bob".parse().unwrap());
                assert_eq!(args.currency, "credits");
                assert_eq!(args.amount, 100);
            }
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn credit_with_unmintable_currency_is_unrecognized() {
        let resolver = build_resolver();
        let err = resolver.resolve(&intent("@credit flux:actor:bob gold 100"), &world()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::UnrecognizedIntent));
    }

    #[test]
    fn resolves_shell_rename_with_explicit_target() {
        let resolver = build_resolver();
        let command = resolver.resolve(&intent("shell rename old-shell NewName"), &world()).unwrap();
        match command.args {
            CommandArgs::WorkbenchShellRename(args) => {
                assert_eq!(args.shell_name_or_id.as_deref(), Some("old-shell"));
                assert_eq!(args.new_name, "NewName");
            }
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn resolves_combat_strike_by_name() {
        let resolver = build_resolver();
        let command = resolver.resolve(&intent("strike bob"), &world()).unwrap();
        match command.args {
            CommandArgs::Strike(args) => assert_eq!(args.target, "flux:actor:bob".parse().unwrap()),
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn resolves_attack_by_name() {
        let resolver = build_resolver();
        let command = resolver.resolve(&intent("attack bob"), &world()).unwrap();
        match command.args {
            CommandArgs::Attack(args) => assert_eq!(args.target, "flux:actor:bob".parse().unwrap()),
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn resolves_advance_with_default_forward_direction() {
        let resolver = build_resolver();
        let command = resolver.resolve(&intent("advance 5"), &world()).unwrap();
        match command.args {
            CommandArgs::Advance(AdvanceArgs { kind: AdvanceKind::Distance { distance, direction } }) => {
                assert_eq!(distance, 5);
                assert_eq!(direction, 1);
            }
            other => panic!("unexpected args: {other:?}"),
        }
    }

    #[test]
    fn unrecognized_intent_is_declared() {
        let resolver = build_resolver();
        let err = resolver.resolve(&intent("gibberish nonsense"), &world()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::UnrecognizedIntent));
    }
}
