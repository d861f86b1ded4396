//! End-to-end scenarios driving the full intent pipeline: resolve an
//! [`Intent`] or hand-build a [`Command`], dispatch it through a
//! [`HandlerRegistry`], and inspect the declared events/errors and the
//! resulting world state.

use flux_core::command::MoveArgs;
use flux_core::dice::FixedSource;
use flux_core::ids::CounterIdSource;
use flux_core::world::{Actor, Direction, Exit, Place};
use flux_core::{parse_intent, Command, CommandArgs, ErrorCode, EventPayload, EventType, TransformerContext, World};
use flux_engine::{build_registry, build_resolver, execute_intent, Dispatcher};

fn urn(s: &str) -> flux_core::Urn {
    s.parse().unwrap()
}

fn town_square_and_gate() -> World {
    let mut world = World::new();
    let square = urn("flux:place:town:square");
    let market = urn("flux:place:town:market");
    let gate = urn("flux:place:town:gate");

    let mut square_place = Place::new(square.clone(), "Town Square");
    square_place.exits.insert(
        Direction::North,
        Exit { direction: Direction::North, label: "the north road".to_string(), to: gate.clone() },
    );
    world.insert_place(square_place);
    world.insert_place(Place::new(market, "Town Market"));
    world.insert_place(Place::new(gate, "Town Gate"));

    world.insert_actor(Actor::new_pc(urn("flux:actor:alice"), "Alice", square, 10));
    world
}

/// Scenario 1: materialize then move.
#[test]
fn materialize_then_move_relocates_the_actor() {
    let mut world = town_square_and_gate();
    let registry = build_registry();
    let resolver = build_resolver();
    let mut ids = CounterIdSource::new("intent");
    let mut rng = FixedSource(4);

    let alice = urn("flux:actor:alice");
    let square = urn("flux:place:town:square");
    let gate = urn("flux:place:town:gate");

    let materialize = parse_intent("materialize", alice.clone(), square.clone(), None, 0, &mut ids);
    let move_north = parse_intent("move north", alice.clone(), square.clone(), None, 1, &mut ids);

    let mut all_event_types = Vec::new();
    for intent in [materialize, move_north] {
        let command = resolver.resolve(&intent, &world).expect("both intents are recognized");
        let mut ctx = TransformerContext::new(&mut world, &mut ids, &mut rng, command.id.clone(), intent.ts);
        Dispatcher::dispatch(&registry, &command, &mut ctx).expect("both commands succeed");
        let (events, errors) = ctx.drain();
        assert!(errors.is_empty());
        all_event_types.extend(events.iter().map(|e| e.event_type));
    }

    assert_eq!(
        all_event_types,
        vec![EventType::ActorDidMaterialize, EventType::ActorDidLook, EventType::ActorDidMove]
    );

    assert_eq!(world.actor(&alice).unwrap().location, gate);
    assert!(!world.place(&square).unwrap().entities.contains_key(&alice));
    assert!(world.place(&gate).unwrap().entities.contains_key(&alice));
}

/// Scenario 2: a move with no matching exit is rejected and leaves the
/// world untouched.
#[test]
fn move_with_no_exit_is_invalid_action() {
    let mut world = town_square_and_gate();
    let registry = build_registry();
    let alice = urn("flux:actor:alice");
    let square = urn("flux:place:town:square");
    let market = urn("flux:place:town:market");

    let command = Command::new(
        flux_core::ids::Id::new("trace-1"),
        0,
        alice.clone(),
        square.clone(),
        None,
        CommandArgs::Move(MoveArgs { dest: market }),
    );

    let mut ids = CounterIdSource::new("ctx");
    let mut rng = FixedSource(1);
    let mut ctx = TransformerContext::new(&mut world, &mut ids, &mut rng, command.id.clone(), 0);
    let result = Dispatcher::dispatch(&registry, &command, &mut ctx);

    assert_eq!(result.unwrap_err().code(), Some(ErrorCode::InvalidAction));
    let (events, _) = ctx.drain();
    assert!(events.is_empty());
    assert_eq!(world.actor(&alice).unwrap().location, square);
}

/// Scenario 3: party lifecycle (invite -> accept -> owner-leave
/// forbidden -> disband).
#[test]
fn party_lifecycle_forbids_owner_leaving_but_allows_disband() {
    let mut world = World::new();
    let square = urn("flux:place:town:square");
    world.insert_place(Place::new(square.clone(), "Town Square"));
    world.insert_actor(Actor::new_pc(urn("flux:actor:alice"), "Alice", square.clone(), 10));
    world.insert_actor(Actor::new_pc(urn("flux:actor:bob"), "Bob", square.clone(), 10));

    let registry = build_registry();
    let alice = urn("flux:actor:alice");
    let bob = urn("flux:actor:bob");

    let mut ids = CounterIdSource::new("ctx");
    let mut rng = FixedSource(1);

    let mut run = |world: &mut World, ids: &mut CounterIdSource, actor: &flux_core::Urn, args: CommandArgs| {
        let command = Command::new(flux_core::ids::Id::new("trace"), 0, actor.clone(), square.clone(), None, args);
        let mut ctx = TransformerContext::new(world, ids, &mut rng, command.id.clone(), 0);
        let result = Dispatcher::dispatch(&registry, &command, &mut ctx);
        let (events, _) = ctx.drain();
        (result, events)
    };

    let invite_args = CommandArgs::PartyInvite(flux_core::command::PartyInviteArgs { invitee: bob.clone() });
    let (result, events) = run(&mut world, &mut ids, &alice, invite_args);
    result.expect("invite succeeds");
    assert_eq!(events[0].event_type, EventType::ActorDidInviteToParty);

    let party = world.actor(&alice).unwrap().party.clone().expect("alice owns a party after inviting");
    assert!(world.group(&party).unwrap().is_owner(&alice));
    assert!(world.group(&party).unwrap().invitations.contains_key(&bob));

    let accept_args = CommandArgs::PartyInviteAccept(flux_core::command::PartySelfArgs { party: party.clone() });
    let (result, _) = run(&mut world, &mut ids, &bob, accept_args);
    result.expect("accept succeeds");
    assert!(world.group(&party).unwrap().is_member(&bob));
    assert!(!world.group(&party).unwrap().invitations.contains_key(&bob));

    let leave_args = CommandArgs::PartyLeave(flux_core::command::PartySelfArgs { party: party.clone() });
    let (result, _) = run(&mut world, &mut ids, &alice, leave_args);
    assert_eq!(result.unwrap_err().code(), Some(ErrorCode::Forbidden));

    let disband_args = CommandArgs::PartyDisband(flux_core::command::PartySelfArgs { party: party.clone() });
    let (result, _) = run(&mut world, &mut ids, &alice, disband_args);
    result.expect("disband succeeds");
    assert!(world.group(&party).is_none());
    assert!(world.actor(&alice).unwrap().party.is_none());
    assert!(world.actor(&bob).unwrap().party.is_none());
}

/// Scenario 4: renaming the currently-equipped shell through the
/// workbench is rejected with `INVALID_TARGET`, and the shell's name is
/// unchanged.
#[test]
fn workbench_rename_of_current_shell_is_rejected() {
    use flux_core::world::{CoreStats, Shell};

    let mut world = World::new();
    let square = urn("flux:place:town:square");
    world.insert_place(Place::new(square.clone(), "Town Square"));

    let alice_urn = urn("flux:actor:alice");
    let mut alice = Actor::new_pc(alice_urn.clone(), "Alice", square.clone(), 10);
    let shell = Shell::new("starter-shell", "Starter Shell", CoreStats::default());
    alice.shells.insert(shell.id.clone(), shell);
    alice.current_shell = Some("starter-shell".to_string());
    world.insert_actor(alice);

    let registry = build_registry();
    let mut ids = CounterIdSource::new("ctx");
    let mut rng = FixedSource(1);

    let use_workbench = Command::new(
        flux_core::ids::Id::new("trace-open"),
        0,
        alice_urn.clone(),
        square.clone(),
        None,
        CommandArgs::UseWorkbench(flux_core::command::UseWorkbenchArgs { session_id: None }),
    );
    let mut ctx = TransformerContext::new(&mut world, &mut ids, &mut rng, use_workbench.id.clone(), 0);
    Dispatcher::dispatch(&registry, &use_workbench, &mut ctx).expect("opening a workbench always succeeds");
    let (events, _) = ctx.drain();
    assert_eq!(
        events.iter().map(|e| e.event_type).collect::<Vec<_>>(),
        vec![EventType::WorkbenchSessionDidStart, EventType::ActorDidListShells]
    );
    let session_id = match &events[0].payload {
        EventPayload::Session { session } => session.clone(),
        other => panic!("unexpected payload: {other:?}"),
    };

    let rename = Command::new(
        flux_core::ids::Id::new("trace-rename"),
        1,
        alice_urn.clone(),
        square.clone(),
        Some(session_id),
        CommandArgs::WorkbenchShellRename(flux_core::command::WorkbenchShellRenameArgs {
            new_name: "NewName".to_string(),
            shell_name_or_id: Some("starter-shell".to_string()),
        }),
    );
    let mut ctx = TransformerContext::new(&mut world, &mut ids, &mut rng, rename.id.clone(), 1);
    let result = Dispatcher::dispatch(&registry, &rename, &mut ctx);

    assert_eq!(result.unwrap_err().code(), Some(ErrorCode::InvalidTarget));
    assert_eq!(world.actor(&alice_urn).unwrap().shells.get("starter-shell").unwrap().name, "Starter Shell");
}

/// Scenario 5: crediting a currency outside the mintable set never
/// reaches a reducer at all — the resolver declines to recognize the
/// shape, so the dispatcher never sees a command, and the recipient's
/// wallet is unchanged.
#[test]
fn credit_with_unmintable_currency_is_unrecognized_and_wallet_is_unchanged() {
    let mut world = World::new();
    let square = urn("flux:place:town:square");
    world.insert_place(Place::new(square.clone(), "Town Square"));
    world.insert_actor(Actor::new_pc(urn("flux:actor:bob"), "Bob", square.clone(), 10));

    let registry = build_registry();
    let resolver = build_resolver();
    let bob = urn("flux:actor:bob");

    let mut ids = CounterIdSource::new("intent");
    let mut rng = FixedSource(1);
    let intent = parse_intent(
        "@credit flux:actor:bob gold 100",
        urn("flux:actor:system"),
        square,
        None,
        0,
        &mut ids,
    );
    let mut ctx = TransformerContext::new(&mut world, &mut ids, &mut rng, intent.id.clone(), 0);
    let result = execute_intent(&intent, &resolver, &registry, &mut ctx);

    assert_eq!(result.unwrap_err().code(), Some(ErrorCode::UnrecognizedIntent));
    let (events, _) = ctx.drain();
    assert!(events.is_empty());
    assert!(world.actor(&bob).unwrap().wallet.get("gold").is_none());
}

/// `execute_intent` chains resolve and dispatch in one call for raw
/// player text, rather than requiring callers to hold an already-typed
/// `Command`.
#[test]
fn execute_intent_resolves_and_dispatches_in_one_call() {
    let mut world = town_square_and_gate();
    let registry = build_registry();
    let resolver = build_resolver();
    let mut ids = CounterIdSource::new("intent");
    let mut rng = FixedSource(4);

    let alice = urn("flux:actor:alice");
    let square = urn("flux:place:town:square");

    let materialize = parse_intent("materialize", alice.clone(), square.clone(), None, 0, &mut ids);
    let mut ctx = TransformerContext::new(&mut world, &mut ids, &mut rng, materialize.id.clone(), 0);
    let command = execute_intent(&materialize, &resolver, &registry, &mut ctx).expect("materialize resolves and dispatches");

    assert_eq!(command.args, CommandArgs::MaterializeActor);
    let (events, errors) = ctx.drain();
    assert!(errors.is_empty());
    assert_eq!(events[0].event_type, EventType::ActorDidMaterialize);
}

/// Unrecognized free text is rejected by the resolver before any
/// reducer runs.
#[test]
fn execute_intent_rejects_unrecognized_text() {
    let mut world = town_square_and_gate();
    let registry = build_registry();
    let resolver = build_resolver();
    let mut ids = CounterIdSource::new("intent");
    let mut rng = FixedSource(4);

    let alice = urn("flux:actor:alice");
    let square = urn("flux:place:town:square");

    let gibberish = parse_intent("frobnicate the quux", alice, square, None, 0, &mut ids);
    let mut ctx = TransformerContext::new(&mut world, &mut ids, &mut rng, gibberish.id.clone(), 0);
    let result = execute_intent(&gibberish, &resolver, &registry, &mut ctx);

    assert_eq!(result.unwrap_err().code(), Some(ErrorCode::UnrecognizedIntent));
}

/// Scenario 6: a fixed dice source makes rolls reproducible.
#[test]
fn deterministic_dice_roll_matches_fixed_source() {
    let mut rng = FixedSource(4);
    let roll = flux_core::dice::roll_dice("2d6+3", &mut rng).unwrap();
    assert_eq!(roll.values, vec![4, 4]);
    assert_eq!(roll.bonus, 3);
    assert_eq!(roll.sum, 11);
    assert_eq!(roll.total(), 11);
}
