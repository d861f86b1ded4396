//! EQUIP_ITEM / UNEQUIP_ITEM / DROP_ITEM / PICKUP_ITEM / GIVE_ITEM /
//! TAKE_ITEM (spec §3, §4.5). Canonical ownership lives on `Item.location`
//! (spec's mutual-exclusion invariant); `Actor.inventory` is the
//! bookkeeping projection (quantity, mass, last-update) kept in step with
//! it.

use flux_core::command::{CommandArgs, EquipArgs, GiveTakeItemArgs, ItemTransferArgs, UnequipArgs};
use flux_core::world::{Inventory, InventorySlot, ItemLocation};
use flux_core::{ActorUrn, Command, CommandType, ErrorCode, EventPayload, EventType, ItemUrn, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;

fn invalid_target(message: &'static str) -> DispatchError {
    DispatchError::declared(ErrorCode::InvalidTarget, ReducerPhase::PreValidate, message)
}

fn precondition(message: &'static str) -> DispatchError {
    DispatchError::declared(ErrorCode::PreconditionFailed, ReducerPhase::PreValidate, message)
}

fn take_from_inventory(inventory: &mut Inventory, item: &ItemUrn, quantity: u32, now: u64) -> Result<(), DispatchError> {
    let slot = inventory.get_mut(item).ok_or_else(|| precondition("item is not present in the source inventory"))?;
    if slot.quantity < quantity {
        return Err(precondition("insufficient quantity in the source inventory"));
    }
    slot.quantity -= quantity;
    slot.last_update = now;
    if slot.quantity == 0 {
        inventory.remove(item);
    }
    Ok(())
}

fn add_to_inventory(inventory: &mut Inventory, item: &ItemUrn, quantity: u32, mass: u64, now: u64) {
    let slot = inventory.entry(item.clone()).or_insert_with(|| InventorySlot {
        item: item.clone(),
        quantity: 0,
        mass,
        last_update: now,
    });
    slot.quantity += quantity;
    slot.last_update = now;
}

pub struct EquipItemHandler;

fn equip_args(command: &Command) -> &EquipArgs {
    match &command.args {
        CommandArgs::EquipItem(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for EquipItemHandler {
    fn command_type(&self) -> CommandType {
        CommandType::EquipItem
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = equip_args(command);
        let item = ctx.world.item(&args.item).ok_or_else(|| invalid_target("item does not exist"))?;
        if item.location != ItemLocation::Actor(command.actor.clone()) {
            return Err(precondition("item is not in the actor's inventory"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = equip_args(command).clone();
        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            actor.equipment.insert(args.slot, args.item.clone());
        }
        ctx.declare_event(
            EventType::ItemDidChangeLocation,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::None,
        );
        Ok(())
    }
}

pub struct UnequipItemHandler;

fn unequip_args(command: &Command) -> &UnequipArgs {
    match &command.args {
        CommandArgs::UnequipItem(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for UnequipItemHandler {
    fn command_type(&self) -> CommandType {
        CommandType::UnequipItem
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = unequip_args(command);
        let actor = ctx.world.actor(&command.actor).ok_or_else(|| invalid_target("actor does not exist"))?;
        if !actor.equipment.contains_key(&args.slot) {
            return Err(precondition("anatomy slot is not currently equipped"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let slot = unequip_args(command).slot;
        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            actor.equipment.remove(&slot);
        }
        ctx.declare_event(
            EventType::ItemDidChangeLocation,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::None,
        );
        Ok(())
    }
}

pub struct DropItemHandler;

fn transfer_args(command: &Command) -> &ItemTransferArgs {
    match &command.args {
        CommandArgs::DropItem(args) | CommandArgs::PickupItem(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for DropItemHandler {
    fn command_type(&self) -> CommandType {
        CommandType::DropItem
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = transfer_args(command);
        let item = ctx.world.item(&args.item).ok_or_else(|| invalid_target("item does not exist"))?;
        if item.location != ItemLocation::Actor(command.actor.clone()) {
            return Err(precondition("item is not in the actor's inventory"));
        }
        let actor = ctx.world.actor(&command.actor).expect("item location check implies actor exists");
        let held = actor.inventory.get(&args.item).map(|slot| slot.quantity).unwrap_or(0);
        if held < args.quantity {
            return Err(precondition("insufficient quantity to drop"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = transfer_args(command).clone();
        let now = ctx.now();
        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            take_from_inventory(&mut actor.inventory, &args.item, args.quantity, now)?;
        }
        if let Some(item) = ctx.world.item_mut(&args.item) {
            item.location = ItemLocation::Place(command.location.clone());
        }
        ctx.declare_event(
            EventType::ItemDidChangeLocation,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::None,
        );
        Ok(())
    }
}

pub struct PickupItemHandler;

impl CommandHandler for PickupItemHandler {
    fn command_type(&self) -> CommandType {
        CommandType::PickupItem
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = transfer_args(command);
        let item = ctx.world.item(&args.item).ok_or_else(|| invalid_target("item does not exist"))?;
        if item.location != ItemLocation::Place(command.location.clone()) {
            return Err(precondition("item is not present at this location"));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = transfer_args(command).clone();
        let now = ctx.now();
        let mass = ctx.world.schemas.get(&ctx.world.item(&args.item).expect("checked in pre_validate").schema).map(|s| s.mass).unwrap_or(0);
        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            add_to_inventory(&mut actor.inventory, &args.item, args.quantity, mass, now);
        }
        if let Some(item) = ctx.world.item_mut(&args.item) {
            item.location = ItemLocation::Actor(command.actor.clone());
        }
        ctx.declare_event(
            EventType::ItemDidChangeLocation,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::None,
        );
        Ok(())
    }
}

fn give_take_args(command: &Command) -> &GiveTakeItemArgs {
    match &command.args {
        CommandArgs::GiveItem(args) | CommandArgs::TakeItem(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

pub struct GiveItemHandler;

impl CommandHandler for GiveItemHandler {
    fn command_type(&self) -> CommandType {
        CommandType::GiveItem
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = give_take_args(command);
        validate_transfer(ctx, &command.actor, &args.other, &args.item, args.quantity, command)
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = give_take_args(command).clone();
        perform_transfer(ctx, command, &command.actor.clone(), &args.other, &args.item, args.quantity)
    }
}

pub struct TakeItemHandler;

impl CommandHandler for TakeItemHandler {
    fn command_type(&self) -> CommandType {
        CommandType::TakeItem
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = give_take_args(command);
        validate_transfer(ctx, &args.other, &command.actor, &args.item, args.quantity, command)
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = give_take_args(command).clone();
        perform_transfer(ctx, command, &args.other, &command.actor.clone(), &args.item, args.quantity)
    }
}

fn validate_transfer(
    ctx: &TransformerContext<'_>,
    from: &ActorUrn,
    to: &ActorUrn,
    item: &ItemUrn,
    quantity: u32,
    command: &Command,
) -> Result<(), DispatchError> {
    let item_state = ctx.world.item(item).ok_or_else(|| invalid_target("item does not exist"))?;
    if item_state.location != ItemLocation::Actor(from.clone()) {
        return Err(precondition("item is not held by the giving actor"));
    }
    let to_actor = ctx.world.actor(to).ok_or_else(|| invalid_target("recipient does not exist"))?;
    if to_actor.location != command.location {
        return Err(precondition("recipient is not at the same location"));
    }
    let from_actor = ctx.world.actor(from).ok_or_else(|| invalid_target("giver does not exist"))?;
    let held = from_actor.inventory.get(item).map(|slot| slot.quantity).unwrap_or(0);
    if held < quantity {
        return Err(precondition("insufficient quantity to transfer"));
    }
    Ok(())
}

fn perform_transfer(
    ctx: &mut TransformerContext<'_>,
    command: &Command,
    from: &ActorUrn,
    to: &ActorUrn,
    item: &ItemUrn,
    quantity: u32,
) -> Result<(), DispatchError> {
    let now = ctx.now();
    let mass = ctx.world.item(item).and_then(|i| ctx.world.schemas.get(&i.schema)).map(|s| s.mass).unwrap_or(0);

    if let Some(actor) = ctx.world.actor_mut(from) {
        take_from_inventory(&mut actor.inventory, item, quantity, now)?;
    }
    if let Some(actor) = ctx.world.actor_mut(to) {
        add_to_inventory(&mut actor.inventory, item, quantity, mass, now);
    }
    if let Some(item_state) = ctx.world.item_mut(item) {
        item_state.location = ItemLocation::Actor(to.clone());
    }

    ctx.declare_event(
        EventType::ItemDidChangeLocation,
        command.actor.clone(),
        command.location.clone(),
        EventPayload::None,
    );
    Ok(())
}
