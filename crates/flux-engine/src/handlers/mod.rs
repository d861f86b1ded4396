//! One module per command family, plus [`build_registry`] wiring every
//! concrete handler into a [`crate::registry::HandlerRegistry`] with the
//! combinators each command type needs.

pub mod combat;
pub mod economy;
pub mod inventory;
pub mod movement;
pub mod party;
pub mod presence;
pub mod workbench;
pub mod world_admin;

use crate::combinators::{with_basic_world_state_validation, with_command_type, with_existing_workbench_session, with_workbench_shell};
use crate::registry::HandlerRegistry;
use flux_core::CommandType;

/// Assembles the full registry the dispatcher runs every command
/// through. Every handler is wrapped in `with_command_type` (a
/// defensive routing check) and `with_basic_world_state_validation`
/// (issuing actor exists and is alive, skipped for system commands).
/// Workbench handlers that act on an already-open session additionally
/// wear `with_existing_workbench_session`; the two that further require
/// a shell to be equipped also wear `with_workbench_shell`.
///
/// Combat handlers do not wear `with_combat_cost`: that combinator
/// expects `command.session` to already name a resolved session, but
/// combat commands acquire-or-create their session inside `apply`
/// itself (see `handlers::combat`), so each handler spends its own
/// action points locally instead.
pub fn build_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    macro_rules! register_basic {
        ($ty:expr, $handler:expr) => {
            registry.register(with_command_type($ty, with_basic_world_state_validation($handler)));
        };
    }

    register_basic!(CommandType::Move, movement::MoveHandler);
    register_basic!(CommandType::MaterializeActor, presence::MaterializeActorHandler);
    register_basic!(CommandType::DematerializeActor, presence::DematerializeActorHandler);
    register_basic!(CommandType::Look, presence::LookHandler);
    register_basic!(CommandType::Wait, presence::WaitHandler);
    register_basic!(CommandType::Inspect, presence::InspectHandler);

    register_basic!(CommandType::PartyInvite, party::PartyInviteHandler);
    register_basic!(CommandType::PartyInviteAccept, party::PartyInviteAcceptHandler);
    register_basic!(CommandType::PartyInviteReject, party::PartyInviteRejectHandler);
    register_basic!(CommandType::PartyKick, party::PartyKickHandler);
    register_basic!(CommandType::PartyLeave, party::PartyLeaveHandler);
    register_basic!(CommandType::PartyDisband, party::PartyDisbandHandler);
    register_basic!(CommandType::PartyInspect, party::PartyInspectHandler);

    register_basic!(CommandType::Credit, economy::CreditHandler);

    register_basic!(CommandType::UseWorkbench, workbench::UseWorkbenchHandler);
    registry.register(with_command_type(
        CommandType::WorkbenchShellRename,
        with_basic_world_state_validation(with_existing_workbench_session(with_workbench_shell(
            workbench::WorkbenchShellRenameHandler,
        ))),
    ));
    registry.register(with_command_type(
        CommandType::WorkbenchStageMutation,
        with_basic_world_state_validation(with_existing_workbench_session(with_workbench_shell(
            workbench::WorkbenchStageMutationHandler,
        ))),
    ));
    registry.register(with_command_type(
        CommandType::WorkbenchPreview,
        with_basic_world_state_validation(with_existing_workbench_session(workbench::WorkbenchPreviewHandler)),
    ));
    registry.register(with_command_type(
        CommandType::WorkbenchCost,
        with_basic_world_state_validation(with_existing_workbench_session(workbench::WorkbenchCostHandler)),
    ));
    registry.register(with_command_type(
        CommandType::WorkbenchCommit,
        with_basic_world_state_validation(with_existing_workbench_session(workbench::WorkbenchCommitHandler)),
    ));
    registry.register(with_command_type(
        CommandType::WorkbenchAbandon,
        with_basic_world_state_validation(with_existing_workbench_session(workbench::WorkbenchAbandonHandler)),
    ));

    register_basic!(CommandType::Strike, combat::StrikeHandler);
    register_basic!(CommandType::Cleave, combat::CleaveHandler);
    register_basic!(CommandType::Attack, combat::AttackHandler);
    register_basic!(CommandType::Defend, combat::DefendHandler);
    register_basic!(CommandType::Advance, combat::AdvanceHandler);
    register_basic!(CommandType::Retreat, combat::RetreatHandler);
    register_basic!(CommandType::Target, combat::TargetHandler);
    register_basic!(CommandType::CombatSessionEnd, combat::CombatSessionEndHandler);

    register_basic!(CommandType::EquipItem, inventory::EquipItemHandler);
    register_basic!(CommandType::UnequipItem, inventory::UnequipItemHandler);
    register_basic!(CommandType::DropItem, inventory::DropItemHandler);
    register_basic!(CommandType::PickupItem, inventory::PickupItemHandler);
    register_basic!(CommandType::GiveItem, inventory::GiveItemHandler);
    register_basic!(CommandType::TakeItem, inventory::TakeItemHandler);

    register_basic!(CommandType::CreateActor, world_admin::CreateActorHandler);
    register_basic!(CommandType::CreatePlace, world_admin::CreatePlaceHandler);
    register_basic!(CommandType::DestroyActor, world_admin::DestroyActorHandler);
    register_basic!(CommandType::DestroyPlace, world_admin::DestroyPlaceHandler);
    register_basic!(CommandType::MutateWeather, world_admin::MutateWeatherHandler);
    register_basic!(CommandType::MutateResources, world_admin::MutateResourcesHandler);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_command_type() {
        let registry = build_registry();
        for command_type in [
            CommandType::Move,
            CommandType::MaterializeActor,
            CommandType::DematerializeActor,
            CommandType::Look,
            CommandType::Wait,
            CommandType::Inspect,
            CommandType::PartyInvite,
            CommandType::PartyInviteAccept,
            CommandType::PartyInviteReject,
            CommandType::PartyKick,
            CommandType::PartyLeave,
            CommandType::PartyDisband,
            CommandType::PartyInspect,
            CommandType::Credit,
            CommandType::UseWorkbench,
            CommandType::WorkbenchShellRename,
            CommandType::WorkbenchStageMutation,
            CommandType::WorkbenchPreview,
            CommandType::WorkbenchCost,
            CommandType::WorkbenchCommit,
            CommandType::WorkbenchAbandon,
            CommandType::Strike,
            CommandType::Cleave,
            CommandType::Attack,
            CommandType::Defend,
            CommandType::Advance,
            CommandType::Retreat,
            CommandType::Target,
            CommandType::CombatSessionEnd,
            CommandType::EquipItem,
            CommandType::UnequipItem,
            CommandType::DropItem,
            CommandType::PickupItem,
            CommandType::GiveItem,
            CommandType::TakeItem,
            CommandType::CreateActor,
            CommandType::CreatePlace,
            CommandType::DestroyActor,
            CommandType::DestroyPlace,
            CommandType::MutateWeather,
            CommandType::MutateResources,
        ] {
            assert!(registry.has(command_type), "missing handler for {command_type}");
        }
    }
}
