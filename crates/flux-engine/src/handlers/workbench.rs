//! USE_WORKBENCH and the WORKBENCH_* family (spec §4.5, §4.6).

use flux_core::command::{CommandArgs, UseWorkbenchArgs, WorkbenchCommitSchemaArgs, WorkbenchSessionArgs, WorkbenchShellRenameArgs, WorkbenchStageMutationArgs};
use flux_core::world::{mutations_cost, preview_shell, SessionStatus};
use flux_core::{Command, CommandType, ErrorCode, EventPayload, EventType, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;
use crate::session::workbench::acquire_or_create_workbench_session;

fn invalid_session(message: &'static str) -> DispatchError {
    DispatchError::declared(ErrorCode::InvalidSession, ReducerPhase::PreValidate, message)
}

pub struct UseWorkbenchHandler;

fn use_args(command: &Command) -> &UseWorkbenchArgs {
    match &command.args {
        CommandArgs::UseWorkbench(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for UseWorkbenchHandler {
    fn command_type(&self) -> CommandType {
        CommandType::UseWorkbench
    }

    fn pre_validate(&self, _command: &Command, _ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_id = use_args(command).session_id.clone();
        let (session, is_new) = acquire_or_create_workbench_session(ctx, &command.actor, &command.location, session_id)?;
        if is_new {
            ctx.declare_event(
                EventType::ActorDidListShells,
                command.actor.clone(),
                command.location.clone(),
                EventPayload::Session { session },
            );
        }
        Ok(())
    }
}

fn resolve_workbench<'a>(
    ctx: &'a TransformerContext<'_>,
    session_id: &flux_core::SessionUrn,
    actor: &flux_core::ActorUrn,
) -> Result<&'a flux_core::world::WorkbenchSessionData, DispatchError> {
    let session = ctx.world.session(session_id).ok_or_else(|| invalid_session("workbench session does not exist"))?;
    if session.status == SessionStatus::Ended {
        return Err(invalid_session("workbench session has already ended"));
    }
    let data = session.as_workbench().ok_or_else(|| invalid_session("session is not a workbench session"))?;
    if &data.actor_id != actor {
        return Err(DispatchError::declared(ErrorCode::Forbidden, ReducerPhase::PreValidate, "session belongs to a different actor"));
    }
    Ok(data)
}

pub struct WorkbenchShellRenameHandler;

fn rename_args(command: &Command) -> &WorkbenchShellRenameArgs {
    match &command.args {
        CommandArgs::WorkbenchShellRename(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for WorkbenchShellRenameHandler {
    fn command_type(&self) -> CommandType {
        CommandType::WorkbenchShellRename
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let Some(session_id) = &command.session else {
            return Err(invalid_session("workbench shell rename requires an active session"));
        };
        let args = rename_args(command);
        let actor = ctx.world.actor(&command.actor).ok_or_else(|| invalid_session("actor does not exist"))?;
        let current = actor.current_shell.as_deref();
        if let Some(target) = &args.shell_name_or_id {
            if Some(target.as_str()) == current {
                return Err(DispatchError::declared(
                    ErrorCode::InvalidTarget,
                    ReducerPhase::PreValidate,
                    "cannot rename the currently-equipped shell through the workbench",
                ));
            }
        }
        resolve_workbench(ctx, session_id, &command.actor)?;
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let session_id = command.session.clone().expect("checked in pre_validate");
        let args = rename_args(command).clone();
        let shell_id = args.shell_name_or_id.clone().unwrap_or_else(|| {
            ctx.world
                .session(&session_id)
                .and_then(|s| s.as_workbench())
                .map(|d| d.current_shell_id.clone())
                .unwrap_or_default()
        });

        let old_name = ctx
            .world
            .actor(&command.actor)
            .and_then(|a| a.shells.get(&shell_id))
            .map(|shell| shell.name.clone())
            .unwrap_or_default();

        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            if let Some(shell) = actor.shells.get_mut(&shell_id) {
                shell.name = args.new_name.clone();
            }
        }

        ctx.declare_event(
            EventType::ActorDidRenameShell,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::ShellRenamed {
                shell_id,
                old_name,
                new_name: args.new_name,
            },
        );
        Ok(())
    }
}

pub struct WorkbenchStageMutationHandler;

fn stage_args(command: &Command) -> &WorkbenchStageMutationArgs {
    match &command.args {
        CommandArgs::WorkbenchStageMutation(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for WorkbenchStageMutationHandler {
    fn command_type(&self) -> CommandType {
        CommandType::WorkbenchStageMutation
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = stage_args(command);
        resolve_workbench(ctx, &args.session_id, &command.actor)?;
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = stage_args(command).clone();
        if let Some(session) = ctx.world.session_mut(&args.session_id) {
            if let Some(data) = session.as_workbench_mut() {
                data.pending_mutations.push(args.mutation.clone());
            }
        }
        ctx.declare_event(
            EventType::WorkbenchShellMutationStaged,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Session {
                session: args.session_id,
            },
        );
        Ok(())
    }
}

pub struct WorkbenchPreviewHandler;

fn session_args(command: &Command) -> &WorkbenchSessionArgs {
    match &command.args {
        CommandArgs::WorkbenchPreview(args) | CommandArgs::WorkbenchCost(args) | CommandArgs::WorkbenchAbandon(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for WorkbenchPreviewHandler {
    fn command_type(&self) -> CommandType {
        CommandType::WorkbenchPreview
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = session_args(command);
        resolve_workbench(ctx, &args.session_id, &command.actor)?;
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = session_args(command).clone();
        let Some(data) = ctx.world.session(&args.session_id).and_then(|s| s.as_workbench()) else {
            return Ok(());
        };
        let Some(base) = ctx.world.actor(&command.actor).and_then(|a| a.shells.get(&data.current_shell_id)) else {
            return Ok(());
        };
        let _preview = preview_shell(base, &data.pending_mutations);
        ctx.declare_event(
            EventType::WorkbenchShellMutationStaged,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Session {
                session: args.session_id,
            },
        );
        Ok(())
    }
}

pub struct WorkbenchCostHandler;

impl CommandHandler for WorkbenchCostHandler {
    fn command_type(&self) -> CommandType {
        CommandType::WorkbenchCost
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = session_args(command);
        resolve_workbench(ctx, &args.session_id, &command.actor)?;
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = session_args(command).clone();
        let cost = ctx
            .world
            .session(&args.session_id)
            .and_then(|s| s.as_workbench())
            .map(|data| mutations_cost(&data.pending_mutations))
            .unwrap_or(0);
        ctx.declare_event(
            EventType::WorkbenchShellMutationStaged,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Resource {
                place: command.location.clone(),
                resource: "workbench_cost".to_string(),
                delta: cost,
            },
        );
        Ok(())
    }
}

pub struct WorkbenchCommitHandler;

fn commit_args(command: &Command) -> &WorkbenchCommitSchemaArgs {
    match &command.args {
        CommandArgs::WorkbenchCommit(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for WorkbenchCommitHandler {
    fn command_type(&self) -> CommandType {
        CommandType::WorkbenchCommit
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = commit_args(command);
        let data = resolve_workbench(ctx, &args.session_id, &command.actor)?;
        let actor = ctx.world.actor(&command.actor).expect("resolve_workbench checked ownership");
        let wallet_balance = actor.wallet.get("credits").copied().unwrap_or(0);
        if wallet_balance < mutations_cost(&data.pending_mutations) {
            return Err(DispatchError::declared(
                ErrorCode::InsufficientResources,
                ReducerPhase::PreValidate,
                "insufficient credits to commit staged shell mutations",
            ));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = commit_args(command).clone();
        let Some(data) = ctx.world.session(&args.session_id).and_then(|s| s.as_workbench()).cloned() else {
            return Ok(());
        };
        let cost = mutations_cost(&data.pending_mutations);

        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            if let Some(shell) = actor.shells.get(&data.current_shell_id).cloned() {
                let committed = preview_shell(&shell, &data.pending_mutations);
                actor.shells.insert(data.current_shell_id.clone(), committed);
            }
            *actor.wallet.entry("credits".to_string()).or_insert(0) -= cost;
            actor.sessions.remove(&args.session_id);
        }
        if let Some(session) = ctx.world.session_mut(&args.session_id) {
            session.status = SessionStatus::Ended;
        }

        ctx.declare_event(
            EventType::WorkbenchSessionDidCommit,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Session {
                session: args.session_id,
            },
        );
        Ok(())
    }
}

pub struct WorkbenchAbandonHandler;

impl CommandHandler for WorkbenchAbandonHandler {
    fn command_type(&self) -> CommandType {
        CommandType::WorkbenchAbandon
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = session_args(command);
        resolve_workbench(ctx, &args.session_id, &command.actor)?;
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = session_args(command).clone();
        if let Some(session) = ctx.world.session_mut(&args.session_id) {
            session.status = SessionStatus::Ended;
        }
        if let Some(actor) = ctx.world.actor_mut(&command.actor) {
            actor.sessions.remove(&args.session_id);
        }
        ctx.declare_event(
            EventType::WorkbenchSessionDidAbandon,
            command.actor.clone(),
            command.location.clone(),
            EventPayload::Session {
                session: args.session_id,
            },
        );
        Ok(())
    }
}
