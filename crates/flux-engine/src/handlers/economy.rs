//! CREDIT (spec §4.5). Always authored by the system actor regardless of
//! which actor issued the underlying intent.

use flux_core::command::{CommandArgs, CreditArgs};
use flux_core::{config, Command, CommandType, ErrorCode, EventPayload, EventType, TransformerContext};

use crate::error::{DispatchError, ReducerPhase};
use crate::registry::CommandHandler;

pub struct CreditHandler;

fn args(command: &Command) -> &CreditArgs {
    match &command.args {
        CommandArgs::Credit(args) => args,
        _ => unreachable!("registry dispatches by command_type"),
    }
}

impl CommandHandler for CreditHandler {
    fn command_type(&self) -> CommandType {
        CommandType::Credit
    }

    fn pre_validate(&self, command: &Command, ctx: &TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = args(command);
        if ctx.world.actor(&args.recipient).is_none() {
            return Err(DispatchError::declared(
                ErrorCode::InvalidTarget,
                ReducerPhase::PreValidate,
                "credit recipient does not exist",
            ));
        }
        if args.amount < 1 || args.amount > config::MAX_SAFE_CREDIT {
            return Err(DispatchError::declared(
                ErrorCode::InvalidArgument,
                ReducerPhase::PreValidate,
                "credit amount is out of range",
            ));
        }
        Ok(())
    }

    fn apply(&self, command: &Command, ctx: &mut TransformerContext<'_>) -> Result<(), DispatchError> {
        let args = args(command).clone();
        if let Some(recipient) = ctx.world.actor_mut(&args.recipient) {
            *recipient.wallet.entry(args.currency.clone()).or_insert(0) += args.amount;
        }
        ctx.declare_event(
            EventType::ActorDidReceiveCurrency,
            args.recipient,
            command.location.clone(),
            EventPayload::Credited {
                currency: args.currency,
                amount: args.amount,
            },
        );
        Ok(())
    }
}
