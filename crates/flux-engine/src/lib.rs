//! Command registry, dispatch pipeline, and reducer combinators for the
//! flux engine: everything that turns a validated [`flux_core::Command`]
//! into world mutations and declared events.
//!
//! Grounded in the teacher's `runtime` crate: `ProviderRegistry` becomes
//! [`registry::HandlerRegistry`], `GameEngine::execute`'s three-phase
//! transition becomes [`registry::Dispatcher::dispatch`], and
//! `PostExecutionHook` chaining becomes the [`combinators`] decorators.

pub mod combinators;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod resolver;
pub mod session;

pub use error::{DispatchError, ReducerPhase};
pub use handlers::build_registry;
pub use registry::{CommandHandler, Dispatcher, HandlerRegistry};
pub use resolver::{build_resolver, IntentRecognizer, Resolver};

/// The full intent pipeline: resolve `intent` into a [`flux_core::Command`],
/// then dispatch it through `registry`. Callers that already hold a
/// `Command` (tests, admin tooling) can skip straight to
/// [`Dispatcher::dispatch`]; this is the entry point for raw player text.
pub fn execute_intent(
    intent: &flux_core::Intent,
    resolver: &Resolver,
    registry: &HandlerRegistry,
    ctx: &mut flux_core::TransformerContext<'_>,
) -> Result<flux_core::Command, DispatchError> {
    let command = resolver.resolve(intent, ctx.world)?;
    Dispatcher::dispatch(registry, &command, ctx)?;
    Ok(command)
}
