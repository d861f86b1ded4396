//! Deterministic world model, taxonomy, and intent/command types shared
//! by every flux engine crate.
//!
//! This crate owns the data: the [`world`] projection, typed [`urn`]
//! identifiers, the [`intent`] -> [`command`] pipeline's value types, the
//! [`event`]/error vocabulary, dice rolling, and the [`context`] handed
//! to reducers. It has no opinion about dispatch order or handler
//! registration; that lives in `flux-engine`.

pub mod command;
pub mod config;
pub mod context;
pub mod dice;
pub mod error;
pub mod event;
pub mod ids;
pub mod intent;
pub mod urn;
pub mod world;

pub use command::{Command, CommandArgs, CommandId, CommandType};
pub use context::TransformerContext;
pub use error::{DeclaredError, EngineError, ErrorCode, ErrorContext, ErrorSeverity};
pub use event::{EventPayload, EventType, WorldEvent};
pub use ids::{Id, IdSource};
pub use intent::{parse_intent, Intent, IntentId};
pub use urn::{ActorUrn, GroupUrn, ItemUrn, PlaceUrn, SchemaUrn, SessionUrn, Urn, UrnKind};
pub use world::World;
