//! Opaque unique identifiers for intents and commands.
//!
//! Distinct from [`crate::urn::Urn`]: ids identify a single request's
//! passage through the pipeline (the "trace"), not a persistent entity.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Injectable unique-id source. Implementations must be deterministic
/// given the same call sequence (spec §5): a counter-backed generator is
/// typical for tests and replay, a UUID generator for production.
pub trait IdSource {
    fn next_id(&mut self) -> Id;
}

/// A simple monotonically-increasing id source, deterministic by
/// construction. Suitable for tests and for any deployment that does not
/// need globally-unique ids across processes.
#[derive(Clone, Debug, Default)]
pub struct CounterIdSource {
    prefix: &'static str,
    counter: u64,
}

impl CounterIdSource {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, counter: 0 }
    }
}

impl IdSource for CounterIdSource {
    fn next_id(&mut self) -> Id {
        self.counter += 1;
        Id::new(format!("{}-{}", self.prefix, self.counter))
    }
}
