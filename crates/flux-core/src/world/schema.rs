//! Item schemas: the static definitions items point back to.

use std::collections::HashMap;

use crate::urn::SchemaUrn;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    pub urn: SchemaUrn,
    pub name: String,
    pub mass: u64,
    pub is_container: bool,
}

/// Registry of known item schemas, looked up by URN from the transformer
/// context's `schema_manager`.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<SchemaUrn, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, schema: Schema) {
        self.schemas.insert(schema.urn.clone(), schema);
    }

    pub fn get(&self, urn: &SchemaUrn) -> Option<&Schema> {
        self.schemas.get(urn)
    }

    pub fn exists(&self, urn: &SchemaUrn) -> bool {
        self.schemas.contains_key(urn)
    }
}
