//! Client-side type parser dispatch table.
//!
//! `TypeParsers` is the OID → decoder table that query execution consults
//! for every text-format column. It is shared (usually one per connection
//! pool) and written by [`SpatialRegistry::register`](crate::SpatialRegistry::register).

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;

use crate::decode::TypeParser;
use crate::error::Result;
use crate::types::SpatialValue;

/// OID-keyed decoder table.
#[derive(Default)]
pub struct TypeParsers {
    parsers: RwLock<HashMap<u32, TypeParser>>,
}

impl TypeParsers {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a decoder to an OID, returning the one it replaces.
    pub fn set_type_parser(&self, oid: u32, parser: TypeParser) -> Option<TypeParser> {
        self.parsers.write().insert(oid, parser)
    }

    /// Get the decoder bound to an OID.
    pub fn type_parser(&self, oid: u32) -> Option<TypeParser> {
        self.parsers.read().get(&oid).cloned()
    }

    /// Check whether an OID has a decoder.
    pub fn contains(&self, oid: u32) -> bool {
        self.parsers.read().contains_key(&oid)
    }

    /// Decode a text value for a column of type `oid`.
    ///
    /// Returns `None` when no decoder is bound, leaving the caller to fall
    /// back to the raw text.
    pub fn parse(&self, oid: u32, raw: Option<&str>) -> Option<Result<SpatialValue>> {
        let parser = self.type_parser(oid)?;
        Some(parser(raw))
    }

    /// Number of bound OIDs.
    pub fn len(&self) -> usize {
        self.parsers.read().len()
    }

    /// Check if no decoder is bound.
    pub fn is_empty(&self) -> bool {
        self.parsers.read().is_empty()
    }
}

impl fmt::Debug for TypeParsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut oids: Vec<u32> = self.parsers.read().keys().copied().collect();
        oids.sort_unstable();
        f.debug_struct("TypeParsers").field("oids", &oids).finish()
    }
}
