//! Store identifier for todo records.
//!
//! # Design
//! MongoDB assigns a 12-byte `ObjectId` to every inserted document. Over the
//! wire the id travels as its 24-digit hex string; the extended-JSON form
//! (`{"$oid": "..."}`) that `ObjectId`'s own serde impl produces never leaks
//! into API payloads.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a stored todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(ObjectId);

/// Returned when a string is not a well-formed store identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid todo id: {input:?}")]
pub struct InvalidId {
    pub input: String,
}

impl TodoId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for TodoId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for TodoId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self).map_err(|_| InvalidId {
            input: s.to_string(),
        })
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for TodoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
