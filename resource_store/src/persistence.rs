//! Store snapshot and JSON codec
//!
//! A snapshot is the ordered list of every allocated resource, in allocation
//! order, tagged by variant. Restoring a snapshot reproduces ids, edges
//! (including dead edges not yet evicted), counters and attributes verbatim.

use crate::resource::{LinkedResource, RealResource, Resource};
use crate::store::ResourceStore;
use core_types::{Attributes, ResourceId, ResourceType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// One serialized resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreRecord {
    /// A real resource with its attributes, counter and edges
    Real {
        id: ResourceId,
        resource_type: Option<ResourceType>,
        attributes: Attributes,
        hardlink_count: u32,
        children: Vec<(String, ResourceId)>,
    },
    /// A soft link
    Linked { id: ResourceId, target: ResourceId },
}

impl StoreRecord {
    /// Returns the ID of the serialized resource
    pub fn id(&self) -> ResourceId {
        match self {
            StoreRecord::Real { id, .. } => *id,
            StoreRecord::Linked { id, .. } => *id,
        }
    }

    /// Returns every ID this record refers to
    fn references(&self) -> Vec<ResourceId> {
        match self {
            StoreRecord::Real { children, .. } => children.iter().map(|(_, id)| *id).collect(),
            StoreRecord::Linked { target, .. } => vec![*target],
        }
    }
}

impl From<&Resource> for StoreRecord {
    fn from(resource: &Resource) -> Self {
        match resource {
            Resource::Real(real) => StoreRecord::Real {
                id: real.id(),
                resource_type: real.resource_type().cloned(),
                attributes: real.attributes().clone(),
                hardlink_count: real.hardlink_count(),
                children: real.edges().to_vec(),
            },
            Resource::Linked(link) => StoreRecord::Linked {
                id: link.id(),
                target: link.target(),
            },
        }
    }
}

impl From<StoreRecord> for Resource {
    fn from(record: StoreRecord) -> Self {
        match record {
            StoreRecord::Real {
                id,
                resource_type,
                attributes,
                hardlink_count,
                children,
            } => Resource::Real(RealResource::from_parts(
                id,
                resource_type,
                attributes,
                children,
                hardlink_count,
            )),
            StoreRecord::Linked { id, target } => {
                Resource::Linked(LinkedResource::new(id, target))
            }
        }
    }
}

/// Serializable container for a whole store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Version of the snapshot format (for future migrations)
    pub version: u32,
    /// One record per allocated resource, in allocation order
    pub records: Vec<StoreRecord>,
}

impl StoreSnapshot {
    /// Current version of the snapshot format
    pub const CURRENT_VERSION: u32 = 1;

    /// Creates a snapshot from records
    pub fn new(records: Vec<StoreRecord>) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            records,
        }
    }
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors that can occur while saving or restoring a store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Failed to serialize the snapshot
    #[error("Failed to serialize store: {0}")]
    SerializationFailed(String),

    /// Failed to deserialize the snapshot
    #[error("Failed to deserialize store: {0}")]
    DeserializationFailed(String),

    /// Unsupported snapshot version
    #[error("Unsupported store version: {0}")]
    UnsupportedVersion(u32),

    /// Record ids are not the gap-free sequence 1..=n
    #[error("Record {position} has id {found}, expected {expected}")]
    NonSequentialId {
        position: usize,
        expected: ResourceId,
        found: ResourceId,
    },

    /// A record refers to an id no record defines
    #[error("{from} refers to unknown {to}")]
    UnknownReference { from: ResourceId, to: ResourceId },

    /// The first record is missing or is not a real resource
    #[error("Snapshot has no real root resource")]
    MissingRoot,
}

impl ResourceStore {
    /// Serializes every allocated resource, in allocation order
    pub fn serialize(&self) -> StoreSnapshot {
        StoreSnapshot::new(self.iter().map(StoreRecord::from).collect())
    }

    /// Rebuilds a store from a snapshot, preserving ids
    ///
    /// The next-id counter is restored from the record count. That is only
    /// sound because ids are allocated gap-free from 1 and never reused, so
    /// the record ids are checked to be exactly `1..=n` in order.
    pub fn deserialize(snapshot: StoreSnapshot) -> PersistenceResult<Self> {
        if snapshot.version != StoreSnapshot::CURRENT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(snapshot.version));
        }

        match snapshot.records.first() {
            Some(StoreRecord::Real { .. }) => {}
            _ => return Err(PersistenceError::MissingRoot),
        }

        let mut expected = ResourceId::ROOT;
        for (position, record) in snapshot.records.iter().enumerate() {
            if record.id() != expected {
                return Err(PersistenceError::NonSequentialId {
                    position,
                    expected,
                    found: record.id(),
                });
            }
            expected = expected.next();
        }

        let count = snapshot.records.len() as u64;
        for record in &snapshot.records {
            for to in record.references() {
                if to.as_u64() == 0 || to.as_u64() > count {
                    return Err(PersistenceError::UnknownReference {
                        from: record.id(),
                        to,
                    });
                }
            }
        }

        debug!(records = count, "restoring store from snapshot");
        Ok(Self::from_resources(
            snapshot.records.into_iter().map(Resource::from).collect(),
        ))
    }
}

/// Serializes a snapshot to pretty-printed JSON bytes
pub fn to_json_bytes(snapshot: &StoreSnapshot) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot)
        .map_err(|e| PersistenceError::SerializationFailed(e.to_string()))
}

/// Deserializes a snapshot from JSON bytes
pub fn from_json_bytes(bytes: &[u8]) -> PersistenceResult<StoreSnapshot> {
    let snapshot: StoreSnapshot = serde_json::from_slice(bytes)
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

    if snapshot.version != StoreSnapshot::CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(snapshot.version));
    }

    Ok(snapshot)
}
