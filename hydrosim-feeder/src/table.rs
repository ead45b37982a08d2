// hydrosim Feeder - Table store
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Table store abstraction.
//!
//! Entities are addressed by a (partition key, row key) pair. Inserting an
//! entity whose key already exists is a conflict, never an overwrite.

use chrono::{DateTime, Utc};
use hydrosim::WaterLevelRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

/// Table errors.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Entity already exists: {partition_key}/{row_key}")]
    Conflict {
        partition_key: String,
        row_key: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A stored water level entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntity {
    pub partition_key: String,
    pub row_key: String,
    pub water_level: f64,
    pub date: DateTime<Utc>,
}

impl TableEntity {
    /// Build an entity from a record and its sequence number.
    ///
    /// The row key is zero-padded so lexical order equals sequence order.
    pub fn from_record(partition_key: &str, sequence: u64, record: &WaterLevelRecord) -> Self {
        Self {
            partition_key: partition_key.to_string(),
            row_key: row_key(sequence),
            water_level: record.water_level,
            date: record.date,
        }
    }
}

/// Row key for a sequence number.
pub fn row_key(sequence: u64) -> String {
    format!("{:020}", sequence)
}

/// Storage for table entities.
pub trait TableStore {
    /// Insert a new entity. Fails with [`TableError::Conflict`] if the key exists.
    fn insert_entity(&mut self, entity: TableEntity) -> Result<(), TableError>;

    /// Fetch one entity.
    fn get_entity(&self, partition_key: &str, row_key: &str) -> Option<&TableEntity>;

    /// All entities of a partition, ordered by row key.
    fn query_partition(&self, partition_key: &str) -> Vec<&TableEntity>;

    /// Total number of entities.
    fn len(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory table.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    name: String,
    entities: BTreeMap<(String, String), TableEntity>,
}

impl MemoryTableStore {
    /// Create an empty table.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entities: BTreeMap::new(),
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate all entities in key order.
    pub fn iter(&self) -> impl Iterator<Item = &TableEntity> {
        self.entities.values()
    }

    /// Dump all entities as a JSON array.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let entities: Vec<&TableEntity> = self.iter().collect();
        serde_json::to_writer_pretty(writer, &entities)?;
        Ok(())
    }
}

impl TableStore for MemoryTableStore {
    fn insert_entity(&mut self, entity: TableEntity) -> Result<(), TableError> {
        let key = (entity.partition_key.clone(), entity.row_key.clone());
        if self.entities.contains_key(&key) {
            return Err(TableError::Conflict {
                partition_key: key.0,
                row_key: key.1,
            });
        }
        self.entities.insert(key, entity);
        Ok(())
    }

    fn get_entity(&self, partition_key: &str, row_key: &str) -> Option<&TableEntity> {
        self.entities
            .get(&(partition_key.to_string(), row_key.to_string()))
    }

    fn query_partition(&self, partition_key: &str) -> Vec<&TableEntity> {
        self.entities
            .values()
            .filter(|e| e.partition_key == partition_key)
            .collect()
    }

    fn len(&self) -> usize {
        self.entities.len()
    }
}
