// hydrosim Feeder - In-process message queue
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Bounded in-process message queue.
//!
//! Stands in for a cloud storage queue: a [`Publisher`] enqueues text
//! messages, a [`Consumer`] drains them in order. Nothing is persisted and
//! messages still queued when both halves drop are lost.

use hydrosim::WaterLevelRecord;
use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tracing::trace;

/// Queue errors.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue capacity must be between 1 and {max}, got {requested}")]
    InvalidCapacity { requested: usize, max: usize },

    #[error("Queue closed: consumer dropped")]
    Closed,

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A queued message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Sequence number assigned by the publisher, starting at 0.
    pub id: u64,
    /// Message text.
    pub body: String,
}

/// Largest accepted queue capacity (tokio's semaphore permit limit).
pub const MAX_CAPACITY: usize = Semaphore::MAX_PERMITS;

/// Create a queue holding at most `capacity` pending messages.
pub fn message_queue(name: &str, capacity: usize) -> Result<(Publisher, Consumer), QueueError> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        return Err(QueueError::InvalidCapacity {
            requested: capacity,
            max: MAX_CAPACITY,
        });
    }
    let (tx, rx) = mpsc::channel(capacity);
    Ok((
        Publisher {
            name: name.to_string(),
            tx,
            next_id: 0,
        },
        Consumer {
            name: name.to_string(),
            rx,
            received: 0,
        },
    ))
}

/// Sending half of the queue.
#[derive(Debug)]
pub struct Publisher {
    name: String,
    tx: mpsc::Sender<QueueMessage>,
    next_id: u64,
}

impl Publisher {
    /// Queue name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of messages published so far.
    pub fn published(&self) -> u64 {
        self.next_id
    }

    /// Enqueue a text message, waiting while the queue is full.
    pub async fn publish(&mut self, body: String) -> Result<u64, QueueError> {
        let id = self.next_id;
        self.tx
            .send(QueueMessage { id, body })
            .await
            .map_err(|_| QueueError::Closed)?;
        self.next_id += 1;
        trace!(queue = %self.name, id, "message enqueued");
        Ok(id)
    }

    /// Enqueue a record as JSON.
    pub async fn publish_record(&mut self, record: &WaterLevelRecord) -> Result<u64, QueueError> {
        let body = record.to_json()?;
        self.publish(body).await
    }
}

/// Receiving half of the queue.
#[derive(Debug)]
pub struct Consumer {
    name: String,
    rx: mpsc::Receiver<QueueMessage>,
    received: u64,
}

impl Consumer {
    /// Queue name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of messages received so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Next message, or `None` once the publisher is gone and the queue is empty.
    pub async fn receive(&mut self) -> Option<QueueMessage> {
        let message = self.rx.recv().await?;
        self.received += 1;
        Some(message)
    }
}
