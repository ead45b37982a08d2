// hydrosim Feeder - Generation pipeline
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Generate -> enqueue -> drain -> insert.
//!
//! A producer task publishes one JSON record per generated sample. A drain
//! task consumes the queue and inserts one table entity per valid message.
//! The drain ends when the producer has dropped its publisher and the queue
//! is empty.

use crate::queue::{message_queue, Consumer, Publisher, QueueError};
use crate::table::{TableEntity, TableError, TableStore};
use hydrosim::{GenerationRequest, GeneratorConfig, HydroError, SignalGenerator, WaterLevelRecord};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Generation failed: {0}")]
    Generation(#[from] HydroError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Generator settings.
    pub generator: GeneratorConfig,
    /// How much to generate.
    pub request: GenerationRequest,
    /// Maximum pending messages before the producer waits.
    pub queue_capacity: usize,
    /// Queue name (for logs).
    pub queue_name: String,
    /// Partition key for every inserted entity.
    pub partition_key: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            request: GenerationRequest::weeks(1),
            queue_capacity: 64,
            queue_name: "waterlevel-queue".to_string(),
            partition_key: "waterlevel".to_string(),
        }
    }
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Samples produced by the generator.
    pub generated: u64,
    /// Messages accepted by the queue.
    pub enqueued: u64,
    /// Entities written to the table.
    pub inserted: u64,
    /// Messages dropped by the drain (bad payload or key conflict).
    pub rejected: u64,
}

/// Counters from the drain side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub received: u64,
    pub inserted: u64,
    pub rejected: u64,
}

/// Run the full pipeline into `store`, returning the report and the store.
pub async fn run_pipeline<S>(
    config: PipelineConfig,
    store: S,
) -> Result<(PipelineReport, S), PipelineError>
where
    S: TableStore + Send + 'static,
{
    let expected = config.request.sample_count()?;
    let generator = SignalGenerator::with_config(config.generator);
    // Fail before spawning anything if the range is not representable.
    generator.samples(config.request)?;

    let (publisher, consumer) = message_queue(&config.queue_name, config.queue_capacity)?;
    info!(
        queue = %config.queue_name,
        samples = expected,
        capacity = config.queue_capacity,
        "Starting pipeline"
    );

    let request = config.request;
    let producer = tokio::spawn(produce(generator, request, publisher));

    let partition_key = config.partition_key;
    let drainer = tokio::spawn(async move {
        let mut store = store;
        let stats = drain(consumer, &mut store, &partition_key).await;
        (stats, store)
    });

    let (produced, (stats, store)) = tokio::try_join!(producer, drainer)?;
    let (generated, enqueued) = produced?;

    let report = PipelineReport {
        generated,
        enqueued,
        inserted: stats.inserted,
        rejected: stats.rejected,
    };
    info!(
        generated = report.generated,
        inserted = report.inserted,
        rejected = report.rejected,
        "Pipeline complete"
    );
    Ok((report, store))
}

/// Publish every sample of `request`. Returns (generated, enqueued).
pub async fn produce(
    generator: SignalGenerator,
    request: GenerationRequest,
    mut publisher: Publisher,
) -> Result<(u64, u64), PipelineError> {
    let mut generated = 0u64;
    for sample in generator.samples(request)? {
        generated += 1;
        publisher.publish_record(&WaterLevelRecord::from(sample)).await?;
    }
    debug!(queue = publisher.name(), generated, "Producer finished");
    Ok((generated, publisher.published()))
}

/// Drain `consumer` into `store` until the queue closes.
pub async fn drain<S: TableStore + ?Sized>(
    mut consumer: Consumer,
    store: &mut S,
    partition_key: &str,
) -> DrainStats {
    let mut stats = DrainStats::default();

    while let Some(message) = consumer.receive().await {
        stats.received += 1;

        let record = match WaterLevelRecord::from_json(&message.body) {
            Ok(record) => record,
            Err(e) => {
                warn!(id = message.id, "Dropping malformed message: {}", e);
                stats.rejected += 1;
                continue;
            }
        };

        let entity = TableEntity::from_record(partition_key, message.id, &record);
        match store.insert_entity(entity) {
            Ok(()) => stats.inserted += 1,
            Err(e) => {
                warn!(id = message.id, "Insert failed: {}", e);
                stats.rejected += 1;
            }
        }
    }

    debug!(
        queue = consumer.name(),
        received = consumer.received(),
        "Drain finished"
    );
    stats
}
