//! JSON-lines simulation log shared by the scheduler and every worker.
//!
//! One record per line. The `event` discriminator and its fields come from a
//! tagged payload enum, so the record vocabulary is enforced at the type
//! level and fields that do not apply to an event simply do not exist on its
//! variant.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::error;

use tidvarv_core::checkpoint::CheckpointMode;

use crate::TelemetryError;

/// Originator of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Scheduler,
    Worker(usize),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Scheduler => f.write_str("scheduler"),
            Entity::Worker(id) => write!(f, "worker-{id}"),
        }
    }
}

impl Serialize for Entity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One record in the simulation log.
///
/// `payload` flattens into the record, contributing the `event` field plus
/// whatever fields that event carries.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    /// RFC-3339 wall-clock time of the log call.
    pub wall_time: String,
    pub entity: Entity,
    /// The originator's virtual time at the moment of the call.
    pub sim_time: u64,
    #[serde(flatten)]
    pub payload: LogPayload,
}

impl LogRecord {
    pub fn new(entity: Entity, sim_time: u64, payload: LogPayload) -> Self {
        Self {
            wall_time: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            entity,
            sim_time,
            payload,
        }
    }
}

/// Everything that can appear in the simulation log, one variant per event.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogPayload {
    ExternalDispatched {
        event_id: u64,
        target_worker: usize,
    },
    ExternalReceived {
        worker_id: usize,
        event_id: u64,
        event_timestamp: u64,
    },
    CheckpointCreated {
        worker_id: usize,
        history_len: usize,
        mode: CheckpointMode,
    },
    StragglerDetected {
        worker_id: usize,
        event_id: u64,
        event_timestamp: u64,
    },
    ExternalProcessed {
        worker_id: usize,
        event_id: u64,
        from_replay: bool,
        previous_lvt: u64,
    },
    InternalProcessed {
        worker_id: usize,
        previous_lvt: u64,
        jump: u64,
    },
    RollbackStart {
        worker_id: usize,
        rollback_from: u64,
        rollback_to: u64,
    },
    RollbackEnd {
        worker_id: usize,
        rollback_from: u64,
        rollback_to: u64,
    },
    WorkerStopped {
        worker_id: usize,
    },
}

/// Append-only JSON-lines writer shared by all simulation entities.
///
/// Serializes writes under a single mutex held for the duration of encoding
/// one record. A failed write is reported on the diagnostic stream; the
/// simulation continues.
pub struct SimLogger {
    writer: Mutex<BufWriter<File>>,
}

impl SimLogger {
    /// Creates (truncating) the log file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, TelemetryError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| TelemetryError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Appends one record as a JSON line.
    pub fn log(&self, record: LogRecord) {
        let mut writer = self.writer.lock();
        let outcome = serde_json::to_writer(&mut *writer, &record)
            .map_err(std::io::Error::from)
            .and_then(|()| writer.write_all(b"\n"));
        if let Err(source) = outcome {
            error!(error = %source, event = ?record.payload, "dropped simulation log record");
        }
    }

    /// Flushes buffered records to disk. Called once by the coordinator when
    /// a run ends.
    pub fn flush(&self) -> Result<(), TelemetryError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}
