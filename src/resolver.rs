//! Partition-key resolution strategies.
//!
//! A partitioner maps one consumed message to the partition key downstream
//! storage routes it by:
//!
//!   dt=<YYYY-MM-DD>&offset=<bucket-start>
//!
//! The date component comes from a timestamp field inside the JSON payload,
//! parsed against the configured input pattern and reformatted with the
//! fixed output pattern. The offset component quantizes the message's
//! stream offset into fixed-width buckets. Any per-message failure returns
//! the default key instead of an error so a bad message can never stall
//! ingestion.

use crate::config::{ParserConfig, Strategy};
use crate::error::{PartitionerError, Result};
use crate::json_path;
use crate::message::Message;
use crate::pattern;
use chrono::format::{parse as parse_items, Parsed, StrftimeItems};
use chrono::TimeZone;
use chrono_tz::Tz;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Fallback key returned on every degraded path.
///
/// The `000000` literal is historical: produced keys render the bucket with
/// no leading zeros, but existing stores already contain default buckets
/// under this exact name, so it is preserved verbatim.
pub const DEFAULT_PARTITION_KEY: &str = "dt=1970-01-01&offset=000000";

/// Date component of produced keys, independent of the input pattern.
const OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// Capability shared by all partitioning strategies: derive a routing key
/// from a single message. Implementations hold immutable configuration only
/// and may be shared freely across workers.
pub trait Partitioner: Send + Sync {
    fn partition_key(&self, message: &Message) -> String;
}

/// Build the configured partitioning strategy.
pub fn from_config(config: &ParserConfig) -> Result<Box<dyn Partitioner>> {
    debug!(strategy = %config.strategy, "constructing partitioner");
    match config.strategy {
        Strategy::DateOffset => {
            let time_zone: Tz =
                config
                    .time_zone
                    .parse()
                    .map_err(|_| PartitionerError::UnknownTimeZone {
                        zone: config.time_zone.clone(),
                    })?;
            Ok(Box::new(DateOffsetPartitioner::new(
                time_zone,
                &config.timestamp_field,
                &config.input_pattern,
                config.offsets_per_partition,
            )?))
        }
        Strategy::Offset => Ok(Box::new(OffsetPartitioner::new(
            config.offsets_per_partition,
        )?)),
    }
}

/// Why a message fell back to the default key. Internal control flow only;
/// callers of `partition_key` never see an error.
enum Fallback {
    MalformedPayload,
    MissingField,
    UnparsableTimestamp { value: String },
}

/// Timestamp + offset strategy.
pub struct DateOffsetPartitioner {
    time_zone: Tz,
    timestamp_field: String,
    /// Pattern as configured, kept for diagnostics.
    input_pattern: String,
    /// strftime translation of `input_pattern`.
    input_format: String,
    offsets_per_partition: u64,
}

impl DateOffsetPartitioner {
    /// Translates and validates the input pattern once; empty or malformed
    /// patterns and a zero bucket width fail here rather than per message.
    pub fn new(
        time_zone: Tz,
        timestamp_field: &str,
        input_pattern: &str,
        offsets_per_partition: u64,
    ) -> Result<Self> {
        if offsets_per_partition == 0 {
            return Err(PartitionerError::ZeroBucketWidth);
        }
        let input_format = pattern::to_strftime(input_pattern)?;
        Ok(Self {
            time_zone,
            timestamp_field: timestamp_field.to_string(),
            input_pattern: input_pattern.to_string(),
            input_format,
            offsets_per_partition,
        })
    }

    fn try_partition_key(&self, message: &Message) -> std::result::Result<String, Fallback> {
        let payload: JsonValue =
            serde_json::from_slice(&message.payload).map_err(|_| Fallback::MalformedPayload)?;
        if !payload.is_object() {
            return Err(Fallback::MalformedPayload);
        }

        let field = json_path::lookup(&payload, &self.timestamp_field)
            .ok_or(Fallback::MissingField)?;
        if field.is_null() {
            return Err(Fallback::MissingField);
        }

        // raw string for JSON strings, JSON rendering for everything else
        // (a numeric timestamp like 20210615 keeps its digits, unquoted)
        let raw = match field {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        };

        let date = self
            .format_date(&raw)
            .ok_or(Fallback::UnparsableTimestamp { value: raw })?;
        let bucket = bucket_start(message.offset, self.offsets_per_partition);
        Ok(format!("dt={date}&offset={bucket}"))
    }

    /// Parse `raw` against the input pattern and render the calendar date.
    ///
    /// An explicit UTC offset in the value fixes the instant and the
    /// configured zone picks the calendar date; without one the value is
    /// read as local time in the configured zone; date-only values format
    /// directly.
    fn format_date(&self, raw: &str) -> Option<String> {
        let mut parsed = Parsed::new();
        parse_items(&mut parsed, raw, StrftimeItems::new(&self.input_format)).ok()?;

        if let Ok(instant) = parsed.to_datetime() {
            return Some(
                instant
                    .with_timezone(&self.time_zone)
                    .format(OUTPUT_FORMAT)
                    .to_string(),
            );
        }

        if let Ok(naive) = parsed.to_naive_datetime_with_offset(0) {
            return Some(match self.time_zone.from_local_datetime(&naive).earliest() {
                Some(local) => local.format(OUTPUT_FORMAT).to_string(),
                // DST gap: this wall-clock time never occurs in the zone,
                // but its calendar date is still well defined
                None => naive.date().format(OUTPUT_FORMAT).to_string(),
            });
        }

        parsed
            .to_naive_date()
            .ok()
            .map(|date| date.format(OUTPUT_FORMAT).to_string())
    }
}

impl Partitioner for DateOffsetPartitioner {
    fn partition_key(&self, message: &Message) -> String {
        match self.try_partition_key(message) {
            Ok(key) => key,
            Err(Fallback::UnparsableTimestamp { value }) => {
                warn!(
                    topic = %message.topic,
                    partition = message.partition,
                    offset = message.offset,
                    value = %value,
                    pattern = %self.input_pattern,
                    "timestamp does not match input pattern; using default partition key"
                );
                DEFAULT_PARTITION_KEY.to_string()
            }
            Err(Fallback::MalformedPayload | Fallback::MissingField) => {
                DEFAULT_PARTITION_KEY.to_string()
            }
        }
    }
}

/// Offset-only strategy: same quantization, no date component.
pub struct OffsetPartitioner {
    offsets_per_partition: u64,
}

impl OffsetPartitioner {
    pub fn new(offsets_per_partition: u64) -> Result<Self> {
        if offsets_per_partition == 0 {
            return Err(PartitionerError::ZeroBucketWidth);
        }
        Ok(Self {
            offsets_per_partition,
        })
    }
}

impl Partitioner for OffsetPartitioner {
    fn partition_key(&self, message: &Message) -> String {
        format!(
            "offset={}",
            bucket_start(message.offset, self.offsets_per_partition)
        )
    }
}

/// Start of the fixed-width bucket containing `offset`. Truncating division
/// equals floor on u64, so an offset exactly on a boundary buckets into that
/// boundary itself.
fn bucket_start(offset: u64, offsets_per_partition: u64) -> u64 {
    (offset / offsets_per_partition) * offsets_per_partition
}
