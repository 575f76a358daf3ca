// msg2bucket - Partition-key resolution for log ingestion pipelines
//
// A consumer hands each message (JSON payload plus stream offset) to a
// partitioner, which derives the partition key downstream storage uses to
// route the message to its destination bucket. Key shape:
//
//   dt=<YYYY-MM-DD>&offset=<bucket-start>
//
// Resolution never fails ingestion: any per-message problem (malformed
// payload, missing timestamp field, unparsable timestamp) degrades to a
// constant default key so the message is misrouted, not dropped.

pub mod config;
pub mod error;
pub mod json_path;
pub mod message;
pub mod pattern;
pub mod resolver;

pub use config::{ParserConfig, Strategy};
pub use error::PartitionerError;
pub use message::Message;
pub use resolver::{
    from_config, DateOffsetPartitioner, OffsetPartitioner, Partitioner, DEFAULT_PARTITION_KEY,
};
