//! Consumed message handed to a partitioner.

/// A single message as consumed from its source stream.
///
/// The payload is expected to contain UTF-8 JSON but is never required to;
/// partitioners read the message, they do not own or mutate it. Topic and
/// partition identify the source stream and surface in diagnostics only.
#[derive(Debug, Clone)]
pub struct Message {
    pub topic: String,
    pub partition: i32,
    /// Position of the message within its source partition, non-negative
    /// and monotonically increasing.
    pub offset: u64,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(topic: impl Into<String>, partition: i32, offset: u64, payload: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            partition,
            offset,
            payload,
        }
    }
}
