use crate::stream::ObjectCodec;

/// Summary of a single record in an object file
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    pub index: usize,
    /// Payload size in bytes, excluding the length prefix
    pub size: usize,
    /// Decoded value, only for json-encoded files
    pub value: Option<serde_json::Value>,
}

/// ObjectFileSummary - what an object file holds
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectFileSummary {
    pub codec: ObjectCodec,
    pub records: Vec<RecordSummary>,
}

impl ObjectFileSummary {
    pub fn total_payload_bytes(&self) -> usize {
        self.records.iter().map(|record| record.size).sum()
    }
}
