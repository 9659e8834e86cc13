//! JSON output
//!
//! Compact encoding of the record exactly as modelled, with the archive
//! field names and nothing added or dropped.

use crate::output::traits::{RecordSerializer, SerializeResult};
use crate::record::PageRecord;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl RecordSerializer for JsonSerializer {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize(&self, record: &PageRecord) -> SerializeResult<Vec<u8>> {
        Ok(serde_json::to_vec(record)?)
    }
}
