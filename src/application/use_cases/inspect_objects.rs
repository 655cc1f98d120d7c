use crate::application::dto::{ObjectFileSummary, RecordSummary};
use crate::shared::error::{StreamError, StreamKind};
use crate::shared::StreamResult;
use crate::stream::{ObjectCodec, StreamManager, StreamOptions};
use std::path::Path;

/// InspectObjectsUseCase - lists the records of an object file
///
/// Payloads are only decoded for json files, since bincode records
/// carry no type information.
pub struct InspectObjectsUseCase {
    options: StreamOptions,
}

impl InspectObjectsUseCase {
    pub fn new(options: StreamOptions) -> Self {
        Self { options }
    }

    pub fn execute(&self, path: &Path) -> StreamResult<ObjectFileSummary> {
        let mut manager = StreamManager::with_options(self.options);
        manager.setup_object_reader(path)?;
        // unset here only when open failures are tolerated
        let codec = manager
            .object_reader_codec()
            .ok_or(StreamError::StreamNotReady {
                stream: StreamKind::ObjectReader,
            })?;

        let mut records = Vec::new();
        while let Some(payload) = manager.read_raw_record()? {
            let value = match codec {
                ObjectCodec::Json => Some(codec.decode::<serde_json::Value>(&payload)?),
                ObjectCodec::Bincode => None,
            };
            records.push(RecordSummary {
                index: records.len(),
                size: payload.len(),
                value,
            });
        }
        manager.close_all()?;

        Ok(ObjectFileSummary { codec, records })
    }
}
