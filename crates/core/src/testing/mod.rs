//! Test doubles for the pipeline seams.

mod mock_store;
mod mock_transcoder;

pub use mock_store::{MockObjectStore, RecordedPut};
pub use mock_transcoder::MockTranscoder;
