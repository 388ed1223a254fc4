pub mod config;
pub mod journal;
pub mod metrics;
pub mod pipeline;
pub mod relocator;
pub mod testing;
pub mod transcoder;
pub mod uploader;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use journal::{
    JournalError, ProcessingJournal, ProcessingRecord, ProcessingStatus, RecordFilter,
    SqliteJournal,
};
pub use pipeline::{BatchError, BatchReport, IngestPipeline, PipelineConfig, PipelineScheduler};
pub use relocator::{FsRelocator, RelocateError, Relocator};
pub use transcoder::{CommandTranscoder, Transcoder, TranscoderError};
pub use uploader::{
    BytesSource, FileSource, ObjectStore, ObjectStoreError, S3ObjectStore, UploadError,
    UploadPolicy, UploadSource, Uploader,
};
