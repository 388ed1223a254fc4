//! Durable object-store uploads.
//!
//! The network dependency is a single-capability [`ObjectStore`] trait
//! (durable PUT, idempotent on key overwrite). The [`Uploader`] owns the
//! retry policy: bounded attempts, exponential backoff, source rewinding
//! between attempts, and prompt cancellation.

mod error;
mod s3;
mod source;
mod traits;
mod upload;

pub use error::UploadError;
pub use s3::S3ObjectStore;
pub use source::{BytesSource, FileSource, UploadSource};
pub use traits::{ObjectStore, ObjectStoreError};
pub use upload::{UploadPolicy, Uploader};
