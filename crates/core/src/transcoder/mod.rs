//! External transcoder invocation.
//!
//! Recorded segments are converted by an opaque external binary
//! (`janus-pp-rec` by default) invoked as `command <input> <output>`.
//! The binary's contract is exit code + combined output + artifact on disk.

mod command;
mod error;
mod traits;

pub use command::CommandTranscoder;
pub use error::TranscoderError;
pub use traits::Transcoder;
