//! Relocator module for moving processed recordings out of the inbox.
//!
//! A relocation is a single atomic rename into the processed directory,
//! preserving the original file name. The directory is created on
//! demand; an existing directory is not an error.

mod error;
mod fs_relocator;
mod traits;

pub use error::RelocateError;
pub use fs_relocator::FsRelocator;
pub use traits::Relocator;
