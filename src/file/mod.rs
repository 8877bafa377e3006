//! Self-contained Flagpole file model.
//!
//! Unlike the outline path, which consumes symbol trees from an external
//! language service, [`FlagpoleFile`] parses raw YAML text itself and
//! derives the same category indexes plus offset-based navigation.
//! [`FileMap`] is the disk-backed registry of parsed files.

mod error;
mod file_map;
mod flagpole_file;
mod scanner;

pub use error::FlagpoleError;
pub use file_map::FileMap;
pub use flagpole_file::FlagpoleFile;
