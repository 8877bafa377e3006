//! Registry of parsed Flagpole files, one per document.

use std::fs;

use indexmap::IndexMap;

use crate::base::DocumentUri;

use super::FlagpoleFile;

/// Holds the most recently parsed [`FlagpoleFile`] per document, fed by
/// file-watcher notifications (create/change/delete) from the host.
///
/// Unreadable or unparsable files are absorbed: the failure is logged and
/// the document simply has no entry until a good version arrives.
#[derive(Default)]
pub struct FileMap {
    roots: IndexMap<DocumentUri, FlagpoleFile>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly discovered file.
    pub fn add(&mut self, uri: DocumentUri) {
        self.read_file(uri);
    }

    /// Re-read a changed file.
    pub fn update(&mut self, uri: DocumentUri) {
        self.read_file(uri);
    }

    /// Stop tracking a deleted file.
    pub fn remove(&mut self, uri: &DocumentUri) {
        self.roots.shift_remove(uri);
    }

    pub fn get_file(&self, uri: &DocumentUri) -> Option<&FlagpoleFile> {
        self.roots.get(uri)
    }

    /// All tracked files, in first-seen order.
    pub fn files(&self) -> impl Iterator<Item = &FlagpoleFile> {
        self.roots.values()
    }

    fn read_file(&mut self, uri: DocumentUri) {
        let contents = match fs::read_to_string(uri.fs_path()) {
            Ok(contents) => contents,
            Err(error) => {
                tracing::warn!("failed to read {uri}: {error}");
                self.roots.shift_remove(&uri);
                return;
            }
        };
        match FlagpoleFile::parse(uri.clone(), &contents) {
            Ok(file) => {
                self.roots.insert(uri, file);
            }
            Err(error) => {
                tracing::warn!("failed to parse {uri}: {error}");
                self.roots.shift_remove(&uri);
            }
        }
    }
}
