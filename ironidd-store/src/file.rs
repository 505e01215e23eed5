/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Filesystem dictionary sources.
//!
//! Source names are paths relative to a root directory, which is how
//! `\include-file` names are written in dictionary files.

use ironidd_core::error::SourceError;
use ironidd_dictionary::SourceLoader;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads dictionary sources from a directory.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    root: PathBuf,
}

impl FileSystemLoader {
    /// Creates a loader rooted at a directory.
    ///
    /// # Arguments
    /// * `root` - Directory that source names are resolved against
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path a source name resolves to.
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl SourceLoader for FileSystemLoader {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        let path = self.path_of(name);
        debug!(path = %path.display(), "reading dictionary source");
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound {
                name: name.to_string(),
            },
            _ => SourceError::Unreadable {
                name: name.to_string(),
                reason: e.to_string(),
            },
        })
    }
}
