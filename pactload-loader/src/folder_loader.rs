//! Pact files from a local directory.
//!
//! Every `*.json` file directly inside the directory is parsed; those whose
//! provider matches are returned, in file-name order. A missing directory
//! yields no pacts rather than an error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pactload_core::{PactDocument, PactError, ProviderName};

use crate::error::LoadError;
use crate::source::PactSource;
use crate::PactLoader;

/// Loads pacts from `*.json` files in a directory.
#[derive(Debug, Clone)]
pub struct PactFolderLoader {
    dir: PathBuf,
    pact_source: PactSource,
}

impl PactFolderLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            pact_source: PactSource::Directory {
                dir: dir.clone(),
                pacts: BTreeMap::new(),
            },
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn pact_files(&self) -> Result<Vec<PathBuf>, LoadError> {
        if !self.dir.is_dir() {
            tracing::warn!("pact directory {} does not exist", self.dir.display());
            return Ok(vec![]);
        }
        let io_err = |e| {
            LoadError::Pact(PactError::Io {
                path: self.dir.clone(),
                source: e,
            })
        };
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)
            .map_err(io_err)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        files.sort();
        Ok(files)
    }
}

impl PactLoader for PactFolderLoader {
    fn description(&self) -> String {
        format!("Directory({})", self.dir.display())
    }

    fn load(&mut self, provider: &ProviderName) -> Result<Vec<PactDocument>, LoadError> {
        let mut loaded = Vec::new();
        for path in self.pact_files()? {
            let pact = PactDocument::load_at(&path)?;
            if pact.provider_name() != *provider {
                tracing::debug!("skipping {}: provider is '{}'", path.display(), pact.provider.name);
                continue;
            }
            if let PactSource::Directory { pacts, .. } = &mut self.pact_source {
                pacts.insert(path, pact.clone());
            }
            loaded.push(pact);
        }
        Ok(loaded)
    }

    fn pact_source(&self) -> &PactSource {
        &self.pact_source
    }
}
