//! `pactload folder`: pacts from a local directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use pactload_core::ProviderName;
use pactload_loader::{PactFolderLoader, PactLoader};

use super::report;

/// Arguments for `pactload folder`.
#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Directory holding `*.json` pact files.
    pub dir: PathBuf,

    /// Provider to load pacts for.
    #[arg(long)]
    pub provider: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl FolderArgs {
    pub fn run(self) -> Result<()> {
        let mut loader = PactFolderLoader::new(&self.dir);
        let pacts = loader
            .load(&ProviderName::from(self.provider.as_str()))
            .with_context(|| format!("failed to load pacts from {}", self.dir.display()))?;
        report::print(&loader.description(), &pacts, self.json)
    }
}
