//! Persistent artifact storage for the trained bundle.
//!
//! Artifacts live in a directory of blobs named `{kind}-{timestamp}` plus a
//! `latest-{kind}` alias overwritten on every successful training run. Each
//! blob is a versioned JSON envelope rather than an opaque object graph, so
//! the encoder/preprocessor/model boundary stays stable across readers.
//!
//! The training pipeline is the only writer; the scoring service only reads
//! the latest aliases. A reader that opens an alias mid-overwrite may see a
//! torn file; no cross-process lock is taken.

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Envelope format version; bump on any layout change
pub const FORMAT_VERSION: u32 = 1;

/// The three independently persisted artifacts of one training run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    TargetPreprocessor,
    FeaturePreprocessor,
    Model,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::TargetPreprocessor => "target-preprocessor",
            ArtifactKind::FeaturePreprocessor => "feature-preprocessor",
            ArtifactKind::Model => "model",
        }
    }

    /// Name of the alias pointing at the most recent run's artifact
    pub fn latest_name(&self) -> String {
        format!("latest-{}", self.as_str())
    }

    /// Timestamped snapshot name retained for history
    pub fn snapshot_name(&self, timestamp: &str) -> String {
        format!("{}-{}", self.as_str(), timestamp)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    format_version: u32,
    kind: String,
    created_at: DateTime<Utc>,
    payload: T,
}

/// Directory-backed artifact store
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an opaque blob under the given name
    pub fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(name), bytes)?;
        Ok(())
    }

    /// Read a blob back by name
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.dir.join(name))?)
    }

    /// Timestamp suffix for this run's snapshot names
    pub fn run_timestamp() -> String {
        Utc::now().format("%Y%m%d%H%M%S").to_string()
    }

    /// Persist one artifact as both a timestamped snapshot and the latest
    /// alias. The alias is written last, after the snapshot succeeded.
    pub fn save<T: Serialize>(
        &self,
        kind: ArtifactKind,
        timestamp: &str,
        value: &T,
    ) -> Result<()> {
        let envelope = Envelope {
            format_version: FORMAT_VERSION,
            kind: kind.as_str().to_string(),
            created_at: Utc::now(),
            payload: value,
        };
        let bytes = serde_json::to_vec(&envelope)?;

        let snapshot = kind.snapshot_name(timestamp);
        self.write(&snapshot, &bytes)?;
        self.write(&kind.latest_name(), &bytes)?;

        info!(kind = %kind, snapshot = %snapshot, "Artifact stored");
        Ok(())
    }

    /// Load the latest artifact of a kind, checking the envelope version
    /// and kind tag.
    pub fn load_latest<T: DeserializeOwned>(&self, kind: ArtifactKind) -> Result<T> {
        let name = kind.latest_name();
        let bytes = self.read(&name)?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(PipelineError::ArtifactVersion {
                name,
                expected: FORMAT_VERSION,
                actual: envelope.format_version,
            });
        }
        if envelope.kind != kind.as_str() {
            return Err(PipelineError::ArtifactKindMismatch {
                name,
                expected: kind.as_str().to_string(),
                actual: envelope.kind,
            });
        }
        Ok(envelope.payload)
    }
}
