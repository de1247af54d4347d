//! Delivery of export artifacts to their destination.

use super::artifact::ExportArtifact;
use crate::error::{Error, Result};
use crate::files::{unique_path, write_atomic};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Delivery Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Written to this path
    Saved(PathBuf),
    /// Placed on the system clipboard
    Copied,
    /// Kept in memory by the sink
    Captured,
    /// The user dismissed the destination prompt
    Cancelled,
}

/// A destination for export artifacts.
pub trait DeliverySink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<Delivery>;
}

/// Hand an artifact to a sink after checking it is fully formed.
pub fn deliver(artifact: &ExportArtifact, sink: &mut dyn DeliverySink) -> Result<Delivery> {
    artifact.validate()?;
    debug!(
        "Delivering {} ({} bytes)",
        artifact.file_name,
        artifact.contents.len()
    );
    sink.deliver(artifact)
}

/// Write an artifact to `path` in one step.
pub(crate) fn write_artifact(path: &Path, artifact: &ExportArtifact) -> Result<()> {
    write_atomic(path, artifact.bytes()).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Exported {} to {}", artifact.format.label(), path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory Sink
// ─────────────────────────────────────────────────────────────────────────────

/// Writes artifacts into a directory, never overwriting an existing file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DeliverySink for DirectorySink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<Delivery> {
        if !self.dir.is_dir() {
            fs::create_dir_all(&self.dir).map_err(|source| Error::FileWrite {
                path: self.dir.clone(),
                source,
            })?;
        }

        let path = unique_path(&self.dir, &artifact.file_name);
        write_artifact(&path, artifact)?;
        Ok(Delivery::Saved(path))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Capturing Sink
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps delivered artifacts in memory.
#[derive(Debug, Default)]
pub struct CapturingSink {
    artifacts: Vec<ExportArtifact>,
    failure: Option<String>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that refuses every artifact with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            artifacts: Vec::new(),
            failure: Some(message.into()),
        }
    }

    pub fn artifacts(&self) -> &[ExportArtifact] {
        &self.artifacts
    }

    pub fn last(&self) -> Option<&ExportArtifact> {
        self.artifacts.last()
    }
}

impl DeliverySink for CapturingSink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<Delivery> {
        if let Some(message) = &self.failure {
            return Err(Error::Delivery {
                file_name: artifact.file_name.clone(),
                message: message.clone(),
            });
        }
        self.artifacts.push(artifact.clone());
        Ok(Delivery::Captured)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::document::Document;
    use crate::export::ExportFormat;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn artifact(format: ExportFormat) -> ExportArtifact {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        ExportArtifact::build(&Document::default(), format, &Settings::default(), at)
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(dir.path());

        let delivery = deliver(&artifact(ExportFormat::Markdown), &mut sink).unwrap();
        let Delivery::Saved(path) = &delivery else {
            panic!("expected a saved file, got {:?}", delivery);
        };

        assert_eq!(*path, dir.path().join("dad-notes-2024-05-01T08-00-00-000Z.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "Start writing ✍️");
    }

    #[test]
    fn test_directory_sink_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        let html = artifact(ExportFormat::Html);

        let first = sink.deliver(&html).unwrap();
        let second = sink.deliver(&html).unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_directory_sink_creates_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("exports").join("may");
        let mut sink = DirectorySink::new(&target);

        sink.deliver(&artifact(ExportFormat::Markdown)).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_directory_sink_failure_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();
        let mut sink = DirectorySink::new(&blocker);

        let err = sink.deliver(&artifact(ExportFormat::Markdown)).unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_deliver_rejects_incomplete_artifact() {
        let mut sink = CapturingSink::new();
        let mut bad = artifact(ExportFormat::Markdown);
        bad.file_name.clear();

        assert!(deliver(&bad, &mut sink).is_err());
        assert!(sink.artifacts().is_empty());
    }

    #[test]
    fn test_capturing_sink() {
        let mut sink = CapturingSink::new();
        assert_eq!(
            deliver(&artifact(ExportFormat::Html), &mut sink).unwrap(),
            Delivery::Captured
        );
        assert_eq!(sink.last().unwrap().format, ExportFormat::Html);

        let mut failing = CapturingSink::failing("disk full");
        let err = deliver(&artifact(ExportFormat::Html), &mut failing).unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
