//! Editing session
//!
//! A [`Session`] owns everything one open document needs: the settings it
//! was started with, the surface adapter holding the live document, and the
//! last message to show the user. Several sessions can coexist.
//!
//! Adding an image is a two-phase protocol. [`Session::ingest`] validates
//! and encodes the file without touching the document; [`Session::insert_image`]
//! places the finished asset. Ingests may run concurrently; whichever is
//! inserted last ends up last at the insertion point.

use crate::assets::{ingest, Asset, AssetSource, IngestLimits};
use crate::config::Settings;
use crate::document::Document;
use crate::error::Result;
use crate::export::{deliver, Delivery, DeliverySink, ExportArtifact, ExportFormat};
use crate::surface::{EditingSurface, SurfaceAdapter};
use chrono::{DateTime, Utc};
use log::{info, warn};

pub struct Session<S: EditingSurface> {
    settings: Settings,
    adapter: SurfaceAdapter<S>,
    toast: Option<String>,
}

impl<S: EditingSurface> Session<S> {
    /// Start a session on the configured default content.
    pub fn new(settings: Settings) -> Self {
        let adapter = SurfaceAdapter::new(settings.default_document(), settings.ingest_limits());
        Self {
            settings,
            adapter,
            toast: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn limits(&self) -> IngestLimits {
        self.settings.ingest_limits()
    }

    pub fn attach_surface(&mut self, surface: S) {
        self.adapter.attach(surface);
    }

    pub fn adapter(&self) -> &SurfaceAdapter<S> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut SurfaceAdapter<S> {
        &mut self.adapter
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Images
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate and encode an image. The document is not touched.
    pub async fn ingest<A: AssetSource>(&self, source: &A) -> Result<Asset> {
        Ok(ingest(source, &self.limits()).await?)
    }

    /// Insert an ingested image at the editor's cursor.
    ///
    /// `Ok(None)` means no ready editor was attached and nothing changed.
    pub fn insert_image(&mut self, asset: Asset, alt: &str) -> Result<Option<usize>> {
        let result = self.adapter.request_insert_image(asset, alt);
        if let Err(e) = &result {
            warn!("Image insert failed: {}", e);
            self.show_toast(e.to_string());
        }
        result
    }

    /// Ingest then insert. Failures are also kept as the session's toast.
    pub async fn add_image<A: AssetSource>(&mut self, source: &A, alt: &str) -> Result<Option<usize>> {
        match self.ingest(source).await {
            Ok(asset) => self.insert_image(asset, alt),
            Err(e) => {
                warn!("Could not add {}: {}", source.name(), e);
                self.show_toast(e.to_string());
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// Go back to the configured default content.
    pub fn reset(&mut self) -> Result<()> {
        info!("Resetting document to default content");
        self.adapter.reset(self.settings.default_blocks())
    }

    /// Apply pending editor changes, returning how many were applied.
    pub fn sync(&mut self) -> usize {
        self.adapter.process_changes()
    }

    pub fn snapshot(&self) -> Document {
        self.adapter.snapshot()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize a snapshot of the document.
    pub fn export(&self, format: ExportFormat, at: DateTime<Utc>) -> ExportArtifact {
        ExportArtifact::build(&self.snapshot(), format, &self.settings, at)
    }

    /// Export now and hand the artifact to `sink`.
    ///
    /// A failed delivery leaves the document as it was, so it can be
    /// retried.
    pub fn deliver(&mut self, format: ExportFormat, sink: &mut dyn DeliverySink) -> Result<Delivery> {
        let artifact = self.export(format, Utc::now());
        let result = deliver(&artifact, sink);
        if let Err(e) = &result {
            warn!("Export failed: {}", e);
            self.show_toast(e.to_string());
        }
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────────

    /// Remember a message for the host to show the user.
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    /// Take the pending message, if any.
    pub fn take_toast(&mut self) -> Option<String> {
        self.toast.take()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
