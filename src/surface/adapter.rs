//! Keeps the session document in step with an editing surface.

use super::{EditingSurface, SurfaceContent};
use crate::assets::{Asset, IngestLimits};
use crate::document::{Block, Document};
use crate::error::Result;
use crate::markdown::parse_blocks;
use log::{debug, warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

type Observer = Box<dyn FnMut(&Document)>;

/// A queued "content changed" signal from the attached surface.
#[derive(Debug, Clone, Copy)]
struct ChangeNotice {
    /// Attachment the notice came from; notices of a detached surface are
    /// ignored
    generation: u64,
    seq: u64,
}

/// Owns the live [`Document`] and mirrors an attached [`EditingSurface`].
///
/// Surface callbacks only enqueue a notice. Notices are applied in order by
/// [`process_changes`](Self::process_changes) or
/// [`next_change`](Self::next_change), each replacing the document with a
/// snapshot of the surface content and republishing it to observers.
pub struct SurfaceAdapter<S: EditingSurface> {
    surface: Option<S>,
    document: Document,
    limits: IngestLimits,
    observers: Vec<Observer>,
    generation: u64,
    notices_tx: UnboundedSender<ChangeNotice>,
    notices_rx: UnboundedReceiver<ChangeNotice>,
}

impl<S: EditingSurface> SurfaceAdapter<S> {
    /// Create an adapter with no surface attached.
    ///
    /// `limits` applies to images found in Markdown reported by a surface.
    pub fn new(document: Document, limits: IngestLimits) -> Self {
        let (notices_tx, notices_rx) = unbounded_channel();
        Self {
            surface: None,
            document,
            limits,
            observers: Vec::new(),
            generation: 0,
            notices_tx,
            notices_rx,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Surface Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Attach a surface, replacing any previous one.
    ///
    /// A ready surface is immediately shown the current document.
    pub fn attach(&mut self, mut surface: S) {
        self.detach();

        let tx = self.notices_tx.clone();
        let generation = self.generation;
        let mut seq = 0;
        surface.on_content_changed(Box::new(move || {
            seq += 1;
            // The receiver lives as long as the adapter
            let _ = tx.send(ChangeNotice { generation, seq });
        }));

        self.surface = Some(surface);
        self.sync_surface();
    }

    /// Detach the surface and discard its pending notices.
    pub fn detach(&mut self) -> Option<S> {
        self.generation += 1;
        while self.notices_rx.try_recv().is_ok() {}
        self.surface.take()
    }

    /// Show the current document on the surface, if it is ready.
    ///
    /// Hosts call this once a surface that was attached while initializing
    /// becomes ready.
    pub fn sync_surface(&mut self) {
        let Some(surface) = self.surface.as_mut().filter(|s| s.is_ready()) else {
            return;
        };
        if let Err(e) = surface.replace_all_content(self.document.blocks()) {
            warn!("Failed to show document on the editor: {}", e);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| s.is_ready())
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Change Propagation
    // ─────────────────────────────────────────────────────────────────────────

    /// Register an observer called with every republished document.
    pub fn subscribe(&mut self, observer: impl FnMut(&Document) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply all queued change notices in order. Returns how many were
    /// applied.
    pub fn process_changes(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(notice) = self.notices_rx.try_recv() {
            if self.apply_notice(notice) {
                processed += 1;
            }
        }
        processed
    }

    /// Wait for the next change notice from the attached surface and apply
    /// it.
    ///
    /// Pends until the surface reports a change.
    pub async fn next_change(&mut self) {
        while let Some(notice) = self.notices_rx.recv().await {
            if self.apply_notice(notice) {
                return;
            }
        }
    }

    fn apply_notice(&mut self, notice: ChangeNotice) -> bool {
        if notice.generation != self.generation {
            return false;
        }
        let Some(surface) = &self.surface else {
            return false;
        };

        let blocks = match surface.current_content() {
            SurfaceContent::Blocks(blocks) => blocks,
            SurfaceContent::Markdown(text) => parse_blocks(&text, &self.limits),
        };
        debug!("Applying editor change #{}", notice.seq);
        self.document.replace_content(blocks);
        self.publish();
        true
    }

    fn publish(&mut self) {
        for observer in &mut self.observers {
            observer(&self.document);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Ask the surface to render an image at its cursor.
    ///
    /// Returns `Ok(None)` when no ready surface is attached; the request is
    /// dropped. The document only changes once the surface has accepted the
    /// image, at the index the surface reported.
    pub fn request_insert_image(&mut self, asset: Asset, alt: &str) -> Result<Option<usize>> {
        if !self.is_ready() {
            debug!("Editor not ready, dropping image {}", asset.id());
            return Ok(None);
        }
        // Bring the document up to date so the surface index lines up
        self.process_changes();

        let Some(surface) = self.surface.as_mut() else {
            return Ok(None);
        };
        let index = surface.insert_image_at_cursor(&asset, alt)?;

        let index = self.document.insert_image(index, asset, alt);
        self.publish();
        Ok(Some(index))
    }

    /// Replace the content of both the surface and the document.
    ///
    /// Without a ready surface only the document is reset; the surface is
    /// shown it on the next [`attach`](Self::attach) or
    /// [`sync_surface`](Self::sync_surface).
    pub fn reset(&mut self, blocks: Vec<Block>) -> Result<()> {
        let next = Document::new(blocks);

        match self.surface.as_mut().filter(|s| s.is_ready()) {
            Some(surface) => surface.replace_all_content(next.blocks())?,
            None => debug!("Editor not ready, resetting the document only"),
        }

        self.document = next;
        self.publish();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// A canonical copy of the live document.
    pub fn snapshot(&self) -> Document {
        self.document.snapshot()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::surface::{ChangeCallback, MemorySurface, SurfaceError};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn png(bytes: &[u8]) -> Asset {
        Asset::from_bytes("image/png", bytes)
    }

    fn adapter() -> SurfaceAdapter<MemorySurface> {
        SurfaceAdapter::new(Document::default(), IngestLimits::default())
    }

    /// A surface that reports its content as Markdown text.
    struct TextSurface {
        text: String,
        callbacks: Vec<ChangeCallback>,
    }

    impl TextSurface {
        fn type_text(&mut self, text: &str) {
            self.text = text.to_string();
            for callback in &mut self.callbacks {
                callback();
            }
        }
    }

    impl EditingSurface for TextSurface {
        fn is_ready(&self) -> bool {
            true
        }
        fn current_content(&self) -> SurfaceContent {
            SurfaceContent::Markdown(self.text.clone())
        }
        fn on_content_changed(&mut self, callback: ChangeCallback) {
            self.callbacks.push(callback);
        }
        fn insert_image_at_cursor(&mut self, _: &Asset, _: &str) -> std::result::Result<usize, SurfaceError> {
            Err(SurfaceError::Rejected("text only".to_string()))
        }
        fn replace_all_content(&mut self, _: &[Block]) -> std::result::Result<(), SurfaceError> {
            Ok(())
        }
    }

    #[test]
    fn test_attach_shows_document_on_ready_surface() {
        let mut adapter = adapter();
        adapter.attach(MemorySurface::ready());

        let surface = adapter.surface().unwrap();
        assert_eq!(surface.blocks(), Document::default().blocks());
    }

    #[test]
    fn test_changes_are_applied_in_order_and_published() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut adapter = adapter();
        let sink = Rc::clone(&seen);
        adapter.subscribe(move |doc| sink.borrow_mut().push(doc.blocks()[0].plain_text()));
        adapter.attach(MemorySurface::ready());
        adapter.process_changes();
        seen.borrow_mut().clear();

        let surface = adapter.surface_mut().unwrap();
        surface.edit(|blocks| *blocks = vec![Block::paragraph("first")]);
        surface.edit(|blocks| *blocks = vec![Block::paragraph("second")]);

        assert_eq!(adapter.process_changes(), 2);
        assert_eq!(adapter.snapshot(), Document::placeholder("second"));
        // Each notice snapshots the surface at processing time
        assert_eq!(*seen.borrow(), vec!["second", "second"]);
    }

    #[test]
    fn test_markdown_surface_content_is_parsed() {
        let mut adapter: SurfaceAdapter<TextSurface> =
            SurfaceAdapter::new(Document::default(), IngestLimits::default());
        adapter.attach(TextSurface {
            text: String::new(),
            callbacks: Vec::new(),
        });

        adapter.surface_mut().unwrap().type_text("# Title\n\nbody");
        assert_eq!(adapter.process_changes(), 1);
        assert_eq!(adapter.document().title().as_deref(), Some("Title"));
        assert_eq!(adapter.document().len(), 2);
    }

    #[tokio::test]
    async fn test_next_change_waits_for_a_notice() {
        let mut adapter = adapter();
        adapter.attach(MemorySurface::ready());
        adapter.process_changes();

        adapter
            .surface_mut()
            .unwrap()
            .edit(|blocks| blocks.push(Block::Rule));
        adapter.next_change().await;

        assert_eq!(adapter.document().blocks().last(), Some(&Block::Rule));
    }

    #[test]
    fn test_insert_image_updates_document_at_surface_index() {
        let mut adapter = adapter();
        adapter.attach(MemorySurface::ready());
        adapter.surface_mut().unwrap().set_cursor(0);

        let index = adapter.request_insert_image(png(b"a"), "cat").unwrap();
        assert_eq!(index, Some(0));

        let snapshot = adapter.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.blocks()[0].is_image());
        assert_eq!(snapshot.images()[0].asset, png(b"a"));

        // Processing the surface's own notice keeps the same content
        adapter.process_changes();
        assert_eq!(adapter.snapshot(), snapshot);
    }

    #[test]
    fn test_not_ready_surface_drops_insert() {
        let mut adapter = adapter();
        assert_eq!(adapter.request_insert_image(png(b"a"), "").unwrap(), None);

        adapter.attach(MemorySurface::new());
        assert_eq!(adapter.request_insert_image(png(b"a"), "").unwrap(), None);
        assert_eq!(adapter.snapshot(), Document::default());
    }

    #[test]
    fn test_surface_failure_leaves_document_unchanged() {
        let published = Rc::new(RefCell::new(0));
        let mut adapter = adapter();
        adapter.attach(MemorySurface::ready());
        adapter.process_changes();
        let counter = Rc::clone(&published);
        adapter.subscribe(move |_| *counter.borrow_mut() += 1);

        adapter.surface_mut().unwrap().fail_next_command("busy");
        let err = adapter.request_insert_image(png(b"a"), "").unwrap_err();

        assert!(matches!(err, Error::Surface(_)));
        assert_eq!(adapter.snapshot(), Document::default());
        assert_eq!(*published.borrow(), 0);
    }

    #[test]
    fn test_reset_replaces_surface_and_document() {
        let mut adapter = adapter();
        adapter.attach(MemorySurface::ready());
        adapter.request_insert_image(png(b"a"), "").unwrap();

        adapter.reset(vec![Block::paragraph("fresh")]).unwrap();

        assert_eq!(adapter.snapshot(), Document::placeholder("fresh"));
        assert_eq!(
            adapter.surface().unwrap().blocks(),
            &[Block::paragraph("fresh")]
        );
    }

    #[test]
    fn test_reset_with_empty_blocks_keeps_a_paragraph() {
        let mut adapter = adapter();
        adapter.reset(Vec::new()).unwrap();
        assert_eq!(adapter.snapshot().blocks(), &[Block::Paragraph(Vec::new())]);
    }

    #[test]
    fn test_reset_without_ready_surface_resets_document() {
        let mut adapter = adapter();
        adapter.attach(MemorySurface::new());

        adapter.reset(vec![Block::paragraph("fresh")]).unwrap();
        assert_eq!(adapter.snapshot(), Document::placeholder("fresh"));
        assert!(adapter.surface().unwrap().blocks().is_empty());

        // The surface catches up once it is ready
        adapter.surface_mut().unwrap().mark_ready();
        adapter.sync_surface();
        assert_eq!(
            adapter.surface().unwrap().blocks(),
            &[Block::paragraph("fresh")]
        );
    }

    #[test]
    fn test_detached_surface_notices_are_ignored() {
        let mut adapter = adapter();
        adapter.attach(MemorySurface::ready());
        let mut old = adapter.detach().unwrap();

        old.edit(|blocks| *blocks = vec![Block::paragraph("stale")]);
        assert_eq!(adapter.process_changes(), 0);
        assert_eq!(adapter.snapshot(), Document::default());
    }
}
