use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Receiver, Sender},
    },
};

use smallvec::SmallVec;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    assets::scheduler::{CancellationToken, LoadScheduler},
    assets::source::AssetSource,
    catalog::store::{FrameFormat, frame_uri},
    foundation::core::{FrameIndex, FrameSpan},
    foundation::error::ScrollResult,
};

/// Identity of one player session; completions carry it so stale ones can be told apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Fresh process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Load state of one frame. `Loaded` and `Failed` are terminal.
#[derive(Clone, Debug)]
pub enum EntryState {
    /// Fetch dispatched, no result yet.
    Pending,
    /// Decoded and ready to draw.
    Loaded(Arc<PreparedImage>),
    /// Fetch or decode failed; the reason is kept for diagnostics.
    Failed(String),
}

/// Result of a background load, posted back to the owning cache.
#[derive(Debug)]
pub struct LoadCompletion {
    /// Session that dispatched the load.
    pub session: SessionId,
    /// Frame the load was for.
    pub frame: FrameIndex,
    /// Decoded image or the failure.
    pub result: ScrollResult<PreparedImage>,
}

/// What [`FrameCache::request`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A new load was started.
    Dispatched,
    /// A load is already in flight.
    AlreadyPending,
    /// The frame is ready.
    AlreadyLoaded,
    /// The frame failed before; not retried.
    AlreadyFailed,
    /// Outside the playable span; ignored.
    OutOfRange,
    /// The cache was cancelled; nothing new starts.
    Cancelled,
}

/// What [`FrameCache::apply`] did with a completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Entry moved to `Loaded`.
    Loaded,
    /// Entry moved to `Failed`.
    Failed,
    /// From another session, or the entry was not pending; dropped.
    Discarded,
}

/// Counters for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Loads started.
    pub dispatched: u64,
    /// Entries that reached `Loaded`.
    pub loaded: u64,
    /// Entries that reached `Failed`.
    pub failed: u64,
    /// Completions dropped as stale.
    pub discarded: u64,
}

/// Frame images of one product, keyed by frame index.
///
/// Entries are never evicted; the cache lives and dies with its session. Loads run on the
/// [`LoadScheduler`] and report through a channel drained by [`FrameCache::drain_completions`]
/// on the owning thread.
pub struct FrameCache {
    session: SessionId,
    location: String,
    format: FrameFormat,
    span: FrameSpan,
    entries: HashMap<FrameIndex, EntryState>,
    source: Arc<dyn AssetSource>,
    scheduler: Arc<dyn LoadScheduler>,
    cancel: CancellationToken,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
    stats: CacheStats,
}

impl std::fmt::Debug for FrameCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCache")
            .field("session", &self.session)
            .field("location", &self.location)
            .field("span", &self.span)
            .field("entries", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl FrameCache {
    pub fn new(
        session: SessionId,
        location: impl Into<String>,
        format: FrameFormat,
        span: FrameSpan,
        source: Arc<dyn AssetSource>,
        scheduler: Arc<dyn LoadScheduler>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            session,
            location: location.into(),
            format,
            span,
            entries: HashMap::new(),
            source,
            scheduler,
            cancel: CancellationToken::new(),
            tx,
            rx,
            stats: CacheStats::default(),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn span(&self) -> FrameSpan {
        self.span
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self, frame: FrameIndex) -> Option<&EntryState> {
        self.entries.get(&frame)
    }

    /// Decoded image for `frame`, if loaded.
    pub fn image(&self, frame: FrameIndex) -> Option<Arc<PreparedImage>> {
        match self.entries.get(&frame) {
            Some(EntryState::Loaded(img)) => Some(Arc::clone(img)),
            _ => None,
        }
    }

    /// Frames currently in flight.
    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, EntryState::Pending))
            .count()
    }

    /// Start loading `frame` unless it is known already.
    pub fn request(&mut self, frame: FrameIndex) -> RequestOutcome {
        if !self.span.contains(frame) {
            return RequestOutcome::OutOfRange;
        }
        match self.entries.get(&frame) {
            Some(EntryState::Pending) => return RequestOutcome::AlreadyPending,
            Some(EntryState::Loaded(_)) => return RequestOutcome::AlreadyLoaded,
            Some(EntryState::Failed(_)) => return RequestOutcome::AlreadyFailed,
            None => {}
        }
        if self.cancel.is_cancelled() {
            return RequestOutcome::Cancelled;
        }

        // Mark before spawning: an inline scheduler completes inside `spawn`.
        self.entries.insert(frame, EntryState::Pending);
        self.stats.dispatched += 1;

        let uri = frame_uri(&self.location, frame, self.format);
        tracing::trace!(session = self.session.0, %frame, %uri, "dispatch frame load");

        let session = self.session;
        let source = Arc::clone(&self.source);
        let cancel = self.cancel.clone();
        let tx = self.tx.clone();
        self.scheduler.spawn(Box::new(move || {
            if cancel.is_cancelled() {
                return;
            }
            let result = source.fetch(&uri).and_then(|bytes| decode_image(&bytes));
            if cancel.is_cancelled() {
                return;
            }
            // The receiver is gone once the session is dropped.
            let _ = tx.send(LoadCompletion {
                session,
                frame,
                result,
            });
        }));

        RequestOutcome::Dispatched
    }

    /// Request `center` and its neighbours within `radius`, nearest first.
    /// Returns the number of loads started.
    pub fn prefetch_window(&mut self, center: FrameIndex, radius: u32) -> usize {
        window_order(self.span, center, radius)
            .into_iter()
            .filter(|&f| self.request(f) == RequestOutcome::Dispatched)
            .count()
    }

    /// Request every frame, every `stride`-th one first, then the gaps in order.
    pub fn prefetch_progressive(&mut self, stride: u32) -> usize {
        progressive_order(self.span, stride)
            .into_iter()
            .filter(|&f| self.request(f) == RequestOutcome::Dispatched)
            .count()
    }

    /// Apply one completion on the owning thread.
    pub fn apply(&mut self, completion: LoadCompletion) -> ApplyOutcome {
        let LoadCompletion {
            session,
            frame,
            result,
        } = completion;

        if session != self.session || self.cancel.is_cancelled() {
            self.stats.discarded += 1;
            tracing::debug!(
                owner = self.session.0,
                from = session.0,
                %frame,
                "discarding stale frame completion"
            );
            return ApplyOutcome::Discarded;
        }
        let Some(entry) = self
            .entries
            .get_mut(&frame)
            .filter(|e| matches!(e, EntryState::Pending))
        else {
            self.stats.discarded += 1;
            return ApplyOutcome::Discarded;
        };

        match result {
            Ok(img) => {
                *entry = EntryState::Loaded(Arc::new(img));
                self.stats.loaded += 1;
                ApplyOutcome::Loaded
            }
            Err(err) => {
                tracing::warn!(session = self.session.0, %frame, %err, "frame load failed");
                *entry = EntryState::Failed(err.to_string());
                self.stats.failed += 1;
                ApplyOutcome::Failed
            }
        }
    }

    /// Apply every completion that has arrived. Returns how many were received.
    pub fn drain_completions(&mut self) -> usize {
        let mut n = 0;
        while let Ok(c) = self.rx.try_recv() {
            self.apply(c);
            n += 1;
        }
        n
    }

    /// Stop starting loads and tell in-flight ones to bail out.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for FrameCache {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// `center, center+1, center-1, center+2, ...` clipped to `span`.
pub(crate) fn window_order(
    span: FrameSpan,
    center: FrameIndex,
    radius: u32,
) -> SmallVec<[FrameIndex; 16]> {
    let mut out = SmallVec::new();
    if span.contains(center) {
        out.push(center);
    }
    for d in 1..=i64::from(radius) {
        if let Some(f) = span.offset(center, d) {
            out.push(f);
        }
        if let Some(f) = span.offset(center, -d) {
            out.push(f);
        }
    }
    out
}

/// Coarse pass over every `stride`-th frame, then the remaining frames ascending.
pub(crate) fn progressive_order(span: FrameSpan, stride: u32) -> Vec<FrameIndex> {
    let stride = stride.max(1);
    let first = span.first.0;
    let on_grid = |f: FrameIndex| (f.0 - first) % stride == 0;
    let mut out: Vec<FrameIndex> = span.iter().filter(|&f| on_grid(f)).collect();
    out.extend(span.iter().filter(|&f| !on_grid(f)));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
