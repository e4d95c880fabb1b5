use std::sync::Arc;

use crate::{
    assets::cache::{CacheStats, FrameCache, SessionId},
    assets::scheduler::LoadScheduler,
    assets::source::AssetSource,
    catalog::model::ProductRecord,
    foundation::core::{FrameIndex, Progress, Size},
    foundation::error::ScrollResult,
    player::config::{PlayerConfig, PrefetchPolicy},
    player::selector::FrameSelector,
    render::compositor::{Compositor, RenderOutcome},
    render::surface::Surface,
};

/// Everything one product's playback owns: frame cache, in-flight loads and draw state.
///
/// Dropping or tearing down a session cancels its loads; their completions can never reach
/// another session's cache.
#[derive(Debug)]
pub struct PlayerSession {
    product: ProductRecord,
    selector: FrameSelector,
    cache: FrameCache,
    compositor: Compositor,
    policy: PrefetchPolicy,
    progress: Progress,
    current: FrameIndex,
}

impl PlayerSession {
    /// Start playback of `product` at `progress`.
    #[tracing::instrument(skip(product, config, source, scheduler), fields(product = %product.id))]
    pub fn start(
        product: &ProductRecord,
        config: &PlayerConfig,
        progress: Progress,
        source: Arc<dyn AssetSource>,
        scheduler: Arc<dyn LoadScheduler>,
    ) -> ScrollResult<Self> {
        product.validate()?;
        let span = product.span()?;
        let placeholder = config.placeholder_for(&product.theme()?)?;
        let compositor = Compositor::new(placeholder, config.clear_color()?);

        let selector = FrameSelector::new(span);
        let current = selector.select(progress);
        let cache = FrameCache::new(
            SessionId::next(),
            product.image_sequence_location.clone(),
            config.frame_format,
            span,
            source,
            scheduler,
        );

        let mut session = Self {
            product: product.clone(),
            selector,
            cache,
            compositor,
            policy: config.prefetch,
            progress,
            current,
        };
        session.prefetch_around(current);
        if let PrefetchPolicy::Progressive { stride } = session.policy {
            let n = session.cache.prefetch_progressive(stride);
            tracing::debug!(stride, dispatched = n, "progressive preload scheduled");
        }
        tracing::debug!(session = session.id().as_u64(), %current, "session started");
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.cache.session()
    }

    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Record the session was started from.
    pub fn product(&self) -> &ProductRecord {
        &self.product
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn current_frame(&self) -> FrameIndex {
        self.current
    }

    pub fn cache(&self) -> &FrameCache {
        &self.cache
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Feed a new progress value. Returns the selected frame; loads start when it changes.
    pub fn on_progress(&mut self, progress: Progress) -> FrameIndex {
        self.progress = progress;
        let frame = self.selector.select(progress);
        if frame != self.current {
            tracing::trace!(from = %self.current, to = %frame, "frame changed");
            self.current = frame;
            self.prefetch_around(frame);
        }
        frame
    }

    /// Apply arrived loads, then draw the current frame if the draw key changed.
    #[tracing::instrument(level = "trace", skip_all, fields(session = self.id().as_u64()))]
    pub fn pump(&mut self, surface: &mut Surface) -> RenderOutcome {
        let applied = self.cache.drain_completions();
        if applied > 0 {
            tracing::trace!(applied, "completions applied");
        }
        self.render(surface)
    }

    /// Draw the current frame without looking at new completions.
    pub fn render(&mut self, surface: &mut Surface) -> RenderOutcome {
        self.compositor.render(self.current, &self.cache, surface)
    }

    /// Resync the surface to the host size, then pump.
    #[tracing::instrument(skip(self, surface))]
    pub fn resize(
        &mut self,
        surface: &mut Surface,
        css: Size,
        device_pixel_ratio: f64,
    ) -> ScrollResult<RenderOutcome> {
        surface.resize(css, device_pixel_ratio)?;
        Ok(self.pump(surface))
    }

    /// Cancel in-flight loads and release the cache.
    #[tracing::instrument(skip_all, fields(session = self.id().as_u64(), product = %self.product.id))]
    pub fn teardown(self) -> CacheStats {
        self.cache.cancel();
        let stats = self.cache.stats();
        tracing::debug!(?stats, "session torn down");
        stats
    }

    fn prefetch_around(&mut self, frame: FrameIndex) {
        match self.policy {
            PrefetchPolicy::Window { radius } => {
                self.cache.prefetch_window(frame, radius);
            }
            PrefetchPolicy::Progressive { .. } => {
                self.cache.request(frame);
            }
        }
    }
}

/// Host-facing player: one live session at a time, replaced on product change.
pub struct Player {
    config: PlayerConfig,
    source: Arc<dyn AssetSource>,
    scheduler: Arc<dyn LoadScheduler>,
    progress: Progress,
    session: Option<PlayerSession>,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("config", &self.config)
            .field("progress", &self.progress)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Player {
    pub fn new(
        config: PlayerConfig,
        source: Arc<dyn AssetSource>,
        scheduler: Arc<dyn LoadScheduler>,
    ) -> ScrollResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            scheduler,
            progress: Progress::START,
            session: None,
        })
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&PlayerSession> {
        self.session.as_ref()
    }

    /// Make `product` the one on screen. Selecting an identical record keeps the live session;
    /// a changed record under the same id starts over.
    pub fn select(&mut self, product: &ProductRecord) -> ScrollResult<SessionId> {
        if let Some(s) = &self.session
            && s.product() == product
        {
            return Ok(s.id());
        }
        let next = PlayerSession::start(
            product,
            &self.config,
            self.progress,
            Arc::clone(&self.source),
            Arc::clone(&self.scheduler),
        )?;
        let id = next.id();
        if let Some(old) = self.session.replace(next) {
            old.teardown();
        }
        Ok(id)
    }

    /// Forward progress to the live session, if any.
    pub fn on_progress(&mut self, progress: Progress) -> Option<FrameIndex> {
        self.progress = progress;
        self.session.as_mut().map(|s| s.on_progress(progress))
    }

    pub fn pump(&mut self, surface: &mut Surface) -> Option<RenderOutcome> {
        self.session.as_mut().map(|s| s.pump(surface))
    }

    pub fn resize(
        &mut self,
        surface: &mut Surface,
        css: Size,
        device_pixel_ratio: f64,
    ) -> ScrollResult<Option<RenderOutcome>> {
        match self.session.as_mut() {
            Some(s) => s.resize(surface, css, device_pixel_ratio).map(Some),
            None => {
                surface.resize(css, device_pixel_ratio)?;
                Ok(None)
            }
        }
    }

    /// Drop the live session, cancelling its loads.
    pub fn teardown(&mut self) -> Option<CacheStats> {
        self.session.take().map(PlayerSession::teardown)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/session.rs"]
mod tests;
