//! candyscroll is a scroll-synchronized frame player.
//!
//! A tall scroll region is mapped to a product's sequence of still images: scroll position
//! becomes progress in `[0, 1]`, progress becomes a frame index, and the frame is drawn onto a
//! pixel surface with cover fit.
//!
//! # Pipeline overview
//!
//! 1. **Track**: [`ScrollTracker`] turns scroll offsets into [`Progress`] and publishes it
//!    through a [`ProgressSignal`].
//! 2. **Select**: [`FrameSelector`] maps progress to a [`FrameIndex`] inside the product's
//!    playable [`FrameSpan`].
//! 3. **Load**: [`FrameCache`] fetches and decodes frames on a [`LoadScheduler`], prefetching
//!    neighbours of the current frame.
//! 4. **Draw**: [`Compositor`] paints the frame onto a [`Surface`], falling back to the last
//!    good frame or a theme placeholder, and repaints only when the draw key changes.
//!
//! [`PlayerSession`] owns steps 2 to 4 for one product; [`Player`] swaps sessions when the
//! product changes. [`TextTimeline`] samples caption opacity from the same progress.
//!
//! Pixels are premultiplied RGBA8 throughout; `unsafe` is forbidden in this crate.
#![forbid(unsafe_code)]

mod animation;
mod assets;
mod catalog;
mod foundation;
mod overlay;
mod player;
mod relay;
mod render;
mod scroll;

pub use animation::keyframes::{Lerp, ProgressKey, ProgressKeyframes};
pub use assets::cache::{
    ApplyOutcome, CacheStats, EntryState, FrameCache, LoadCompletion, RequestOutcome, SessionId,
};
pub use assets::decode::{PreparedImage, decode_image};
pub use assets::scheduler::{
    CancellationToken, InlineScheduler, LoadJob, LoadScheduler, ManualScheduler, RayonScheduler,
};
pub use assets::source::{AssetSource, DirSource, MemorySource, normalize_uri_path};
pub use catalog::model::{
    Align, Category, DEFAULT_START_FRAME, Gradient, ProductRecord, TextSection, Theme,
};
pub use catalog::store::{Catalogue, FrameFormat, frame_uri};
pub use foundation::core::{FrameIndex, FrameSpan, Progress, Rect, Rgba8Premul, Size};
pub use foundation::error::{ScrollError, ScrollResult};
pub use overlay::timeline::{
    DEFAULT_WINDOWS, FADE_SPAN, HERO_WINDOW, RISE_PX, SectionSample, TextTimeline,
    default_sections,
};
pub use overlay::visibility::VisibilityGate;
pub use player::config::{
    DEFAULT_PREFETCH_RADIUS, DEFAULT_PROGRESSIVE_STRIDE, DEFAULT_REGION_VIEWPORTS, PlayerConfig,
    PrefetchPolicy,
};
pub use player::selector::FrameSelector;
pub use player::session::{Player, PlayerSession};
pub use relay::{
    CONFIG_ERROR, ContactMessage, DEFAULT_SENDER_NAME, MailRelay, MailTransport, MemoryTransport,
    Newsletter, OutgoingMail, ProductInquiry, RelayConfig, RelayResponse, Submission,
};
pub use render::composite::{PremulRgba8, over};
pub use render::compositor::{Compositor, DrawKey, DrawSource, Placeholder, RenderOutcome};
pub use render::cover::{CoverFit, cover_fit, draw_cover};
pub use render::surface::{Surface, device_pixel_size};
pub use scroll::signal::{ProgressSignal, SubscriptionId};
pub use scroll::tracker::{
    Anchor, RegionGeometry, ScrollEdge, ScrollOffsets, ScrollTracker, compute_progress,
};
