//! MiniHUD controllers.
//!
//! A [`Hud`] is the live overlay of one tabletop object: bars, badges and a
//! pointer described by a [`Config`](minihud_types::Config), with runtime
//! bar values in a [`Store`](minihud_types::Store). Both are persisted as
//! chunked records through an [`EntryStore`](minihud_store::EntryStore).
//!
//! Every live mutation follows the same pipeline:
//!
//! ```text
//! mutate in memory -> save the touched record(s) -> repaint
//! ```
//!
//! Editor edits skip the last two steps until [`Hud::commit`].
//!
//! # Key Types
//!
//! - [`Hud`]: per-object controller
//! - [`HudRegistry`]: live HUDs keyed by object id
//! - [`HudCommand`]: serializable form of every operation
//! - [`HudView`]: what a [`Renderer`] draws
//! - [`HudSettings`]: key prefix and chunk limits, loadable from TOML

mod badges;
mod bars;
pub mod command;
mod editor;
pub mod error;
pub mod hud;
pub mod registry;
pub mod settings;
pub mod sync;
pub mod view;

pub use command::{CommandOutcome, HudCommand};
pub use error::{HudError, HudResult};
pub use hud::{Hud, HudMode};
pub use registry::HudRegistry;
pub use settings::HudSettings;
pub use sync::{NullRenderer, Record, RecordingRenderer, Renderer, SyncEffect, SyncNotifier, SyncStats};
pub use view::{
    BadgeView, BarView, HudView, Placement, PipRow, PointerView, ValueRow, EDITOR_SCALE,
};
