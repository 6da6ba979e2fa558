//! Persistence/repaint bookkeeping and the renderer seam.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::view::HudView;

/// Presentation layer that turns a [`HudView`] into live widgets.
///
/// `replace` swaps the whole visual subtree for the new view. It is called
/// once per repaint and must not call back into the HUD.
pub trait Renderer {
    fn replace(&mut self, view: &HudView);
}

impl<F: FnMut(&HudView)> Renderer for F {
    fn replace(&mut self, view: &HudView) {
        self(view);
    }
}

/// Renderer that discards every view.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn replace(&mut self, _view: &HudView) {}
}

/// Renderer that keeps every view it receives. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    views: Rc<RefCell<Vec<HudView>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repaints seen.
    pub fn count(&self) -> usize {
        self.views.borrow().len()
    }

    /// Most recent view.
    pub fn last(&self) -> Option<HudView> {
        self.views.borrow().last().cloned()
    }
}

impl Renderer for RecordingRenderer {
    fn replace(&mut self, view: &HudView) {
        self.views.borrow_mut().push(view.clone());
    }
}

/// Which persisted record an effect refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Record {
    Config,
    Store,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Store => write!(f, "store"),
        }
    }
}

/// A side effect produced while handling a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "record", rename_all = "snake_case")]
pub enum SyncEffect {
    ConfigSaved,
    StoreSaved,
    SaveFailed(Record),
    Repainted,
}

/// Running totals of sync effects over the life of a HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub config_saves: u64,
    pub store_saves: u64,
    pub failed_saves: u64,
    pub repaints: u64,
}

/// Drives the renderer and records what each mutation caused.
///
/// Effects are only collected between [`SyncNotifier::begin_capture`] and
/// [`SyncNotifier::end_capture`]; counters are always kept.
pub struct SyncNotifier {
    renderer: Box<dyn Renderer>,
    captured: Option<Vec<SyncEffect>>,
    stats: SyncStats,
}

impl SyncNotifier {
    pub fn new(renderer: Box<dyn Renderer>) -> Self {
        Self {
            renderer,
            captured: None,
            stats: SyncStats::default(),
        }
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Start collecting effects, dropping any earlier capture.
    pub fn begin_capture(&mut self) {
        self.captured = Some(Vec::new());
    }

    /// Stop collecting and return the effects seen since `begin_capture`.
    pub fn end_capture(&mut self) -> Vec<SyncEffect> {
        self.captured.take().unwrap_or_default()
    }

    /// Note the outcome of one record save.
    pub fn saved(&mut self, record: Record, ok: bool) {
        let effect = match (record, ok) {
            (Record::Config, true) => {
                self.stats.config_saves += 1;
                SyncEffect::ConfigSaved
            }
            (Record::Store, true) => {
                self.stats.store_saves += 1;
                SyncEffect::StoreSaved
            }
            (_, false) => {
                self.stats.failed_saves += 1;
                SyncEffect::SaveFailed(record)
            }
        };
        self.push(effect);
    }

    /// Hand `view` to the renderer.
    pub fn repaint(&mut self, view: &HudView) {
        self.renderer.replace(view);
        self.stats.repaints += 1;
        self.push(SyncEffect::Repainted);
    }

    fn push(&mut self, effect: SyncEffect) {
        if let Some(captured) = self.captured.as_mut() {
            captured.push(effect);
        }
    }
}

impl fmt::Debug for SyncNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncNotifier")
            .field("capturing", &self.captured.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}
