//! The per-object HUD controller.
//!
//! A [`Hud`] owns the live [`Config`] and [`Store`] of one object together
//! with the two chunked records they persist to. Mutations live in
//! `bars.rs`, `badges.rs` and `editor.rs`; this module holds loading,
//! saving and repainting.

use std::fmt;
use std::sync::Arc;

use minihud_store::{ChunkedStore, EntryStore, StoreResult};
use minihud_types::{Config, ConfigOptions, Store};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::settings::HudSettings;
use crate::sync::{Record, Renderer, SyncNotifier, SyncStats};
use crate::view::HudView;

/// Whether the HUD is showing its normal overlay or the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HudMode {
    #[default]
    Display,
    Editing,
}

/// Live HUD for one object.
pub struct Hud<S: EntryStore + ?Sized> {
    object_id: String,
    pub(crate) config: Config,
    pub(crate) store: Store,
    config_record: ChunkedStore<S, Config>,
    store_record: ChunkedStore<S, Store>,
    pub(crate) notifier: SyncNotifier,
    mode: HudMode,
    object_height: f64,
}

impl<S: EntryStore + ?Sized> Hud<S> {
    /// Load the HUD for `object_id` from `entries`, falling back to
    /// `options` for a missing or unreadable config.
    ///
    /// Persisted state always wins over `options`. The store is aligned
    /// with the config before the first repaint.
    pub fn load(
        object_id: impl Into<String>,
        options: &ConfigOptions,
        entries: Arc<S>,
        renderer: Box<dyn Renderer>,
        settings: &HudSettings,
    ) -> Self {
        let object_id = object_id.into();
        let config_record = ChunkedStore::new(Arc::clone(&entries), settings.config_key())
            .with_limits(settings.limits())
            .with_version(settings.version.clone());
        let store_record = ChunkedStore::new(entries, settings.store_key())
            .with_limits(settings.limits())
            .with_version(settings.version.clone());

        let (config, config_meta) = config_record.load(options.resolve());
        let (mut store, store_meta) = store_record.load(Store::from_config(&config));
        if store.reconcile(&config) {
            warn!(object_id = %object_id, bars = config.bars.len(), "stored values realigned with config");
        }
        info!(
            object_id = %object_id,
            bars = config.bars.len(),
            persisted_config = config_meta.is_some(),
            persisted_store = store_meta.is_some(),
            "HUD loaded"
        );

        let mut hud = Self {
            object_id,
            config,
            store,
            config_record,
            store_record,
            notifier: SyncNotifier::new(renderer),
            mode: HudMode::Display,
            object_height: 0.0,
        };
        hud.repaint();
        hud
    }

    // ---- Accessors ----

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn mode(&self) -> HudMode {
        self.mode
    }

    pub fn stats(&self) -> SyncStats {
        self.notifier.stats()
    }

    pub fn config_record(&self) -> &ChunkedStore<S, Config> {
        &self.config_record
    }

    pub fn store_record(&self) -> &ChunkedStore<S, Store> {
        &self.store_record
    }

    /// Height of the host object, used for vertical placement.
    pub fn object_height(&self) -> f64 {
        self.object_height
    }

    /// Record a new object height and repaint.
    pub fn set_object_height(&mut self, height: f64) {
        if height.is_finite() {
            self.object_height = height;
            self.repaint();
        }
    }

    // ---- Persistence and repaint ----

    pub fn save_config(&mut self) -> bool {
        let ok = self.config_record.save(&self.config);
        self.notifier.saved(Record::Config, ok);
        ok
    }

    pub fn save_store(&mut self) -> bool {
        let ok = self.store_record.save(&self.store);
        self.notifier.saved(Record::Store, ok);
        ok
    }

    /// Current view of the HUD.
    pub fn view(&self) -> HudView {
        HudView::build(
            &self.config,
            &self.store,
            self.object_height,
            self.mode == HudMode::Editing,
        )
    }

    /// Rebuild the view and hand it to the renderer. Never persists.
    pub fn repaint(&mut self) {
        let view = self.view();
        self.notifier.repaint(&view);
        debug!(object_id = %self.object_id, bars = view.bars.len(), "HUD repainted");
    }

    // ---- Editing mode ----

    /// Switch to the editor. Refused for static HUDs.
    pub fn open_editor(&mut self) -> bool {
        if self.config.is_static {
            debug!(object_id = %self.object_id, "editor refused for static HUD");
            return false;
        }
        self.mode = HudMode::Editing;
        self.repaint();
        true
    }

    /// Save both records, return to display mode and repaint.
    ///
    /// Returns `false` if either save failed; the mode still changes.
    pub fn commit(&mut self) -> bool {
        let config_ok = self.save_config();
        let store_ok = self.save_store();
        self.mode = HudMode::Display;
        self.repaint();
        config_ok && store_ok
    }

    /// Remove both persisted records. In-memory state is left untouched.
    pub fn purge(&self) -> StoreResult<usize> {
        let removed = self.config_record.clear()? + self.store_record.clear()?;
        info!(object_id = %self.object_id, removed, "HUD records purged");
        Ok(removed)
    }
}

impl<S: EntryStore + ?Sized> fmt::Debug for Hud<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hud")
            .field("object_id", &self.object_id)
            .field("mode", &self.mode)
            .field("bars", &self.config.bars.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sync::{NullRenderer, RecordingRenderer};
    use minihud_store::InMemoryEntryStore;
    use minihud_types::BarOptions;

    pub(crate) fn hp_options() -> ConfigOptions {
        ConfigOptions::new().bar(BarOptions::new("HP", 10))
    }

    pub(crate) fn hud_with(
        options: &ConfigOptions,
    ) -> (Hud<InMemoryEntryStore>, Arc<InMemoryEntryStore>, RecordingRenderer) {
        let entries = Arc::new(InMemoryEntryStore::new());
        let recorder = RecordingRenderer::new();
        let hud = Hud::load(
            "obj-1",
            options,
            Arc::clone(&entries),
            Box::new(recorder.clone()),
            &HudSettings::default(),
        );
        (hud, entries, recorder)
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    #[test]
    fn fresh_load_uses_options_and_repaints_once() {
        let (hud, entries, recorder) = hud_with(&hp_options());
        assert_eq!(hud.config().bars[0].name, "HP");
        assert_eq!(hud.store().bars, vec![10]);
        assert_eq!(recorder.count(), 1);
        // Loading alone never writes.
        assert!(entries.is_empty());
    }

    #[test]
    fn persisted_config_beats_options() {
        let (mut hud, entries, _) = hud_with(&hp_options());
        hud.config.bars[0].max = 4;
        hud.store.bars[0] = 2;
        assert!(hud.commit());

        let reloaded = Hud::load(
            "obj-1",
            &ConfigOptions::new().bar(BarOptions::new("Mana", 7)),
            entries,
            Box::new(NullRenderer),
            &HudSettings::default(),
        );
        assert_eq!(reloaded.config().bars[0].name, "HP");
        assert_eq!(reloaded.config().bars[0].max, 4);
        assert_eq!(reloaded.store().bars, vec![2]);
    }

    #[test]
    fn short_store_is_padded_on_load() {
        let (mut hud, entries, _) = hud_with(&hp_options());
        hud.store.bars.clear();
        assert!(hud.save_store());
        hud.config.bars.push(minihud_types::BarSpec::new("Mana"));
        assert!(hud.save_config());

        let reloaded = Hud::load(
            "obj-1",
            &ConfigOptions::new(),
            entries,
            Box::new(NullRenderer),
            &HudSettings::default(),
        );
        assert_eq!(reloaded.store().bars, vec![10, 10]);
    }

    #[test]
    fn corrupt_config_falls_back_to_options() {
        let entries = Arc::new(InMemoryEntryStore::new());
        entries.set_entry("trh:hud.config", "{\"chunks\":2,\"size\":10}").unwrap();
        entries.set_entry("trh:hud.config[0]", "garbage").unwrap();
        let hud = Hud::load(
            "obj-1",
            &hp_options(),
            entries,
            Box::new(NullRenderer),
            &HudSettings::default(),
        );
        assert_eq!(hud.config().bars.len(), 1);
    }

    // ------------------------------------------------------------------
    // Editing mode
    // ------------------------------------------------------------------

    #[test]
    fn static_hud_refuses_editor() {
        let (mut hud, _, recorder) = hud_with(&hp_options().is_static(true));
        assert!(!hud.open_editor());
        assert_eq!(hud.mode(), HudMode::Display);
        assert_eq!(recorder.count(), 1);
    }

    #[test]
    fn editor_placement_and_commit() {
        let (mut hud, entries, recorder) = hud_with(&hp_options().scale(2.0));
        assert!(hud.open_editor());
        assert_eq!(recorder.last().unwrap().placement.scale, crate::view::EDITOR_SCALE);

        assert!(hud.commit());
        assert_eq!(hud.mode(), HudMode::Display);
        assert_eq!(recorder.last().unwrap().placement.scale, 0.5);
        assert!(entries.has_entry("trh:hud.config").unwrap());
        assert!(entries.has_entry("trh:hud.store").unwrap());

        let stats = hud.stats();
        assert_eq!((stats.config_saves, stats.store_saves), (1, 1));
    }

    #[test]
    fn commit_reports_failed_save() {
        let settings = HudSettings {
            max_payload: 10,
            ..HudSettings::default()
        };
        let entries = Arc::new(InMemoryEntryStore::new());
        let mut hud = Hud::load("obj-1", &hp_options(), Arc::clone(&entries), Box::new(NullRenderer), &settings);
        assert!(!hud.commit());
        assert_eq!(hud.stats().failed_saves, 2);
        assert!(entries.is_empty());
    }

    #[test]
    fn object_height_moves_hud() {
        let (mut hud, _, recorder) = hud_with(&hp_options());
        hud.set_object_height(1.0);
        assert_eq!(recorder.last().unwrap().placement.bottom_padding, 40);
        hud.set_object_height(f64::NAN);
        assert_eq!(hud.object_height(), 1.0);
    }

    #[test]
    fn purge_removes_both_records() {
        let (mut hud, entries, _) = hud_with(&hp_options());
        assert!(hud.commit());
        assert!(hud.purge().unwrap() >= 4);
        assert!(entries.is_empty());
    }
}
