use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use minihud_store::EntryStore;
use minihud_types::ConfigOptions;
use tracing::info;

use crate::command::{CommandOutcome, HudCommand};
use crate::error::{HudError, HudResult};
use crate::hud::Hud;
use crate::settings::HudSettings;
use crate::sync::Renderer;

/// Live HUDs keyed by object id.
pub struct HudRegistry<S: EntryStore + ?Sized> {
    settings: HudSettings,
    huds: HashMap<String, Hud<S>>,
}

impl<S: EntryStore + ?Sized> HudRegistry<S> {
    pub fn new(settings: HudSettings) -> Self {
        Self {
            settings,
            huds: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &HudSettings {
        &self.settings
    }

    /// Attach a HUD to `object_id`.
    ///
    /// Registering an id again replaces the live HUD with one reloaded from
    /// `entries`; persisted state is never reset by `options`.
    pub fn register(
        &mut self,
        object_id: impl Into<String>,
        options: &ConfigOptions,
        entries: Arc<S>,
        renderer: Box<dyn Renderer>,
    ) -> &mut Hud<S> {
        let object_id = object_id.into();
        let hud = Hud::load(object_id.clone(), options, entries, renderer, &self.settings);
        match self.huds.entry(object_id) {
            Entry::Occupied(mut slot) => {
                info!(object_id = %slot.key(), "HUD re-registered");
                slot.insert(hud);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(hud),
        }
    }

    pub fn get(&self, object_id: &str) -> Option<&Hud<S>> {
        self.huds.get(object_id)
    }

    pub fn get_mut(&mut self, object_id: &str) -> Option<&mut Hud<S>> {
        self.huds.get_mut(object_id)
    }

    /// Drop the live HUD of a destroyed object. Persisted records stay.
    pub fn unregister(&mut self, object_id: &str) -> Option<Hud<S>> {
        let hud = self.huds.remove(object_id);
        if hud.is_some() {
            info!(object_id, "HUD unregistered");
        }
        hud
    }

    /// Unregister `object_id` and delete its persisted records.
    pub fn purge(&mut self, object_id: &str) -> HudResult<usize> {
        let hud = self
            .unregister(object_id)
            .ok_or_else(|| HudError::NotRegistered(object_id.to_string()))?;
        Ok(hud.purge()?)
    }

    pub fn contains(&self, object_id: &str) -> bool {
        self.huds.contains_key(object_id)
    }

    pub fn len(&self) -> usize {
        self.huds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.huds.is_empty()
    }

    /// Registered ids, sorted.
    pub fn object_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.huds.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Dispatch `command` to the HUD of `object_id`.
    pub fn dispatch(&mut self, object_id: &str, command: &HudCommand) -> HudResult<CommandOutcome> {
        let hud = self
            .huds
            .get_mut(object_id)
            .ok_or_else(|| HudError::NotRegistered(object_id.to_string()))?;
        Ok(hud.dispatch(command))
    }
}

impl<S: EntryStore + ?Sized> Default for HudRegistry<S> {
    fn default() -> Self {
        Self::new(HudSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{NullRenderer, RecordingRenderer};
    use minihud_store::{FileEntryStore, InMemoryEntryStore};
    use minihud_types::BarOptions;

    fn hp() -> ConfigOptions {
        ConfigOptions::new().bar(BarOptions::new("HP", 10))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    #[test]
    fn register_and_scenario() {
        let entries = Arc::new(InMemoryEntryStore::new());
        let mut registry = HudRegistry::default();
        let hud = registry.register("token-1", &hp(), Arc::clone(&entries), Box::new(NullRenderer));
        assert_eq!(hud.value("HP"), Some(10));

        for _ in 0..5 {
            registry
                .dispatch("token-1", &HudCommand::Decrement { bar: "HP".into() })
                .unwrap();
        }
        let hud = registry.get_mut("token-1").unwrap();
        assert_eq!(hud.value("HP"), Some(5));
        assert!(hud.set_color("HP", "#00ff00", None));
        assert!(!hud.set_color("HP", "not-a-color", None));
        assert_eq!(hud.config().bars[0].color, "#00ff00");
        assert!(hud.set_max("HP", 3));
        assert_eq!(hud.value("HP"), Some(3));

        let (store, _) = hud.store_record().try_load().unwrap().unwrap();
        assert_eq!(store.bars, vec![3]);
        let (config, _) = hud.config_record().try_load().unwrap().unwrap();
        assert_eq!(config.bars[0].max, 3);
    }

    #[test]
    fn re_register_keeps_persisted_state() {
        let entries = Arc::new(InMemoryEntryStore::new());
        let mut registry = HudRegistry::default();
        registry
            .register("token-1", &hp(), Arc::clone(&entries), Box::new(NullRenderer))
            .set_max("HP", 4);

        let recorder = RecordingRenderer::new();
        let other = ConfigOptions::new().bar(BarOptions::new("Mana", 20));
        let hud = registry.register("token-1", &other, entries, Box::new(recorder.clone()));
        assert_eq!(hud.max("HP"), Some(4));
        assert_eq!(hud.max("Mana"), None);
        assert_eq!(recorder.count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_leaves_records() {
        let entries = Arc::new(InMemoryEntryStore::new());
        let mut registry = HudRegistry::default();
        registry
            .register("token-1", &hp(), Arc::clone(&entries), Box::new(NullRenderer))
            .decrement("HP");

        assert!(registry.unregister("token-1").is_some());
        assert!(registry.unregister("token-1").is_none());
        assert!(!registry.contains("token-1"));
        assert!(registry.is_empty());
        assert!(!entries.is_empty());
    }

    #[test]
    fn purge_deletes_records() {
        let entries = Arc::new(InMemoryEntryStore::new());
        let mut registry = HudRegistry::default();
        registry
            .register("token-1", &hp(), Arc::clone(&entries), Box::new(NullRenderer))
            .commit();
        assert_eq!(registry.purge("token-1").unwrap(), 4);
        assert!(entries.is_empty());
        assert!(matches!(
            registry.purge("token-1"),
            Err(HudError::NotRegistered(_))
        ));
    }

    #[test]
    fn unknown_object_dispatch() {
        let mut registry: HudRegistry<InMemoryEntryStore> = HudRegistry::default();
        let err = registry.dispatch("ghost", &HudCommand::Repaint).unwrap_err();
        assert!(matches!(err, HudError::NotRegistered(id) if id == "ghost"));
    }

    #[test]
    fn object_ids_sorted() {
        let mut registry = HudRegistry::default();
        for id in ["b", "a", "c"] {
            registry.register(id, &hp(), Arc::new(InMemoryEntryStore::new()), Box::new(NullRenderer));
        }
        assert_eq!(registry.object_ids(), vec!["a", "b", "c"]);
    }

    // ------------------------------------------------------------------
    // File backend
    // ------------------------------------------------------------------

    #[test]
    fn file_backed_hud_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        {
            let entries = Arc::new(FileEntryStore::open(&path, "token-1").unwrap());
            let mut registry = HudRegistry::default();
            registry.register("token-1", &hp(), entries, Box::new(NullRenderer));
            registry
                .dispatch("token-1", &HudCommand::Set { bar: "HP".into(), value: 7 })
                .unwrap();
        }
        let entries = Arc::new(FileEntryStore::open(&path, "token-1").unwrap());
        let mut registry = HudRegistry::default();
        let hud = registry.register("token-1", &hp(), entries, Box::new(NullRenderer));
        assert_eq!(hud.value("HP"), Some(7));
    }
}
