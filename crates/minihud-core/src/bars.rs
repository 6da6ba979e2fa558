//! Live bar mutations.
//!
//! Bars are addressed by name. Every operation returns `false` and changes
//! nothing when it is rejected; an accepted operation persists what it
//! touched and repaints.

use minihud_store::EntryStore;
use minihud_types::Color;
use tracing::debug;

use crate::hud::Hud;

impl<S: EntryStore + ?Sized> Hud<S> {
    /// Stored value of bar `name`.
    pub fn value(&self, name: &str) -> Option<u32> {
        self.config
            .bar_index(name)
            .and_then(|index| self.store.value(index))
    }

    /// Max of bar `name`.
    pub fn max(&self, name: &str) -> Option<u32> {
        self.config.bar(name).map(|bar| bar.max)
    }

    /// Set bar `name` to `value` clamped into `[0, max]`.
    ///
    /// Returns `false` for an unknown bar or when the clamped value is
    /// already stored.
    pub fn set(&mut self, name: &str, value: i64) -> bool {
        let Some(index) = self.config.bar_index(name) else {
            return false;
        };
        let max = self.config.bars[index].max;
        let clamped = value.clamp(0, i64::from(max)) as u32;
        match self.store.bars.get_mut(index) {
            Some(stored) if *stored == clamped => return false,
            Some(stored) => *stored = clamped,
            None => return false,
        }
        debug!(object_id = %self.object_id(), bar = name, value = clamped, "bar set");
        self.save_store();
        self.repaint();
        true
    }

    /// Raise bar `name` by one. Rejected at max.
    pub fn increment(&mut self, name: &str) -> bool {
        let Some(index) = self.config.bar_index(name) else {
            return false;
        };
        let max = self.config.bars[index].max;
        match self.store.bars.get_mut(index) {
            Some(stored) if *stored < max => *stored += 1,
            _ => return false,
        }
        self.save_store();
        self.repaint();
        true
    }

    /// Lower bar `name` by one. Rejected at zero.
    pub fn decrement(&mut self, name: &str) -> bool {
        let Some(index) = self.config.bar_index(name) else {
            return false;
        };
        match self.store.bars.get_mut(index) {
            Some(stored) if *stored > 0 => *stored -= 1,
            _ => return false,
        }
        self.save_store();
        self.repaint();
        true
    }

    /// Change the max of bar `name`. Negative maxima become zero.
    ///
    /// A stored value above the new max is forced down and the store is
    /// persisted as well.
    pub fn set_max(&mut self, name: &str, max: i64) -> bool {
        let Some(index) = self.config.bar_index(name) else {
            return false;
        };
        let max = max.clamp(0, i64::from(u32::MAX)) as u32;
        self.config.bars[index].max = max;
        self.save_config();

        if let Some(stored) = self.store.bars.get_mut(index) {
            if *stored > max {
                *stored = max;
                self.save_store();
            }
        }
        debug!(object_id = %self.object_id(), bar = name, max, "bar max set");
        self.repaint();
        true
    }

    /// Recolor bar `name`. Each color applies only if it is valid.
    ///
    /// A known bar is always persisted and repainted. Returns `true` if a
    /// color actually changed.
    pub fn set_color(&mut self, name: &str, color: &str, empty_color: Option<&str>) -> bool {
        let Some(index) = self.config.bar_index(name) else {
            return false;
        };
        let bar = &mut self.config.bars[index];
        let mut changed = false;
        if Color::is_valid(color) && bar.color != color {
            bar.color = color.to_string();
            changed = true;
        }
        if let Some(empty_color) = empty_color {
            if Color::is_valid(empty_color) && bar.empty_color != empty_color {
                bar.empty_color = empty_color.to_string();
                changed = true;
            }
        }
        self.save_config();
        self.repaint();
        changed
    }
}
