//! Editor edits: general settings, bar layout and badge toggles.
//!
//! These write into the live config (and store where a bar is added,
//! removed or capped) without persisting or repainting. [`Hud::commit`]
//! saves them.

use minihud_store::EntryStore;
use minihud_types::{BadgeSide, BarSpec, BarType, Color, EmptyMode, Justify};
use tracing::debug;

use crate::hud::Hud;

impl<S: EntryStore + ?Sized> Hud<S> {
    // ---- General ----

    pub fn set_controls(&mut self, controls: bool) -> bool {
        self.config.controls = controls;
        true
    }

    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() {
            return false;
        }
        self.config.scale = scale;
        true
    }

    pub fn set_z_offset(&mut self, z_offset: f64) -> bool {
        if !z_offset.is_finite() {
            return false;
        }
        self.config.z_offset = z_offset;
        true
    }

    pub fn set_badge_enabled(&mut self, side: BadgeSide, enabled: bool) -> bool {
        *self.config.badge_mut(side).0 = enabled;
        true
    }

    // ---- Bar layout ----

    /// Append a bar with editor defaults, starting full.
    pub fn add_bar(&mut self, name: &str) -> bool {
        if self.config.bar_index(name).is_some() {
            return false;
        }
        let bar = BarSpec::new(name);
        self.store.bars.push(bar.max);
        self.config.bars.push(bar);
        debug!(object_id = %self.object_id(), bar = name, "bar added");
        true
    }

    /// Remove the bar at `index` and its value.
    pub fn remove_bar(&mut self, index: usize) -> bool {
        if index >= self.config.bars.len() {
            return false;
        }
        let bar = self.config.bars.remove(index);
        if index < self.store.bars.len() {
            self.store.bars.remove(index);
        }
        debug!(object_id = %self.object_id(), bar = %bar.name, "bar removed");
        true
    }

    /// Rename the bar at `index`. Rejects a name held by another bar.
    pub fn rename_bar(&mut self, index: usize, name: &str) -> bool {
        match self.config.bar_index(name) {
            Some(other) if other != index => return false,
            _ => {}
        }
        match self.config.bars.get_mut(index) {
            Some(bar) => {
                bar.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Set the max of the bar at `index`, capping its value.
    pub fn edit_bar_max(&mut self, index: usize, max: i64) -> bool {
        let Some(bar) = self.config.bars.get_mut(index) else {
            return false;
        };
        let max = max.clamp(0, i64::from(u32::MAX)) as u32;
        bar.max = max;
        if let Some(stored) = self.store.bars.get_mut(index) {
            *stored = (*stored).min(max);
        }
        true
    }

    // ---- Bar fields ----

    pub fn set_bar_type(&mut self, index: usize, kind: BarType) -> bool {
        self.edit_bar(index, |bar| bar.kind = kind)
    }

    pub fn set_bar_empty_mode(&mut self, index: usize, mode: EmptyMode) -> bool {
        self.edit_bar(index, |bar| bar.empty_mode = mode)
    }

    pub fn set_bar_justify(&mut self, index: usize, justify: Justify) -> bool {
        self.edit_bar(index, |bar| bar.justify = justify)
    }

    pub fn set_bar_large(&mut self, index: usize, large: bool) -> bool {
        self.edit_bar(index, |bar| bar.large = large)
    }

    pub fn set_bar_text(&mut self, index: usize, text: bool) -> bool {
        self.edit_bar(index, |bar| bar.text = text)
    }

    pub fn set_bar_color(&mut self, index: usize, color: &str) -> bool {
        Color::is_valid(color) && self.edit_bar(index, |bar| bar.color = color.to_string())
    }

    pub fn set_bar_empty_color(&mut self, index: usize, color: &str) -> bool {
        Color::is_valid(color) && self.edit_bar(index, |bar| bar.empty_color = color.to_string())
    }

    fn edit_bar(&mut self, index: usize, edit: impl FnOnce(&mut BarSpec)) -> bool {
        match self.config.bars.get_mut(index) {
            Some(bar) => {
                edit(bar);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::tests::{hp_options, hud_with};

    // ------------------------------------------------------------------
    // General
    // ------------------------------------------------------------------

    #[test]
    fn general_edits_are_deferred() {
        let (mut hud, entries, recorder) = hud_with(&hp_options());
        assert!(hud.set_controls(true));
        assert!(hud.set_scale(3.0));
        assert!(!hud.set_scale(f64::INFINITY));
        assert!(hud.set_z_offset(-2.0));
        assert!(!hud.set_z_offset(f64::NAN));
        assert!(hud.set_badge_enabled(BadgeSide::Left, true));
        assert!(entries.is_empty());
        assert_eq!(recorder.count(), 1);

        assert!(hud.commit());
        let view = recorder.last().unwrap();
        assert!(view.controls);
        assert_eq!(view.placement.scale, 0.75);
        assert!(view.left_badge.is_some());
        assert_eq!(hud.config().z_offset, -2.0);
    }

    // ------------------------------------------------------------------
    // Bars
    // ------------------------------------------------------------------

    #[test]
    fn add_bar_uses_editor_defaults() {
        let (mut hud, _, _) = hud_with(&hp_options());
        assert!(hud.add_bar("Mana"));
        assert!(!hud.add_bar("HP"));

        let mana = hud.config().bar("Mana").unwrap();
        assert_eq!(mana.color, "#04f");
        assert_eq!(mana.max, 10);
        assert_eq!(mana.kind, BarType::Bar);
        assert_eq!(mana.empty_mode, EmptyMode::Hollow);
        assert_eq!(hud.value("Mana"), Some(10));
        assert!(hud.store().is_consistent_with(hud.config()));
    }

    #[test]
    fn remove_bar_keeps_alignment() {
        let (mut hud, _, _) = hud_with(&hp_options());
        hud.add_bar("Mana");
        hud.set("Mana", 4);
        assert!(hud.remove_bar(0));
        assert!(!hud.remove_bar(5));
        assert_eq!(hud.config().bars.len(), 1);
        assert_eq!(hud.value("Mana"), Some(4));
        assert!(hud.store().is_consistent_with(hud.config()));
    }

    #[test]
    fn rename_rejects_taken_names() {
        let (mut hud, _, _) = hud_with(&hp_options());
        hud.add_bar("Mana");
        assert!(!hud.rename_bar(1, "HP"));
        assert!(hud.rename_bar(0, "HP"));
        assert!(hud.rename_bar(0, "Health"));
        assert!(!hud.rename_bar(9, "Other"));
        assert_eq!(hud.value("Health"), Some(10));
    }

    #[test]
    fn edit_bar_max_caps_value() {
        let (mut hud, entries, _) = hud_with(&hp_options());
        assert!(hud.edit_bar_max(0, 4));
        assert_eq!(hud.value("HP"), Some(4));
        assert!(hud.edit_bar_max(0, 8));
        assert_eq!(hud.value("HP"), Some(4));
        assert!(!hud.edit_bar_max(3, 8));
        assert!(entries.is_empty());
    }

    #[test]
    fn bar_fields() {
        let (mut hud, _, _) = hud_with(&hp_options());
        assert!(hud.set_bar_type(0, BarType::Skull));
        assert!(hud.set_bar_empty_mode(0, EmptyMode::Full));
        assert!(hud.set_bar_justify(0, Justify::Right));
        assert!(hud.set_bar_large(0, true));
        assert!(hud.set_bar_text(0, true));
        assert!(hud.set_bar_color(0, "#abc"));
        assert!(!hud.set_bar_color(0, "abc"));
        assert!(hud.set_bar_empty_color(0, "#000a"));
        assert!(!hud.set_bar_text(1, true));

        let bar = &hud.config().bars[0];
        assert_eq!(bar.kind, BarType::Skull);
        assert_eq!(bar.empty_mode, EmptyMode::Full);
        assert_eq!(bar.justify, Justify::Right);
        assert!(bar.large && bar.text);
        assert_eq!(bar.color, "#abc");
        assert_eq!(bar.empty_color, "#000a");

        let view = hud.view();
        let pips = view.bar("HP").unwrap().pips.as_ref().unwrap();
        assert_eq!(pips.empty_style, EmptyMode::Full);
    }
}
