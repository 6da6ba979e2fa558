//! Badge and pointer mutations.

use minihud_store::EntryStore;
use minihud_types::{Alignment, BadgeSide, Color, PointerType};
use tracing::debug;

use crate::hud::Hud;

impl<S: EntryStore + ?Sized> Hud<S> {
    // ---- Badges (persist + repaint) ----

    /// Show the `side` badge with `url`, or hide it when `url` is `None`.
    pub fn set_badge(&mut self, side: BadgeSide, url: Option<&str>) -> bool {
        let (enabled, badge) = self.config.badge_mut(side);
        match url {
            Some(url) => {
                *enabled = true;
                badge.url = url.to_string();
            }
            None => *enabled = false,
        }
        debug!(object_id = %self.object_id(), side = %side, enabled = url.is_some(), "badge set");
        self.save_config();
        self.repaint();
        true
    }

    pub fn set_left_badge(&mut self, url: Option<&str>) -> bool {
        self.set_badge(BadgeSide::Left, url)
    }

    pub fn set_right_badge(&mut self, url: Option<&str>) -> bool {
        self.set_badge(BadgeSide::Right, url)
    }

    /// Tint the `side` badge. An invalid color is ignored.
    pub fn set_badge_color(&mut self, side: BadgeSide, color: &str) -> bool {
        if !Color::is_valid(color) {
            return false;
        }
        self.config.badge_mut(side).1.color = color.to_string();
        self.save_config();
        self.repaint();
        true
    }

    pub fn set_left_badge_color(&mut self, color: &str) -> bool {
        self.set_badge_color(BadgeSide::Left, color)
    }

    pub fn set_right_badge_color(&mut self, color: &str) -> bool {
        self.set_badge_color(BadgeSide::Right, color)
    }

    // ---- Pointer (editor edits, saved on commit) ----

    pub fn set_pointer_enabled(&mut self, enabled: bool) -> bool {
        self.config.pointer_enabled = enabled;
        true
    }

    pub fn set_pointer_type(&mut self, kind: PointerType) -> bool {
        self.config.pointer.kind = kind;
        true
    }

    pub fn set_pointer_alignment(&mut self, alignment: Alignment) -> bool {
        self.config.pointer.alignment = alignment;
        true
    }

    pub fn set_pointer_color(&mut self, color: &str) -> bool {
        if !Color::is_valid(color) {
            return false;
        }
        self.config.pointer.color = color.to_string();
        true
    }
}
