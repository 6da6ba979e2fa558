//! Serializable HUD commands.
//!
//! Every controller and editor operation has a [`HudCommand`] variant, so a
//! host can drive a HUD from JSON:
//!
//! ```json
//! { "op": "increment", "bar": "HP" }
//! { "op": "set_color", "bar": "HP", "color": "#0f0" }
//! { "op": "set_badge", "side": "left", "url": null }
//! ```

use minihud_store::EntryStore;
use minihud_types::{Alignment, BadgeSide, BarType, EmptyMode, Justify, PointerType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hud::Hud;
use crate::sync::SyncEffect;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum HudCommand {
    // Live bar operations
    Set {
        bar: String,
        value: i64,
    },
    Increment {
        bar: String,
    },
    Decrement {
        bar: String,
    },
    SetMax {
        bar: String,
        max: i64,
    },
    SetColor {
        bar: String,
        color: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        empty_color: Option<String>,
    },

    // Badges
    SetBadge {
        side: BadgeSide,
        #[serde(default)]
        url: Option<String>,
    },
    SetBadgeColor {
        side: BadgeSide,
        color: String,
    },
    SetBadgeEnabled {
        side: BadgeSide,
        enabled: bool,
    },

    // Pointer
    SetPointerEnabled {
        enabled: bool,
    },
    SetPointerType {
        #[serde(rename = "type")]
        kind: PointerType,
    },
    SetPointerAlignment {
        alignment: Alignment,
    },
    SetPointerColor {
        color: String,
    },

    // General editor
    SetControls {
        enabled: bool,
    },
    SetScale {
        scale: f64,
    },
    SetZOffset {
        z_offset: f64,
    },

    // Bar editor
    AddBar {
        name: String,
    },
    RemoveBar {
        index: usize,
    },
    RenameBar {
        index: usize,
        name: String,
    },
    EditBarMax {
        index: usize,
        max: i64,
    },
    SetBarType {
        index: usize,
        #[serde(rename = "type")]
        kind: BarType,
    },
    SetBarEmptyMode {
        index: usize,
        mode: EmptyMode,
    },
    SetBarJustify {
        index: usize,
        justify: Justify,
    },
    SetBarLarge {
        index: usize,
        large: bool,
    },
    SetBarText {
        index: usize,
        text: bool,
    },
    SetBarColor {
        index: usize,
        color: String,
    },
    SetBarEmptyColor {
        index: usize,
        color: String,
    },

    // Mode and sync
    OpenEditor,
    Commit,
    Repaint,
}

impl HudCommand {
    /// The `op` tag of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Set { .. } => "set",
            Self::Increment { .. } => "increment",
            Self::Decrement { .. } => "decrement",
            Self::SetMax { .. } => "set_max",
            Self::SetColor { .. } => "set_color",
            Self::SetBadge { .. } => "set_badge",
            Self::SetBadgeColor { .. } => "set_badge_color",
            Self::SetBadgeEnabled { .. } => "set_badge_enabled",
            Self::SetPointerEnabled { .. } => "set_pointer_enabled",
            Self::SetPointerType { .. } => "set_pointer_type",
            Self::SetPointerAlignment { .. } => "set_pointer_alignment",
            Self::SetPointerColor { .. } => "set_pointer_color",
            Self::SetControls { .. } => "set_controls",
            Self::SetScale { .. } => "set_scale",
            Self::SetZOffset { .. } => "set_z_offset",
            Self::AddBar { .. } => "add_bar",
            Self::RemoveBar { .. } => "remove_bar",
            Self::RenameBar { .. } => "rename_bar",
            Self::EditBarMax { .. } => "edit_bar_max",
            Self::SetBarType { .. } => "set_bar_type",
            Self::SetBarEmptyMode { .. } => "set_bar_empty_mode",
            Self::SetBarJustify { .. } => "set_bar_justify",
            Self::SetBarLarge { .. } => "set_bar_large",
            Self::SetBarText { .. } => "set_bar_text",
            Self::SetBarColor { .. } => "set_bar_color",
            Self::SetBarEmptyColor { .. } => "set_bar_empty_color",
            Self::OpenEditor => "open_editor",
            Self::Commit => "commit",
            Self::Repaint => "repaint",
        }
    }

    /// Returns `true` for editor edits, which change the live HUD but are
    /// only persisted by a later [`HudCommand::Commit`].
    pub fn is_deferred(&self) -> bool {
        matches!(
            self,
            Self::SetBadgeEnabled { .. }
                | Self::SetPointerEnabled { .. }
                | Self::SetPointerType { .. }
                | Self::SetPointerAlignment { .. }
                | Self::SetPointerColor { .. }
                | Self::SetControls { .. }
                | Self::SetScale { .. }
                | Self::SetZOffset { .. }
                | Self::AddBar { .. }
                | Self::RemoveBar { .. }
                | Self::RenameBar { .. }
                | Self::EditBarMax { .. }
                | Self::SetBarType { .. }
                | Self::SetBarEmptyMode { .. }
                | Self::SetBarJustify { .. }
                | Self::SetBarLarge { .. }
                | Self::SetBarText { .. }
                | Self::SetBarColor { .. }
                | Self::SetBarEmptyColor { .. }
        )
    }
}

/// Result of dispatching one command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub command: &'static str,
    pub accepted: bool,
    /// Saves and repaints caused by the command, in order.
    pub effects: Vec<SyncEffect>,
}

impl<S: EntryStore + ?Sized> Hud<S> {
    /// Apply `command` and report what it did.
    pub fn dispatch(&mut self, command: &HudCommand) -> CommandOutcome {
        self.notifier.begin_capture();
        let accepted = self.apply(command);
        let effects = self.notifier.end_capture();
        debug!(
            object_id = %self.object_id(),
            command = command.name(),
            accepted,
            effects = effects.len(),
            "command dispatched"
        );
        CommandOutcome {
            command: command.name(),
            accepted,
            effects,
        }
    }

    fn apply(&mut self, command: &HudCommand) -> bool {
        use HudCommand as C;
        match command {
            C::Set { bar, value } => self.set(bar, *value),
            C::Increment { bar } => self.increment(bar),
            C::Decrement { bar } => self.decrement(bar),
            C::SetMax { bar, max } => self.set_max(bar, *max),
            C::SetColor {
                bar,
                color,
                empty_color,
            } => self.set_color(bar, color, empty_color.as_deref()),
            C::SetBadge { side, url } => self.set_badge(*side, url.as_deref()),
            C::SetBadgeColor { side, color } => self.set_badge_color(*side, color),
            C::SetBadgeEnabled { side, enabled } => self.set_badge_enabled(*side, *enabled),
            C::SetPointerEnabled { enabled } => self.set_pointer_enabled(*enabled),
            C::SetPointerType { kind } => self.set_pointer_type(*kind),
            C::SetPointerAlignment { alignment } => self.set_pointer_alignment(*alignment),
            C::SetPointerColor { color } => self.set_pointer_color(color),
            C::SetControls { enabled } => self.set_controls(*enabled),
            C::SetScale { scale } => self.set_scale(*scale),
            C::SetZOffset { z_offset } => self.set_z_offset(*z_offset),
            C::AddBar { name } => self.add_bar(name),
            C::RemoveBar { index } => self.remove_bar(*index),
            C::RenameBar { index, name } => self.rename_bar(*index, name),
            C::EditBarMax { index, max } => self.edit_bar_max(*index, *max),
            C::SetBarType { index, kind } => self.set_bar_type(*index, *kind),
            C::SetBarEmptyMode { index, mode } => self.set_bar_empty_mode(*index, *mode),
            C::SetBarJustify { index, justify } => self.set_bar_justify(*index, *justify),
            C::SetBarLarge { index, large } => self.set_bar_large(*index, *large),
            C::SetBarText { index, text } => self.set_bar_text(*index, *text),
            C::SetBarColor { index, color } => self.set_bar_color(*index, color),
            C::SetBarEmptyColor { index, color } => self.set_bar_empty_color(*index, color),
            C::OpenEditor => self.open_editor(),
            C::Commit => self.commit(),
            C::Repaint => {
                self.repaint();
                true
            }
        }
    }
}
