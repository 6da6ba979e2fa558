//! Registration options and their resolution into a full [`Config`].
//!
//! Options are sparse: every field may be omitted and is filled in from a
//! per-field default. The loosely shaped inputs accepted by existing HUD
//! scripts (`"pointer": true`, `"leftBadge": "https://..."`) are modelled
//! as tagged unions and collapsed into one canonical shape by [`resolve`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{
    Alignment, BadgeSpec, BarSpec, BarType, Config, EmptyMode, Justify, PointerSpec, PointerType,
    DEFAULT_BAR_COLOR, DEFAULT_COLOR,
};

/// Partially specified HUD configuration supplied at registration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigOptions {
    pub controls: Option<bool>,
    #[serde(rename = "static")]
    pub is_static: Option<bool>,
    pub z_offset: Option<f64>,
    pub scale: Option<f64>,
    pub pointer: Option<PointerOption>,
    pub bars: Option<Vec<BarOptions>>,
    pub left_badge: Option<BadgeOption>,
    pub right_badge: Option<BadgeOption>,
}

/// Pointer option: a bare on/off switch or a partial pointer spec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointerOption {
    Toggle(bool),
    Custom(PointerOptions),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerOptions {
    #[serde(rename = "type")]
    pub kind: Option<PointerType>,
    pub alignment: Option<Alignment>,
    pub color: Option<String>,
}

/// Badge option: an image url or a url with a tint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BadgeOption {
    Url(String),
    Custom(BadgeOptions),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeOptions {
    pub url: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Partial bar definition. `name` and `max` are required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarOptions {
    pub name: String,
    pub max: u32,
    #[serde(rename = "type", default)]
    pub kind: Option<BarType>,
    #[serde(default)]
    pub empty_mode: Option<EmptyMode>,
    #[serde(default)]
    pub empty_color: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub text: Option<bool>,
    #[serde(default)]
    pub large: Option<bool>,
    #[serde(default)]
    pub justify: Option<Justify>,
}

impl BarOptions {
    pub fn new(name: impl Into<String>, max: u32) -> Self {
        Self {
            name: name.into(),
            max,
            kind: None,
            empty_mode: None,
            empty_color: None,
            color: None,
            text: None,
            large: None,
            justify: None,
        }
    }

    pub fn kind(mut self, kind: BarType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn text(mut self, text: bool) -> Self {
        self.text = Some(text);
        self
    }

    fn resolve(&self) -> BarSpec {
        let kind = self.kind.unwrap_or(BarType::Bar);
        let default_color = if kind.is_progress() {
            DEFAULT_BAR_COLOR
        } else {
            DEFAULT_COLOR
        };
        BarSpec {
            name: self.name.clone(),
            kind,
            empty_mode: self.empty_mode.unwrap_or(EmptyMode::Hollow),
            empty_color: self
                .empty_color
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR.into()),
            max: self.max,
            color: self.color.clone().unwrap_or_else(|| default_color.into()),
            text: self.text.unwrap_or(false),
            large: self.large.unwrap_or(false),
            justify: self.justify.unwrap_or(Justify::Left),
        }
    }
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controls(mut self, controls: bool) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn is_static(mut self, is_static: bool) -> Self {
        self.is_static = Some(is_static);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn z_offset(mut self, z_offset: f64) -> Self {
        self.z_offset = Some(z_offset);
        self
    }

    pub fn pointer(mut self, pointer: PointerOption) -> Self {
        self.pointer = Some(pointer);
        self
    }

    /// Append one bar definition.
    pub fn bar(mut self, bar: BarOptions) -> Self {
        self.bars.get_or_insert_with(Vec::new).push(bar);
        self
    }

    pub fn left_badge(mut self, badge: BadgeOption) -> Self {
        self.left_badge = Some(badge);
        self
    }

    pub fn right_badge(mut self, badge: BadgeOption) -> Self {
        self.right_badge = Some(badge);
        self
    }

    /// Resolve into a full configuration. See [`resolve`].
    pub fn resolve(&self) -> Config {
        resolve(self)
    }
}

fn resolve_badge(option: Option<&BadgeOption>) -> (bool, BadgeSpec) {
    match option {
        None => (false, BadgeSpec::new("")),
        Some(BadgeOption::Url(url)) => (true, BadgeSpec::new(url.clone())),
        Some(BadgeOption::Custom(badge)) => (
            true,
            BadgeSpec {
                url: badge.url.clone(),
                color: badge.color.clone().unwrap_or_else(|| DEFAULT_COLOR.into()),
            },
        ),
    }
}

/// Apply per-field defaults to `options`, producing a complete [`Config`].
///
/// Bars keep their given order. A bar whose name repeats an earlier one is
/// dropped so that names stay unique.
pub fn resolve(options: &ConfigOptions) -> Config {
    let (pointer_enabled, pointer) = match &options.pointer {
        None => (false, PointerSpec::default()),
        Some(PointerOption::Toggle(enabled)) => (*enabled, PointerSpec::default()),
        Some(PointerOption::Custom(custom)) => (
            true,
            PointerSpec {
                kind: custom.kind.unwrap_or(PointerType::Simple),
                alignment: custom.alignment.unwrap_or(Alignment::Right),
                color: custom.color.clone().unwrap_or_else(|| DEFAULT_COLOR.into()),
            },
        ),
    };

    let mut seen = HashSet::new();
    let bars = options
        .bars
        .iter()
        .flatten()
        .filter(|bar| {
            let fresh = seen.insert(bar.name.as_str());
            if !fresh {
                tracing::warn!(name = %bar.name, "duplicate bar name in options; ignoring");
            }
            fresh
        })
        .map(BarOptions::resolve)
        .collect();

    let (left_badge_enabled, left_badge) = resolve_badge(options.left_badge.as_ref());
    let (right_badge_enabled, right_badge) = resolve_badge(options.right_badge.as_ref());

    Config {
        controls: options.controls.unwrap_or(false),
        is_static: options.is_static.unwrap_or(false),
        z_offset: options.z_offset.unwrap_or(0.0),
        scale: options.scale.unwrap_or(1.0),
        pointer_enabled,
        pointer,
        bars,
        left_badge_enabled,
        left_badge,
        right_badge_enabled,
        right_badge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Top-level defaults
    // -----------------------------------------------------------------------

    #[test]
    fn empty_options_resolve_to_defaults() {
        let config = resolve(&ConfigOptions::default());
        assert!(!config.controls);
        assert!(!config.is_static);
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.z_offset, 0.0);
        assert!(!config.pointer_enabled);
        assert!(config.bars.is_empty());
        assert!(!config.left_badge_enabled);
        assert!(!config.right_badge_enabled);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn explicit_scalars_are_kept() {
        let config = ConfigOptions::new()
            .controls(true)
            .is_static(true)
            .scale(2.0)
            .z_offset(-3.5)
            .resolve();
        assert!(config.controls);
        assert!(config.is_static);
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.z_offset, -3.5);
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    #[test]
    fn pointer_toggle() {
        let on = ConfigOptions::new().pointer(PointerOption::Toggle(true)).resolve();
        assert!(on.pointer_enabled);
        assert_eq!(on.pointer, PointerSpec::default());

        let off = ConfigOptions::new().pointer(PointerOption::Toggle(false)).resolve();
        assert!(!off.pointer_enabled);
    }

    #[test]
    fn pointer_object_defaults_each_field() {
        let config = ConfigOptions::new()
            .pointer(PointerOption::Custom(PointerOptions {
                alignment: Some(Alignment::Left),
                ..Default::default()
            }))
            .resolve();
        assert!(config.pointer_enabled);
        assert_eq!(config.pointer.kind, PointerType::Simple);
        assert_eq!(config.pointer.alignment, Alignment::Left);
        assert_eq!(config.pointer.color, "#fff");
    }

    // -----------------------------------------------------------------------
    // Bars
    // -----------------------------------------------------------------------

    #[test]
    fn bar_defaults_depend_on_type() {
        let config = ConfigOptions::new()
            .bar(BarOptions::new("HP", 10))
            .bar(BarOptions::new("Armor", 3).kind(BarType::Shield))
            .resolve();

        let hp = &config.bars[0];
        assert_eq!(hp.kind, BarType::Bar);
        assert_eq!(hp.color, "#f00");
        assert_eq!(hp.empty_mode, EmptyMode::Hollow);
        assert_eq!(hp.empty_color, "#fff");
        assert_eq!(hp.justify, Justify::Left);
        assert!(!hp.text && !hp.large);

        let armor = &config.bars[1];
        assert_eq!(armor.kind, BarType::Shield);
        assert_eq!(armor.color, "#fff");
        assert_eq!(armor.max, 3);
    }

    #[test]
    fn explicit_bar_color_wins() {
        let config = ConfigOptions::new()
            .bar(BarOptions::new("HP", 10).color("#0f0"))
            .resolve();
        assert_eq!(config.bars[0].color, "#0f0");
    }

    #[test]
    fn duplicate_bar_names_keep_first() {
        let config = ConfigOptions::new()
            .bar(BarOptions::new("HP", 10))
            .bar(BarOptions::new("HP", 99))
            .resolve();
        assert_eq!(config.bars.len(), 1);
        assert_eq!(config.bars[0].max, 10);
    }

    // -----------------------------------------------------------------------
    // Badges
    // -----------------------------------------------------------------------

    #[test]
    fn badge_string_is_url() {
        let config = ConfigOptions::new()
            .left_badge(BadgeOption::Url("shield.png".into()))
            .resolve();
        assert!(config.left_badge_enabled);
        assert_eq!(config.left_badge, BadgeSpec::new("shield.png"));
        assert!(!config.right_badge_enabled);
        assert_eq!(config.right_badge.url, "");
    }

    #[test]
    fn badge_object_defaults_color() {
        let config = ConfigOptions::new()
            .right_badge(BadgeOption::Custom(BadgeOptions {
                url: "crest.png".into(),
                color: None,
            }))
            .resolve();
        assert!(config.right_badge_enabled);
        assert_eq!(config.right_badge.color, "#fff");
    }

    // -----------------------------------------------------------------------
    // JSON input shapes
    // -----------------------------------------------------------------------

    #[test]
    fn accepts_loose_json_shapes() {
        let raw = r##"{
            "pointer": true,
            "leftBadge": "a.png",
            "rightBadge": {"url": "b.png", "color": "#0ff"},
            "bars": [{"name": "HP", "max": 10}, {"name": "Luck", "max": 3, "type": "crown"}]
        }"##;
        let options: ConfigOptions = serde_json::from_str(raw).unwrap();
        assert_eq!(options.pointer, Some(PointerOption::Toggle(true)));
        assert_eq!(options.left_badge, Some(BadgeOption::Url("a.png".into())));

        let config = options.resolve();
        assert!(config.pointer_enabled);
        assert_eq!(config.right_badge.color, "#0ff");
        assert_eq!(config.bars[1].kind, BarType::Crown);
    }

    #[test]
    fn pointer_object_json() {
        let options: ConfigOptions =
            serde_json::from_str(r#"{"pointer": {"type": "nouveau"}}"#).unwrap();
        let config = options.resolve();
        assert!(config.pointer_enabled);
        assert_eq!(config.pointer.kind, PointerType::Nouveau);
        assert_eq!(config.pointer.alignment, Alignment::Right);
    }
}
