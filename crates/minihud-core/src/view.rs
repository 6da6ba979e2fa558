//! Declarative description of a HUD, rebuilt on every repaint.
//!
//! A [`HudView`] is plain data: renderers turn it into widgets. Nothing in
//! here touches persistence.

use minihud_types::{
    Alignment, BadgeSpec, BarType, Config, EmptyMode, Justify, PointerType, Store,
};
use serde::Serialize;

/// Scale of the HUD while the editor is open.
pub const EDITOR_SCALE: f64 = 0.25;

/// Complete visual state of one HUD.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HudView {
    pub bars: Vec<BarView>,
    pub left_badge: Option<BadgeView>,
    pub right_badge: Option<BadgeView>,
    pub pointer: Option<PointerView>,
    /// Draw increment/decrement buttons beside each bar.
    pub controls: bool,
    /// Rows for the editor's "Values" tab.
    pub values: Vec<ValueRow>,
    pub placement: Placement,
}

/// One bar as drawn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarView {
    pub name: String,
    pub kind: BarType,
    pub value: u32,
    pub max: u32,
    /// Fill fraction in `[0, 1]`; a bar with `max == 0` is drawn full.
    pub progress: f64,
    /// `"<value> / <max>"` when the bar shows text.
    pub label: Option<String>,
    pub color: String,
    pub large: bool,
    pub justify: Justify,
    /// Pip layout for icon bars; `None` for progress bars.
    pub pips: Option<PipRow>,
}

/// Row of pip icons for non-progress bar types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PipRow {
    pub filled: u32,
    /// Pips drawn for the missing part; zero when the empty mode is blank.
    pub empty: u32,
    pub empty_style: EmptyMode,
    pub empty_color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    /// `None` draws the blank placeholder image.
    pub url: Option<String>,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PointerView {
    pub kind: PointerType,
    pub alignment: Alignment,
    pub color: String,
}

/// Editable value row: name, current value, max.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValueRow {
    pub name: String,
    pub value: u32,
    pub max: u32,
}

/// Where the HUD sits relative to its object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    /// Horizontal UI anchor.
    pub anchor_x: f64,
    pub scale: f64,
    /// Bottom padding lifting the HUD above the object, in UI units.
    pub bottom_padding: i64,
}

impl Placement {
    /// Placement for `config` over an object `object_height` units tall.
    pub fn compute(config: &Config, object_height: f64, editing: bool) -> Self {
        let bottom_padding = ((object_height * 10.0) / 0.25 + config.z_offset).round() as i64;
        if editing {
            return Self {
                anchor_x: 0.5,
                scale: EDITOR_SCALE,
                bottom_padding,
            };
        }
        Self {
            anchor_x: if config.pointer_enabled {
                config.pointer.alignment.anchor_x()
            } else {
                0.5
            },
            scale: config.scale / 4.0,
            bottom_padding,
        }
    }
}

fn badge_view(enabled: bool, badge: &BadgeSpec) -> Option<BadgeView> {
    enabled.then(|| BadgeView {
        url: (!badge.url.is_empty()).then(|| badge.url.clone()),
        color: badge.color.clone(),
    })
}

impl HudView {
    /// Build the view for `config` and `store`.
    ///
    /// A bar without a stored value is drawn full.
    pub fn build(config: &Config, store: &Store, object_height: f64, editing: bool) -> Self {
        let bars: Vec<BarView> = config
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let value = store.value(i).unwrap_or(bar.max).min(bar.max);
                let progress = if bar.max == 0 {
                    1.0
                } else {
                    f64::from(value) / f64::from(bar.max)
                };
                let pips = (!bar.kind.is_progress()).then(|| PipRow {
                    filled: value,
                    empty: if bar.empty_mode == EmptyMode::Blank {
                        0
                    } else {
                        bar.max - value
                    },
                    empty_style: bar.empty_mode,
                    empty_color: bar.empty_color.clone(),
                });
                BarView {
                    name: bar.name.clone(),
                    kind: bar.kind,
                    value,
                    max: bar.max,
                    progress,
                    label: bar.text.then(|| format!("{value} / {}", bar.max)),
                    color: bar.color.clone(),
                    large: bar.large,
                    justify: bar.justify,
                    pips,
                }
            })
            .collect();

        let values = bars
            .iter()
            .map(|bar| ValueRow {
                name: bar.name.clone(),
                value: bar.value,
                max: bar.max,
            })
            .collect();

        Self {
            bars,
            left_badge: badge_view(config.left_badge_enabled, &config.left_badge),
            right_badge: badge_view(config.right_badge_enabled, &config.right_badge),
            pointer: config.pointer_enabled.then(|| PointerView {
                kind: config.pointer.kind,
                alignment: config.pointer.alignment,
                color: config.pointer.color.clone(),
            }),
            controls: config.controls,
            values,
            placement: Placement::compute(config, object_height, editing),
        }
    }

    pub fn bar(&self, name: &str) -> Option<&BarView> {
        self.bars.iter().find(|bar| bar.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minihud_types::{BadgeOption, BarOptions, ConfigOptions, PointerOption, PointerOptions};

    fn config() -> Config {
        ConfigOptions::new()
            .bar(BarOptions::new("HP", 10).text(true))
            .bar(BarOptions::new("Luck", 4).kind(BarType::Diamond))
            .bar(BarOptions::new("Empty", 0))
            .resolve()
    }

    #[test]
    fn progress_and_label() {
        let view = HudView::build(&config(), &Store { bars: vec![5, 1, 0] }, 0.0, false);
        let hp = view.bar("HP").unwrap();
        assert_eq!(hp.progress, 0.5);
        assert_eq!(hp.label.as_deref(), Some("5 / 10"));
        assert!(hp.pips.is_none());

        let empty = view.bar("Empty").unwrap();
        assert_eq!(empty.progress, 1.0);
        assert!(empty.label.is_none());
    }

    #[test]
    fn pip_rows() {
        let mut config = config();
        let view = HudView::build(&config, &Store { bars: vec![10, 1, 0] }, 0.0, false);
        let pips = view.bar("Luck").unwrap().pips.clone().unwrap();
        assert_eq!((pips.filled, pips.empty), (1, 3));
        assert_eq!(pips.empty_style, EmptyMode::Hollow);

        config.bars[1].empty_mode = EmptyMode::Blank;
        let view = HudView::build(&config, &Store { bars: vec![10, 1, 0] }, 0.0, false);
        assert_eq!(view.bar("Luck").unwrap().pips.as_ref().unwrap().empty, 0);
    }

    #[test]
    fn missing_values_draw_full() {
        let view = HudView::build(&config(), &Store::default(), 0.0, false);
        assert_eq!(view.bar("HP").unwrap().value, 10);
        assert_eq!(view.values[1], ValueRow { name: "Luck".into(), value: 4, max: 4 });
    }

    #[test]
    fn badges_and_pointer() {
        let config = ConfigOptions::new()
            .left_badge(BadgeOption::Url(String::new()))
            .right_badge(BadgeOption::Url("crest.png".into()))
            .pointer(PointerOption::Custom(PointerOptions {
                alignment: Some(Alignment::Left),
                ..Default::default()
            }))
            .resolve();
        let view = HudView::build(&config, &Store::default(), 0.0, false);
        assert_eq!(view.left_badge.as_ref().unwrap().url, None);
        assert_eq!(view.right_badge.as_ref().unwrap().url.as_deref(), Some("crest.png"));
        assert_eq!(view.pointer.as_ref().unwrap().alignment, Alignment::Left);
        assert_eq!(view.placement.anchor_x, 1.0);
    }

    #[test]
    fn placement() {
        let config = ConfigOptions::new().scale(2.0).z_offset(3.0).resolve();
        let p = Placement::compute(&config, 1.2, false);
        assert_eq!(p.anchor_x, 0.5);
        assert_eq!(p.scale, 0.5);
        assert_eq!(p.bottom_padding, 51);

        let editing = Placement::compute(&config, 1.2, true);
        assert_eq!(editing.scale, EDITOR_SCALE);
        assert_eq!(editing.anchor_x, 0.5);
    }
}
