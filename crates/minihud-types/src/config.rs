use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Declares a lowercase string-valued enum with `Display`, `FromStr` and a
/// list of all variants in declaration order.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in editor order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// The wire/editor name of this variant.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(TypeError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// How a bar is drawn: a progress bar or a row of pip icons.
    BarType, "bar type" {
        Bar => "bar",
        Circle => "circle",
        Diamond => "diamond",
        Shield => "shield",
        Crown => "crown",
        Hexagon => "hexagon",
        Flame => "flame",
        Skull => "skull",
    }
}

string_enum! {
    /// How the unfilled part of a pip bar is drawn.
    EmptyMode, "empty mode" {
        /// Outline of the pip icon.
        Hollow => "hollow",
        /// Not drawn at all.
        Blank => "blank",
        /// The filled icon, tinted with the empty color.
        Full => "full",
        /// The dedicated "empty" icon variant.
        Empty => "empty",
    }
}

string_enum! {
    /// Horizontal justification of a pip row.
    Justify, "justification" {
        Left => "left",
        Right => "right",
    }
}

string_enum! {
    /// Pointer icon style.
    PointerType, "pointer type" {
        Simple => "simple",
        Deco => "deco",
        Nouveau => "nouveau",
    }
}

string_enum! {
    /// Which side of the HUD the pointer sits under.
    Alignment, "alignment" {
        Left => "left",
        Right => "right",
    }
}

impl BarType {
    /// Returns `true` for the progress-bar style; every other type draws pips.
    pub fn is_progress(self) -> bool {
        matches!(self, Self::Bar)
    }
}

impl Alignment {
    /// Horizontal UI anchor that puts the pointer over the object center.
    pub fn anchor_x(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => 0.0,
        }
    }
}

pub const DEFAULT_COLOR: &str = "#fff";
pub const DEFAULT_BAR_COLOR: &str = "#f00";

/// One named, bounded resource bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BarType,
    pub empty_mode: EmptyMode,
    pub empty_color: String,
    pub max: u32,
    pub color: String,
    pub text: bool,
    pub large: bool,
    pub justify: Justify,
}

impl BarSpec {
    /// A bar as created by the editor's "add" button.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: BarType::Bar,
            empty_mode: EmptyMode::Hollow,
            empty_color: DEFAULT_COLOR.into(),
            max: 10,
            color: "#04f".into(),
            text: false,
            large: false,
            justify: Justify::Left,
        }
    }
}

/// Directional pointer shown under the bar row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerSpec {
    #[serde(rename = "type")]
    pub kind: PointerType,
    pub alignment: Alignment,
    pub color: String,
}

impl Default for PointerSpec {
    fn default() -> Self {
        Self {
            kind: PointerType::Simple,
            alignment: Alignment::Right,
            color: DEFAULT_COLOR.into(),
        }
    }
}

/// Decorative image slot beside the bars.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeSpec {
    /// Image reference; empty means "blank image".
    pub url: String,
    pub color: String,
}

impl BadgeSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            color: DEFAULT_COLOR.into(),
        }
    }
}

/// Left or right badge slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeSide {
    Left,
    Right,
}

impl std::fmt::Display for BadgeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Fully resolved per-object HUD configuration.
///
/// Field names on the wire match the persisted records of existing HUDs, so
/// a `Config` round-trips through the chunked store unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub controls: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub z_offset: f64,
    pub scale: f64,
    pub pointer_enabled: bool,
    pub pointer: PointerSpec,
    pub bars: Vec<BarSpec>,
    pub left_badge_enabled: bool,
    pub left_badge: BadgeSpec,
    pub right_badge_enabled: bool,
    pub right_badge: BadgeSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controls: false,
            is_static: false,
            z_offset: 0.0,
            scale: 1.0,
            pointer_enabled: false,
            pointer: PointerSpec::default(),
            bars: Vec::new(),
            left_badge_enabled: false,
            left_badge: BadgeSpec::new(""),
            right_badge_enabled: false,
            right_badge: BadgeSpec::new(""),
        }
    }
}

impl Config {
    /// Position of the bar called `name`.
    pub fn bar_index(&self, name: &str) -> Option<usize> {
        self.bars.iter().position(|bar| bar.name == name)
    }

    pub fn bar(&self, name: &str) -> Option<&BarSpec> {
        self.bars.iter().find(|bar| bar.name == name)
    }

    /// Enabled flag and spec for one badge slot.
    pub fn badge(&self, side: BadgeSide) -> (bool, &BadgeSpec) {
        match side {
            BadgeSide::Left => (self.left_badge_enabled, &self.left_badge),
            BadgeSide::Right => (self.right_badge_enabled, &self.right_badge),
        }
    }

    pub fn badge_mut(&mut self, side: BadgeSide) -> (&mut bool, &mut BadgeSpec) {
        match side {
            BadgeSide::Left => (&mut self.left_badge_enabled, &mut self.left_badge),
            BadgeSide::Right => (&mut self.right_badge_enabled, &mut self.right_badge),
        }
    }
}
