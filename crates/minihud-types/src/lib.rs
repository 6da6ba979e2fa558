//! Foundation types for the MiniHUD overlay.
//!
//! This crate holds the plain data every other MiniHUD crate works with.
//! It has no knowledge of persistence or rendering.
//!
//! # Key Types
//!
//! - [`Config`]: fully resolved per-object configuration (bars, badges, pointer)
//! - [`Store`]: runtime bar values, index-aligned with [`Config::bars`]
//! - [`ConfigOptions`]: sparse registration input, turned into a [`Config`] by [`resolve`]
//! - [`Color`]: validated color text (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`)

pub mod color;
pub mod config;
pub mod error;
pub mod options;
pub mod store;

pub use color::Color;
pub use config::{
    Alignment, BadgeSide, BadgeSpec, BarSpec, BarType, Config, EmptyMode, Justify, PointerSpec,
    PointerType,
};
pub use error::TypeError;
pub use options::{
    resolve, BadgeOption, BadgeOptions, BarOptions, ConfigOptions, PointerOption, PointerOptions,
};
pub use store::Store;
