//! Core types for the hudline status HUD.
//!
//! Widgets are data-driven display elements for a text game's sidebar:
//! each binds one variable of an [`AvatarSnapshot`] and renders it as a
//! number, a colored text phrase, or an ASCII graph, while layout widgets
//! compose children into rows and columns. Definitions load from JSON into
//! a [`WidgetRegistry`], are finalized once, and render as pure functions
//! of a snapshot and a width limit.

use slotmap::new_key_type;

pub mod avatar;
pub mod color;
pub mod panel;
pub mod registry;
pub mod widget;

new_key_type! {
    /// Stable handle for widget definitions in the registry arena.
    pub struct WidgetKey;
}

pub use avatar::{
    AvatarSnapshot, BodyPart, BodyPartStatus, CardinalDirection, NUM_CARDINAL_DIRECTIONS,
};
pub use color::{markup, WidgetColor};
pub use panel::{draw_multiline, Cell, CellGrid, WindowPanel};
pub use registry::{FinalizeError, WidgetRegistry};
pub use widget::{
    Arrange, ChildRef, FillMode, Widget, WidgetConfig, WidgetLoadError, WidgetStyle, WidgetVar,
    FLAG_LABEL_NONE,
};
