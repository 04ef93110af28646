//! Widget definitions: configuration records, validated definitions, and
//! the value formatting behind `show` and `layout`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::avatar::{AvatarSnapshot, BodyPart, CardinalDirection};
use crate::color::{markup, WidgetColor};
use crate::registry::WidgetRegistry;
use crate::WidgetKey;

/// Flag suppressing the `"label: "` prefix of a widget.
pub const FLAG_LABEL_NONE: &str = "label_none";

/// The queryable quantities a widget may bind to.
///
/// Numeric variables resolve to `(value, max)` pairs; `*Text` variables
/// resolve to pre-colored strings displayed verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetVar {
    Focus,
    Move,
    Pain,
    Sound,
    Speed,
    Stamina,
    Fatigue,
    Health,
    Mana,
    Morale,
    Weariness,
    StatStr,
    StatDex,
    StatInt,
    StatPer,
    BpHp,
    BpEncumb,
    BpWarmth,
    BpWetness,
    CardioFit,
    ActivityText,
    BodyTempText,
    CompassText,
    DateText,
    FatigueText,
    HungerText,
    LightingText,
    MoodText,
    MoveModeText,
    PainText,
    PlaceText,
    ThirstText,
    TimeText,
    WeatherText,
    WearinessText,
    WieldingText,
}

impl WidgetVar {
    /// Whether this variable resolves to a pre-colored string.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(
            self,
            Self::ActivityText
                | Self::BodyTempText
                | Self::CompassText
                | Self::DateText
                | Self::FatigueText
                | Self::HungerText
                | Self::LightingText
                | Self::MoodText
                | Self::MoveModeText
                | Self::PainText
                | Self::PlaceText
                | Self::ThirstText
                | Self::TimeText
                | Self::WeatherText
                | Self::WearinessText
                | Self::WieldingText
        )
    }

    /// Whether this variable requires a `bodypart` qualifier.
    #[must_use]
    pub const fn needs_bodypart(self) -> bool {
        matches!(
            self,
            Self::BpHp | Self::BpEncumb | Self::BpWarmth | Self::BpWetness
        )
    }

    /// Whether this variable requires a `direction` qualifier.
    #[must_use]
    pub const fn needs_direction(self) -> bool {
        matches!(self, Self::CompassText)
    }
}

/// How a graph widget distributes filled units across its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Fill cells left to right, one full cell at a time.
    #[default]
    Bucket,
    /// Spread the fill evenly across all cells.
    Pool,
}

/// Axis along which a layout widget places its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrange {
    #[default]
    Columns,
    Rows,
}

/// Flat widget record as it appears in configuration JSON.
///
/// Field meanings depend on `style`; [`Widget::from_config`] validates the
/// combination and produces the tagged in-memory form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetConfig {
    pub id: String,
    pub style: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub var: Option<WidgetVar>,
    #[serde(default)]
    pub var_min: i32,
    #[serde(default = "default_var_max")]
    pub var_max: i32,
    #[serde(default)]
    pub bodypart: Option<BodyPart>,
    #[serde(default)]
    pub direction: Option<CardinalDirection>,
    #[serde(default)]
    pub width: u16,
    #[serde(default)]
    pub height: u16,
    #[serde(default)]
    pub symbols: String,
    #[serde(default)]
    pub fill: FillMode,
    #[serde(default)]
    pub strings: Vec<String>,
    #[serde(default)]
    pub colors: Vec<WidgetColor>,
    #[serde(default)]
    pub widgets: Vec<String>,
    #[serde(default)]
    pub arrange: Arrange,
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

fn default_var_max() -> i32 {
    10
}

/// Rejections reported while turning configuration records into widgets.
#[derive(Debug, Error)]
pub enum WidgetLoadError {
    #[error("invalid widget JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("widget '{id}' has unknown style '{style}'")]
    UnknownStyle { id: String, style: String },
    #[error("widget '{id}' does not bind a variable")]
    MissingVar { id: String },
    #[error("graph widget '{id}' needs at least two symbols")]
    MissingSymbols { id: String },
    #[error("widget '{id}' domain is empty: var_max {var_max} <= var_min {var_min}")]
    EmptyDomain {
        id: String,
        var_min: i32,
        var_max: i32,
    },
    #[error("widget '{id}' binds {var:?} but has no bodypart qualifier")]
    MissingBodypart { id: String, var: WidgetVar },
    #[error("widget '{id}' binds {var:?} but has no direction qualifier")]
    MissingDirection { id: String, var: WidgetVar },
    #[error("text widget '{id}' has no strings")]
    MissingStrings { id: String },
    #[error("widget '{id}' has {colors} colors for {expected} strings")]
    ColorCountMismatch {
        id: String,
        colors: usize,
        expected: usize,
    },
    #[error("widget '{id}' binds text variable {var:?} to {style} style")]
    TextVarStyle {
        id: String,
        var: WidgetVar,
        style: &'static str,
    },
    #[error("layout widget '{id}' has no children")]
    MissingChildren { id: String },
}

/// Child slot of a layout widget: an id reference, bound to an arena key
/// by [`WidgetRegistry::finalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRef {
    id: String,
    key: Option<WidgetKey>,
}

impl ChildRef {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Arena key of the child, once the registry has been finalized.
    #[must_use]
    pub fn key(&self) -> Option<WidgetKey> {
        self.key
    }
}

/// Style-specific payload of a widget definition.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetStyle {
    /// Decimal number, color-coded by the widget's color ranges.
    Numeric,
    /// Fixed-width bar drawn from an ordered symbol alphabet.
    Graph { symbols: Vec<char>, fill: FillMode },
    /// One phrase out of an ordered list, selected by value range.
    Text { phrases: Vec<String> },
    /// Composite of child widgets arranged in rows or columns.
    Layout {
        children: Vec<ChildRef>,
        arrange: Arrange,
    },
}

impl WidgetStyle {
    /// Configuration token naming this style.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Graph { .. } => "graph",
            Self::Text { .. } => "text",
            Self::Layout { .. } => "layout",
        }
    }
}

/// A validated widget definition.
///
/// Widgets are immutable once loaded; every rendering operation is a pure
/// function of the definition, an [`AvatarSnapshot`], and a width limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    id: String,
    label: String,
    style: WidgetStyle,
    var: Option<WidgetVar>,
    bodypart: Option<BodyPart>,
    direction: Option<CardinalDirection>,
    var_min: i32,
    var_max: i32,
    width: u16,
    height: u16,
    colors: Vec<WidgetColor>,
    flags: BTreeSet<String>,
}

impl Widget {
    /// Validate a flat configuration record into a widget definition.
    pub fn from_config(config: WidgetConfig) -> Result<Self, WidgetLoadError> {
        let WidgetConfig {
            id,
            style,
            label,
            var,
            var_min,
            var_max,
            bodypart,
            direction,
            width,
            height,
            symbols,
            fill,
            strings,
            colors,
            widgets,
            arrange,
            flags,
        } = config;

        let text_var = var.is_some_and(WidgetVar::is_text);
        let style = match style.as_str() {
            "numeric" => WidgetStyle::Numeric,
            "graph" => {
                let symbols: Vec<char> = symbols.chars().collect();
                if symbols.len() < 2 {
                    return Err(WidgetLoadError::MissingSymbols { id });
                }
                WidgetStyle::Graph { symbols, fill }
            }
            "text" => {
                // Text-variable widgets display the snapshot string verbatim
                // and need no phrase mapping.
                if strings.is_empty() && !text_var {
                    return Err(WidgetLoadError::MissingStrings { id });
                }
                if !colors.is_empty() && !strings.is_empty() && colors.len() != strings.len() {
                    return Err(WidgetLoadError::ColorCountMismatch {
                        id,
                        colors: colors.len(),
                        expected: strings.len(),
                    });
                }
                WidgetStyle::Text { phrases: strings }
            }
            "layout" => {
                if widgets.is_empty() {
                    return Err(WidgetLoadError::MissingChildren { id });
                }
                if var.is_some() {
                    warn!(id = %id, "layout widget binds a variable; ignoring it");
                }
                WidgetStyle::Layout {
                    children: widgets
                        .into_iter()
                        .map(|id| ChildRef { id, key: None })
                        .collect(),
                    arrange,
                }
            }
            other => {
                return Err(WidgetLoadError::UnknownStyle {
                    id,
                    style: other.to_string(),
                });
            }
        };

        let is_layout = matches!(style, WidgetStyle::Layout { .. });
        let var = if is_layout { None } else { var };
        if !is_layout {
            let Some(var) = var else {
                return Err(WidgetLoadError::MissingVar { id });
            };
            if text_var && !matches!(style, WidgetStyle::Text { .. }) {
                return Err(WidgetLoadError::TextVarStyle {
                    id,
                    var,
                    style: style.token(),
                });
            }
            if var.needs_bodypart() && bodypart.is_none() {
                return Err(WidgetLoadError::MissingBodypart { id, var });
            }
            if var.needs_direction() && direction.is_none() {
                return Err(WidgetLoadError::MissingDirection { id, var });
            }
            let partitions_domain =
                !text_var && (!matches!(style, WidgetStyle::Numeric) || !colors.is_empty());
            if partitions_domain && var_max <= var_min {
                return Err(WidgetLoadError::EmptyDomain {
                    id,
                    var_min,
                    var_max,
                });
            }
        }

        Ok(Self {
            id,
            label,
            style,
            var,
            bodypart,
            direction,
            var_min,
            var_max,
            width,
            height,
            colors,
            flags,
        })
    }

    /// Reconstruct the flat configuration record for this definition.
    #[must_use]
    pub fn to_config(&self) -> WidgetConfig {
        let (symbols, fill) = match &self.style {
            WidgetStyle::Graph { symbols, fill } => (symbols.iter().collect(), *fill),
            _ => (String::new(), FillMode::default()),
        };
        let strings = match &self.style {
            WidgetStyle::Text { phrases } => phrases.clone(),
            _ => Vec::new(),
        };
        let (widgets, arrange) = match &self.style {
            WidgetStyle::Layout { children, arrange } => (
                children.iter().map(|child| child.id.clone()).collect(),
                *arrange,
            ),
            _ => (Vec::new(), Arrange::default()),
        };
        WidgetConfig {
            id: self.id.clone(),
            style: self.style.token().to_string(),
            label: self.label.clone(),
            var: self.var,
            var_min: self.var_min,
            var_max: self.var_max,
            bodypart: self.bodypart,
            direction: self.direction,
            width: self.width,
            height: self.height,
            symbols,
            fill,
            strings,
            colors: self.colors.clone(),
            widgets,
            arrange,
            flags: self.flags.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn style(&self) -> &WidgetStyle {
        &self.style
    }

    #[must_use]
    pub fn var(&self) -> Option<WidgetVar> {
        self.var
    }

    #[must_use]
    pub const fn var_min(&self) -> i32 {
        self.var_min
    }

    #[must_use]
    pub const fn var_max(&self) -> i32 {
        self.var_max
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn colors(&self) -> &[WidgetColor] {
        &self.colors
    }

    #[must_use]
    pub fn is_layout(&self) -> bool {
        matches!(self.style, WidgetStyle::Layout { .. })
    }

    /// Whether the definition carries the given behavior flag.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub(crate) fn bind_children(&mut self, keys: &[WidgetKey]) {
        if let WidgetStyle::Layout { children, .. } = &mut self.style {
            debug_assert_eq!(children.len(), keys.len());
            for (child, key) in children.iter_mut().zip(keys) {
                child.key = Some(*key);
            }
        }
    }

    fn bound_var(&self) -> WidgetVar {
        match self.var {
            Some(var) => var,
            None => panic!("widget '{}' resolved without a bound variable", self.id),
        }
    }

    /// Current value of the bound numeric variable.
    #[must_use]
    pub fn var_value(&self, ava: &AvatarSnapshot) -> i32 {
        match self.bound_var() {
            WidgetVar::Focus => ava.focus,
            WidgetVar::Move => ava.move_count,
            WidgetVar::Pain => ava.pain,
            WidgetVar::Sound => ava.sound,
            WidgetVar::Speed => ava.speed,
            WidgetVar::Stamina => ava.stamina,
            WidgetVar::Fatigue => ava.fatigue,
            WidgetVar::Health => ava.health,
            WidgetVar::Mana => ava.mana,
            WidgetVar::Morale => ava.morale,
            WidgetVar::Weariness => ava.weariness,
            WidgetVar::StatStr => ava.stat_str,
            WidgetVar::StatDex => ava.stat_dex,
            WidgetVar::StatInt => ava.stat_int,
            WidgetVar::StatPer => ava.stat_per,
            WidgetVar::CardioFit => ava.cardio_fit,
            WidgetVar::BpHp => self.part(ava).hp,
            WidgetVar::BpEncumb => self.part(ava).encumbrance,
            WidgetVar::BpWarmth => self.part(ava).warmth,
            WidgetVar::BpWetness => self.part(ava).wetness,
            var => panic!("widget '{}' reads text variable {var:?} as numeric", self.id),
        }
    }

    /// Maximum for the bound variable: the snapshot's dynamic maximum when
    /// it provides a usable one, the configured `var_max` otherwise.
    #[must_use]
    pub fn var_max_value(&self, ava: &AvatarSnapshot) -> i32 {
        let dynamic = match self.bound_var() {
            WidgetVar::Stamina => ava.stamina_max,
            WidgetVar::Mana => ava.mana_max,
            WidgetVar::BpHp => self.part(ava).hp_max,
            _ => 0,
        };
        if dynamic > self.var_min {
            dynamic
        } else {
            self.var_max
        }
    }

    /// Pre-colored display string for a text variable, verbatim from the snapshot.
    #[must_use]
    pub fn text_value(&self, ava: &AvatarSnapshot) -> String {
        match self.bound_var() {
            WidgetVar::ActivityText => ava.activity_text.clone(),
            WidgetVar::BodyTempText => ava.body_temp_text.clone(),
            WidgetVar::CompassText => {
                let direction = match self.direction {
                    Some(direction) => direction,
                    None => panic!("compass widget '{}' has no direction", self.id),
                };
                ava.compass_text(direction).to_string()
            }
            WidgetVar::DateText => ava.date_text.clone(),
            WidgetVar::FatigueText => ava.fatigue_text.clone(),
            WidgetVar::HungerText => ava.hunger_text.clone(),
            WidgetVar::LightingText => ava.lighting_text.clone(),
            WidgetVar::MoodText => ava.mood_text.clone(),
            WidgetVar::MoveModeText => ava.move_mode_text.clone(),
            WidgetVar::PainText => ava.pain_text.clone(),
            WidgetVar::PlaceText => ava.place_text.clone(),
            WidgetVar::ThirstText => ava.thirst_text.clone(),
            WidgetVar::TimeText => ava.time_text.clone(),
            WidgetVar::WeatherText => ava.weather_text.clone(),
            WidgetVar::WearinessText => ava.weariness_text.clone(),
            WidgetVar::WieldingText => ava.wielding_text.clone(),
            var => panic!("widget '{}' reads numeric variable {var:?} as text", self.id),
        }
    }

    fn part(&self, ava: &AvatarSnapshot) -> crate::avatar::BodyPartStatus {
        let part = match self.bodypart {
            Some(part) => part,
            None => panic!("widget '{}' needs a bodypart qualifier", self.id),
        };
        ava.body_part(part)
    }

    /// Effective domain maximum. Zero means "use the configured maximum",
    /// as does a maximum that would leave the domain empty.
    fn domain_max(&self, value_max: i32) -> i32 {
        if value_max != 0 && value_max > self.var_min {
            value_max
        } else {
            self.var_max
        }
    }

    /// Index of the domain segment containing `value`, for `len` equal
    /// partitions of `[var_min, max]`. Out-of-domain values clamp to the
    /// boundary segments.
    fn segment_index(&self, value: i32, value_max: i32, len: usize) -> usize {
        let max = self.domain_max(value_max);
        debug_assert!(max > self.var_min, "empty domain survived load validation");
        let span = i64::from(max) - i64::from(self.var_min);
        let offset = i64::from(value.clamp(self.var_min, max)) - i64::from(self.var_min);
        let index = offset * len as i64 / span;
        (index as usize).min(len - 1)
    }

    /// Render the value as this widget's style dictates, without color.
    ///
    /// Here and in the other formatting entry points, a `value_max` of
    /// zero selects the configured `var_max`.
    #[must_use]
    pub fn value_string(&self, value: i32, value_max: i32) -> String {
        match &self.style {
            WidgetStyle::Numeric => self.number(value),
            WidgetStyle::Graph { .. } => self.graph(value, value_max),
            WidgetStyle::Text { .. } => self.text_phrase(value, value_max),
            WidgetStyle::Layout { .. } => String::new(),
        }
    }

    /// Color for a value, from the widget's ascending color ranges.
    #[must_use]
    pub fn value_color(&self, value: i32, value_max: i32) -> WidgetColor {
        if self.colors.is_empty() {
            WidgetColor::default()
        } else {
            self.colors[self.segment_index(value, value_max, self.colors.len())]
        }
    }

    /// [`Self::value_string`] wrapped in markup with [`Self::value_color`].
    #[must_use]
    pub fn color_value_string(&self, value: i32, value_max: i32) -> String {
        markup::colorize(&self.value_string(value, value_max), self.value_color(value, value_max))
    }

    /// Decimal rendering for numeric style.
    #[must_use]
    pub fn number(&self, value: i32) -> String {
        value.to_string()
    }

    /// Phrase mapped to `value` for text style.
    #[must_use]
    pub fn text_phrase(&self, value: i32, value_max: i32) -> String {
        let WidgetStyle::Text { phrases } = &self.style else {
            panic!("text rendering on {} widget '{}'", self.style.token(), self.id)
        };
        phrases[self.segment_index(value, value_max, phrases.len())].clone()
    }

    /// Graph rendering: exactly `width` cells from the symbol alphabet.
    ///
    /// With `k = symbols.len() - 1` fill units per cell, the scaled value
    /// occupies `units` of the `width * k` total. Bucket fill completes
    /// cells left to right with one partial boundary cell; pool fill gives
    /// every cell `units / width` with the leftmost `units % width` cells
    /// one extra unit, so both modes fill the same unit total.
    #[must_use]
    pub fn graph(&self, value: i32, value_max: i32) -> String {
        let WidgetStyle::Graph { symbols, fill } = &self.style else {
            panic!("graph rendering on {} widget '{}'", self.style.token(), self.id)
        };
        let width = usize::from(self.width.max(1));
        let steps = symbols.len() - 1;
        let max = self.domain_max(value_max);
        let span = i64::from(max) - i64::from(self.var_min);
        let total = (width * steps) as i64;
        let offset = i64::from(value.clamp(self.var_min, max)) - i64::from(self.var_min);
        let units = (offset * total / span).clamp(0, total) as usize;

        let mut out = String::with_capacity(width);
        match fill {
            FillMode::Bucket => {
                let full = units / steps;
                let partial = units % steps;
                for cell in 0..width {
                    let symbol = if cell < full {
                        symbols[steps]
                    } else if cell == full && partial > 0 {
                        symbols[partial]
                    } else {
                        symbols[0]
                    };
                    out.push(symbol);
                }
            }
            FillMode::Pool => {
                let base = units / width;
                let extra = units % width;
                for cell in 0..width {
                    let level = base + usize::from(cell < extra);
                    out.push(symbols[level]);
                }
            }
        }
        out
    }

    /// Labeled rendering of this widget, truncated to `max_width` visible
    /// columns; `max_width == 0` leaves the width unconstrained.
    #[must_use]
    pub fn show(&self, ava: &AvatarSnapshot, max_width: u16, registry: &WidgetRegistry) -> String {
        if self.is_layout() {
            // Same as layout, minus the per-line trailing padding.
            let full = self.layout(ava, max_width, registry);
            return full
                .split('\n')
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n");
        }

        let value = match self.var {
            Some(var) if var.is_text() => self.text_value(ava),
            _ => {
                let value = self.var_value(ava);
                let max = self.var_max_value(ava);
                self.color_value_string(value, max)
            }
        };

        let mut out = String::new();
        if !self.label.is_empty() && !self.has_flag(FLAG_LABEL_NONE) {
            out.push_str(&self.label);
            out.push_str(": ");
        }
        out.push_str(&value);
        if max_width > 0 {
            out = markup::truncate(&out, usize::from(max_width));
        }
        out
    }

    /// Aligned rendering for composition inside a parent layout.
    ///
    /// Leaf widgets render as [`Self::show`] padded to exactly `max_width`
    /// visible columns. Layout widgets render their children in order:
    /// columns split `max_width` evenly with the remainder assigned to the
    /// last child; rows give each child the full width, joined by `'\n'`.
    #[must_use]
    pub fn layout(&self, ava: &AvatarSnapshot, max_width: u16, registry: &WidgetRegistry) -> String {
        let WidgetStyle::Layout { children, arrange } = &self.style else {
            return markup::pad_to(&self.show(ava, max_width, registry), usize::from(max_width));
        };

        let resolve = |child: &ChildRef| -> &Widget {
            let key = match child.key {
                Some(key) => key,
                None => panic!("layout '{}' rendered before finalize", self.id),
            };
            match registry.widget(key) {
                Some(widget) => widget,
                None => panic!("layout '{}' child '{}' missing from registry", self.id, child.id),
            }
        };

        match arrange {
            Arrange::Rows => {
                let rows: Vec<String> = children
                    .iter()
                    .map(|child| resolve(child).layout(ava, max_width, registry))
                    .collect();
                rows.join("\n")
            }
            Arrange::Columns => {
                let count = children.len() as u16;
                let base = max_width / count;
                let remainder = max_width % count;
                let mut out = String::new();
                for (index, child) in children.iter().enumerate() {
                    let width = if index + 1 == children.len() {
                        base + remainder
                    } else {
                        base
                    };
                    out.push_str(&resolve(child).layout(ava, width, registry));
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::markup::display_width;

    fn config(id: &str, style: &str) -> WidgetConfig {
        WidgetConfig {
            id: id.to_string(),
            style: style.to_string(),
            label: String::new(),
            var: Some(WidgetVar::Stamina),
            var_min: 0,
            var_max: 10,
            bodypart: None,
            direction: None,
            width: 0,
            height: 0,
            symbols: String::new(),
            fill: FillMode::default(),
            strings: Vec::new(),
            colors: Vec::new(),
            widgets: Vec::new(),
            arrange: Arrange::default(),
            flags: BTreeSet::new(),
        }
    }

    fn graph_widget(symbols: &str, fill: FillMode, var_max: i32, width: u16) -> Widget {
        let mut cfg = config("g", "graph");
        cfg.symbols = symbols.to_string();
        cfg.fill = fill;
        cfg.var_max = var_max;
        cfg.width = width;
        Widget::from_config(cfg).expect("valid graph config")
    }

    #[test]
    fn bucket_graph_matches_worked_example() {
        let widget = graph_widget("0123456789", FillMode::Bucket, 100, 10);
        assert_eq!(widget.graph(55, 0), "9999940000");
        assert_eq!(widget.graph(0, 0), "0000000000");
        assert_eq!(widget.graph(100, 0), "9999999999");
    }

    #[test]
    fn pool_graph_spreads_fill_evenly() {
        let widget = graph_widget("-=#", FillMode::Pool, 10, 5);
        // 5 cells x 2 steps = 10 units; value 7 -> base 1 everywhere, two extras left.
        assert_eq!(widget.graph(7, 0), "##===");
        assert_eq!(widget.graph(0, 0), "-----");
        assert_eq!(widget.graph(10, 0), "#####");
    }

    #[test]
    fn graph_clamps_out_of_domain_values() {
        let widget = graph_widget("0123456789", FillMode::Bucket, 100, 10);
        assert_eq!(widget.graph(-40, 0), widget.graph(0, 0));
        assert_eq!(widget.graph(420, 0), widget.graph(100, 0));
    }

    #[test]
    fn text_phrases_partition_the_domain() {
        let mut cfg = config("t", "text");
        cfg.var_max = 90;
        cfg.strings = vec!["low".into(), "medium".into(), "high".into()];
        let widget = Widget::from_config(cfg).expect("valid text config");
        assert_eq!(widget.text_phrase(29, 0), "low");
        assert_eq!(widget.text_phrase(30, 0), "medium");
        assert_eq!(widget.text_phrase(60, 0), "high");
        assert_eq!(widget.text_phrase(90, 0), "high");
        assert_eq!(widget.text_phrase(-5, 0), "low");
    }

    #[test]
    fn value_color_follows_ascending_ranges() {
        let mut cfg = config("n", "numeric");
        cfg.var_max = 90;
        cfg.colors = vec![WidgetColor::Red, WidgetColor::Yellow, WidgetColor::Green];
        let widget = Widget::from_config(cfg).expect("valid numeric config");
        assert_eq!(widget.value_color(0, 0), WidgetColor::Red);
        assert_eq!(widget.value_color(45, 0), WidgetColor::Yellow);
        assert_eq!(widget.value_color(89, 0), WidgetColor::Green);
        assert_eq!(widget.value_color(1000, 0), WidgetColor::Green);
    }

    #[test]
    fn uncolored_widgets_render_neutral() {
        let widget = Widget::from_config(config("n", "numeric")).expect("valid");
        assert_eq!(widget.value_color(5, 0), WidgetColor::LightGray);
    }

    #[test]
    fn show_prefixes_label_and_truncates() {
        let registry = WidgetRegistry::new();
        let mut cfg = config("s", "numeric");
        cfg.label = "Stamina".to_string();
        let widget = Widget::from_config(cfg).expect("valid");
        let mut ava = AvatarSnapshot::default();
        ava.stamina = 7;

        let full = widget.show(&ava, 0, &registry);
        assert!(full.starts_with("Stamina: "));
        assert_eq!(display_width(&full), "Stamina: 7".len());

        let cut = widget.show(&ava, 4, &registry);
        assert_eq!(display_width(&cut), 4);
    }

    #[test]
    fn label_none_flag_suppresses_label() {
        let registry = WidgetRegistry::new();
        let mut cfg = config("s", "numeric");
        cfg.label = "Stamina".to_string();
        cfg.flags.insert(FLAG_LABEL_NONE.to_string());
        let widget = Widget::from_config(cfg).expect("valid");
        let ava = AvatarSnapshot::default();
        assert_eq!(display_width(&widget.show(&ava, 0, &registry)), 1);
    }

    #[test]
    fn dynamic_maximum_overrides_configured_max() {
        let widget = graph_widget("-+", FillMode::Bucket, 10, 4);
        let mut ava = AvatarSnapshot::default();
        ava.stamina = 5000;
        ava.stamina_max = 10000;
        assert_eq!(widget.var_max_value(&ava), 10000);
        assert_eq!(widget.graph(ava.stamina, widget.var_max_value(&ava)), "++--");
    }

    #[test]
    fn load_validation_rejects_bad_configs() {
        let mut no_symbols = config("g", "graph");
        no_symbols.symbols = "x".to_string();
        assert!(matches!(
            Widget::from_config(no_symbols),
            Err(WidgetLoadError::MissingSymbols { .. })
        ));

        let mut empty_domain = config("g", "graph");
        empty_domain.symbols = "-+".to_string();
        empty_domain.var_max = 0;
        assert!(matches!(
            Widget::from_config(empty_domain),
            Err(WidgetLoadError::EmptyDomain { .. })
        ));

        let mut bare_bp = config("b", "numeric");
        bare_bp.var = Some(WidgetVar::BpHp);
        assert!(matches!(
            Widget::from_config(bare_bp),
            Err(WidgetLoadError::MissingBodypart { .. })
        ));

        let mut compass = config("c", "text");
        compass.var = Some(WidgetVar::CompassText);
        compass.strings = vec!["clear".into()];
        assert!(matches!(
            Widget::from_config(compass),
            Err(WidgetLoadError::MissingDirection { .. })
        ));

        let mut mismatched = config("t", "text");
        mismatched.strings = vec!["a".into(), "b".into()];
        mismatched.colors = vec![WidgetColor::Red];
        assert!(matches!(
            Widget::from_config(mismatched),
            Err(WidgetLoadError::ColorCountMismatch { .. })
        ));

        let unknown = config("u", "gauge");
        assert!(matches!(
            Widget::from_config(unknown),
            Err(WidgetLoadError::UnknownStyle { .. })
        ));
    }
}
