pub mod clip;
pub mod position;
pub mod slot;

pub use clip::*;
pub use position::*;
pub use slot::*;

use std::fmt;
use std::str::FromStr;

use ratatui::prelude::Direction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bounding box of the viewport panels are laid out in, in pixels.
///
/// Supplied fresh by the caller on every geometry query; nothing in this
/// crate holds on to one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl TargetRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A target counts as measured once it has a positive, finite size.
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn extent(&self, axis: Direction) -> f64 {
        match axis {
            Direction::Horizontal => self.width,
            Direction::Vertical => self.height,
        }
    }
}

/// Filters out targets that have not been measured yet.
pub(crate) fn measured(target: Option<&TargetRect>) -> Option<&TargetRect> {
    target.filter(|t| t.is_measured())
}

/// Resolved panel box relative to the target origin. The origin may be
/// negative for panels dragged partially off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PanelRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn to_position_options(&self) -> PositionOptions {
        PositionOptions::new()
            .left(Length::Px(self.x))
            .top(Length::Px(self.y))
            .width(Length::Px(self.width))
            .height(Length::Px(self.height))
    }
}

/// One field of a position descriptor.
///
/// `Px` and `Percent` are numeric; `Auto` means "derive from the opposing
/// pair"; `Unset` means the field takes no part in layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Length {
    Px(f64),
    Percent(f64),
    Auto,
    #[default]
    Unset,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid length: {input:?}")]
pub struct ParseLengthError {
    pub input: String,
}

impl Length {
    pub fn px(value: impl Into<f64>) -> Self {
        Self::Px(value.into())
    }

    pub fn percent(value: impl Into<f64>) -> Self {
        Self::Percent(value.into())
    }

    /// Total variant of [`FromStr`]: malformed input is simply "not set".
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Px(v) | Self::Percent(v) if v.is_finite())
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `+ 0.0` folds negative zero so clamped values never print as "-0px"
        match *self {
            Length::Px(v) => write!(f, "{}px", v + 0.0),
            Length::Percent(v) => write!(f, "{}%", v + 0.0),
            Length::Auto => f.write_str("auto"),
            Length::Unset => f.write_str("unset"),
        }
    }
}

impl FromStr for Length {
    type Err = ParseLengthError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let err = || ParseLengthError {
            input: raw.to_string(),
        };
        let number = |s: &str| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(err)
        };
        match trimmed {
            "auto" => Ok(Length::Auto),
            "unset" => Ok(Length::Unset),
            "" => Err(err()),
            _ => {
                if let Some(value) = trimmed.strip_suffix('%') {
                    number(value).map(Length::Percent)
                } else if let Some(value) = trimmed.strip_suffix("px") {
                    number(value).map(Length::Px)
                } else {
                    number(trimmed).map(Length::Px)
                }
            }
        }
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Length::Px(value)
    }
}

impl From<i32> for Length {
    fn from(value: i32) -> Self {
        Length::Px(value as f64)
    }
}

impl From<Length> for String {
    fn from(value: Length) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Length {
    type Error = ParseLengthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionField {
    Left,
    Top,
    Right,
    Bottom,
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
}

impl PositionField {
    pub const ALL: [PositionField; 10] = [
        PositionField::Left,
        PositionField::Top,
        PositionField::Right,
        PositionField::Bottom,
        PositionField::Width,
        PositionField::Height,
        PositionField::MinWidth,
        PositionField::MinHeight,
        PositionField::MaxWidth,
        PositionField::MaxHeight,
    ];

    /// Axis whose target extent percentages of this field refer to.
    pub fn axis(self) -> Direction {
        match self {
            PositionField::Left
            | PositionField::Right
            | PositionField::Width
            | PositionField::MinWidth
            | PositionField::MaxWidth => Direction::Horizontal,
            PositionField::Top
            | PositionField::Bottom
            | PositionField::Height
            | PositionField::MinHeight
            | PositionField::MaxHeight => Direction::Vertical,
        }
    }
}

/// Fields of one axis, in (near edge, far edge, size, min, max) order.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisFields {
    pub near: PositionField,
    pub far: PositionField,
    pub size: PositionField,
    pub min: PositionField,
    pub max: PositionField,
}

pub(crate) fn axis_fields(axis: Direction) -> AxisFields {
    match axis {
        Direction::Horizontal => AxisFields {
            near: PositionField::Left,
            far: PositionField::Right,
            size: PositionField::Width,
            min: PositionField::MinWidth,
            max: PositionField::MaxWidth,
        },
        Direction::Vertical => AxisFields {
            near: PositionField::Top,
            far: PositionField::Bottom,
            size: PositionField::Height,
            min: PositionField::MinHeight,
            max: PositionField::MaxHeight,
        },
    }
}

pub(crate) const AXES: [Direction; 2] = [Direction::Horizontal, Direction::Vertical];

/// Caller-supplied position options. `None` means "not supplied"; an
/// explicit `Some(Length::Unset)` clears a field when used as an update.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionOptions {
    pub left: Option<Length>,
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub min_width: Option<Length>,
    pub min_height: Option<Length>,
    pub max_width: Option<Length>,
    pub max_height: Option<Length>,
}

macro_rules! option_setters {
    ($($name:ident),* $(,)?) => {
        $(
            #[must_use]
            pub fn $name(mut self, value: impl Into<Length>) -> Self {
                self.$name = Some(value.into());
                self
            }
        )*
    };
}

impl PositionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    option_setters!(
        left, top, right, bottom, width, height, min_width, min_height, max_width, max_height,
    );

    pub fn get(&self, field: PositionField) -> Option<Length> {
        match field {
            PositionField::Left => self.left,
            PositionField::Top => self.top,
            PositionField::Right => self.right,
            PositionField::Bottom => self.bottom,
            PositionField::Width => self.width,
            PositionField::Height => self.height,
            PositionField::MinWidth => self.min_width,
            PositionField::MinHeight => self.min_height,
            PositionField::MaxWidth => self.max_width,
            PositionField::MaxHeight => self.max_height,
        }
    }

    pub fn set(&mut self, field: PositionField, value: Option<Length>) {
        let slot = match field {
            PositionField::Left => &mut self.left,
            PositionField::Top => &mut self.top,
            PositionField::Right => &mut self.right,
            PositionField::Bottom => &mut self.bottom,
            PositionField::Width => &mut self.width,
            PositionField::Height => &mut self.height,
            PositionField::MinWidth => &mut self.min_width,
            PositionField::MinHeight => &mut self.min_height,
            PositionField::MaxWidth => &mut self.max_width,
            PositionField::MaxHeight => &mut self.max_height,
        };
        *slot = value;
    }
}

/// Normalized position of a panel. Every field is present; fields that do
/// not take part in layout are [`Length::Unset`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionDescriptor {
    pub left: Length,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,
}

impl PositionDescriptor {
    pub fn get(&self, field: PositionField) -> Length {
        match field {
            PositionField::Left => self.left,
            PositionField::Top => self.top,
            PositionField::Right => self.right,
            PositionField::Bottom => self.bottom,
            PositionField::Width => self.width,
            PositionField::Height => self.height,
            PositionField::MinWidth => self.min_width,
            PositionField::MinHeight => self.min_height,
            PositionField::MaxWidth => self.max_width,
            PositionField::MaxHeight => self.max_height,
        }
    }

    pub fn set(&mut self, field: PositionField, value: Length) {
        let slot = match field {
            PositionField::Left => &mut self.left,
            PositionField::Top => &mut self.top,
            PositionField::Right => &mut self.right,
            PositionField::Bottom => &mut self.bottom,
            PositionField::Width => &mut self.width,
            PositionField::Height => &mut self.height,
            PositionField::MinWidth => &mut self.min_width,
            PositionField::MinHeight => &mut self.min_height,
            PositionField::MaxWidth => &mut self.max_width,
            PositionField::MaxHeight => &mut self.max_height,
        };
        *slot = value;
    }

    /// Set fields become `Some`; unset fields are left out.
    pub fn to_options(&self) -> PositionOptions {
        let mut options = PositionOptions::default();
        for field in PositionField::ALL {
            let value = self.get(field);
            if value.is_set() {
                options.set(field, Some(value));
            }
        }
        options
    }
}

impl From<&PositionOptions> for PositionDescriptor {
    fn from(options: &PositionOptions) -> Self {
        let mut descriptor = PositionDescriptor::default();
        for field in PositionField::ALL {
            if let Some(value) = options.get(field) {
                descriptor.set(field, value);
            }
        }
        descriptor
    }
}
