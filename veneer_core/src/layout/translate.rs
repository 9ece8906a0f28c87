// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property → layout command translation.
//!
//! Keys fall into five shapes ([`LayoutKey`]):
//!
//! - **Keywords** map one-to-one onto solver enumerations. Anything else is
//!   an [`InvalidPropertyValue`](crate::error::ConfigurationError::InvalidPropertyValue).
//! - **Dimensions** accept numbers (points), `"N%"` strings (percentages),
//!   and `"auto"`.
//! - **Edge groups** (`margin*`, `padding*`, `border*Width`, inset) resolve
//!   each edge as: specific edge key, then `*Horizontal` / `*Vertical`, then
//!   the base key, then the default. Touching any key of a group re-emits all
//!   four edges.
//! - **Gaps** resolve `rowGap` / `columnGap` over `gap`.
//! - **Scalars** pass any other numeric key through to the solver's
//!   `setXxx` setter, if the solver supports it. A key whose setter the
//!   solver does not know is not a layout key at all: surfaces carry
//!   arbitrary host properties, and only the solver can tell them apart.
//!
//! Values are always read through the caller's live view, so a key driven
//! by a tween translates its current interpolated value. A missing value
//! resets the constraint to its default.

use std::collections::BTreeSet;

use crate::error::{ConfigurationError, SurfaceError};
use crate::props::Literal;

macro_rules! keywords {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident = $kw:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Parses a keyword.
            #[must_use]
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($kw => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// The keyword for this value.
            #[must_use]
            pub const fn keyword(self) -> &'static str {
                match self {
                    $(Self::$variant => $kw,)+
                }
            }
        }
    };
}

keywords! {
    /// `display`.
    DisplayMode {
        /// Flexbox container.
        Flex = "flex",
        /// Removed from layout and paint.
        None = "none",
    }
}

keywords! {
    /// `position`.
    PositionType {
        /// In flow, offset by insets.
        Relative = "relative",
        /// Out of flow, placed by insets.
        Absolute = "absolute",
    }
}

keywords! {
    /// `flexDirection`.
    FlexDirection {
        /// Left to right.
        Row = "row",
        /// Right to left.
        RowReverse = "row-reverse",
        /// Top to bottom.
        Column = "column",
        /// Bottom to top.
        ColumnReverse = "column-reverse",
    }
}

keywords! {
    /// `flexWrap`.
    FlexWrap {
        /// Single line.
        NoWrap = "nowrap",
        /// Wrap onto new lines.
        Wrap = "wrap",
        /// Wrap onto new lines in reverse.
        WrapReverse = "wrap-reverse",
    }
}

keywords! {
    /// `justifyContent`.
    JustifyContent {
        /// Pack at the start.
        FlexStart = "flex-start",
        /// Pack at the end.
        FlexEnd = "flex-end",
        /// Pack in the middle.
        Center = "center",
        /// Even gaps, none at the ends.
        SpaceBetween = "space-between",
        /// Even gaps, half-size at the ends.
        SpaceAround = "space-around",
        /// Even gaps everywhere.
        SpaceEvenly = "space-evenly",
    }
}

keywords! {
    /// `alignItems` and `alignSelf`. `"auto"` parses to the solver default.
    Align {
        /// Cross-start.
        FlexStart = "flex-start",
        /// Cross-end.
        FlexEnd = "flex-end",
        /// Cross-center.
        Center = "center",
        /// Fill the line.
        Stretch = "stretch",
        /// Align baselines.
        Baseline = "baseline",
    }
}

keywords! {
    /// `alignContent`.
    AlignContent {
        /// Lines at the start.
        FlexStart = "flex-start",
        /// Lines at the end.
        FlexEnd = "flex-end",
        /// Lines in the middle.
        Center = "center",
        /// Lines fill the container.
        Stretch = "stretch",
        /// Even gaps, none at the ends.
        SpaceBetween = "space-between",
        /// Even gaps, half-size at the ends.
        SpaceAround = "space-around",
        /// Even gaps everywhere.
        SpaceEvenly = "space-evenly",
    }
}

keywords! {
    /// `overflow`, applied to both axes.
    OverflowMode {
        /// Content may paint outside the box.
        Visible = "visible",
        /// Content is clipped.
        Hidden = "hidden",
        /// Content is clipped and scrollable.
        Scroll = "scroll",
        /// Content is clipped and contributes no scroll size.
        Clip = "clip",
    }
}

/// A length constraint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dimension {
    /// Absolute points.
    Points(f64),
    /// Fraction of the parent's size, `0.5` for `"50%"`.
    Percent(f64),
    /// Decided by the solver.
    Auto,
}

/// A box dimension property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeProp {
    /// `width`.
    Width,
    /// `height`.
    Height,
    /// `minWidth`.
    MinWidth,
    /// `minHeight`.
    MinHeight,
    /// `maxWidth`.
    MaxWidth,
    /// `maxHeight`.
    MaxHeight,
    /// `flexBasis`.
    FlexBasis,
}

/// One side of a box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Top.
    Top,
    /// Right.
    Right,
    /// Bottom.
    Bottom,
    /// Left.
    Left,
}

impl Edge {
    /// Every edge, clockwise from the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    const fn name(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Right => "Right",
            Self::Bottom => "Bottom",
            Self::Left => "Left",
        }
    }

    const fn axis(self) -> &'static str {
        match self {
            Self::Top | Self::Bottom => "Vertical",
            Self::Left | Self::Right => "Horizontal",
        }
    }
}

/// A family of four edge constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeGroup {
    /// `margin*`.
    Margin,
    /// `padding*`.
    Padding,
    /// `borderWidth` and `border*Width`.
    Border,
    /// `inset*` and `top` / `right` / `bottom` / `left`.
    Inset,
}

impl EdgeGroup {
    /// Every group.
    pub const ALL: [Self; 4] = [Self::Margin, Self::Padding, Self::Border, Self::Inset];

    fn base(self) -> &'static str {
        match self {
            Self::Margin => "margin",
            Self::Padding => "padding",
            Self::Border => "borderWidth",
            Self::Inset => "inset",
        }
    }

    /// Key naming `edge` (`marginTop`, `borderTopWidth`, `top`).
    fn edge_key(self, edge: Edge) -> String {
        match self {
            Self::Border => format!("border{}Width", edge.name()),
            Self::Inset => edge.name().to_ascii_lowercase(),
            _ => format!("{}{}", self.base(), edge.name()),
        }
    }

    /// Key naming the axis containing `edge` (`marginHorizontal`,
    /// `borderVerticalWidth`).
    fn axis_key(self, edge: Edge) -> String {
        match self {
            Self::Border => format!("border{}Width", edge.axis()),
            _ => format!("{}{}", self.base(), edge.axis()),
        }
    }

    fn owns(self, key: &str) -> bool {
        key == self.base()
            || Edge::ALL
                .into_iter()
                .any(|e| key == self.edge_key(e) || key == self.axis_key(e))
    }

    fn accepts_auto(self) -> bool {
        matches!(self, Self::Margin | Self::Inset)
    }

    fn default_value(self) -> Dimension {
        match self {
            Self::Inset => Dimension::Auto,
            _ => Dimension::Points(0.0),
        }
    }
}

/// A gap axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GapAxis {
    /// Space between rows (`rowGap`).
    Row,
    /// Space between columns (`columnGap`).
    Column,
}

/// A solver-neutral constraint change.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutCommand {
    /// Sets `display`.
    Display(DisplayMode),
    /// Sets `position`.
    Position(PositionType),
    /// Sets `flexDirection`.
    FlexDirection(FlexDirection),
    /// Sets `flexWrap`.
    FlexWrap(FlexWrap),
    /// Sets `justifyContent`; `None` is the solver default.
    JustifyContent(Option<JustifyContent>),
    /// Sets `alignItems`; `None` is the solver default.
    AlignItems(Option<Align>),
    /// Sets `alignSelf`; `None` defers to the parent.
    AlignSelf(Option<Align>),
    /// Sets `alignContent`; `None` is the solver default.
    AlignContent(Option<AlignContent>),
    /// Sets `overflow` on both axes.
    Overflow(OverflowMode),
    /// Sets a box dimension.
    Size(SizeProp, Dimension),
    /// Sets one edge of a group.
    Edge(EdgeGroup, Edge, Dimension),
    /// Sets a gap.
    Gap(GapAxis, Dimension),
    /// Calls a pass-through setter; `None` restores its default.
    Scalar {
        /// Setter name, such as `setFlexGrow`.
        setter: String,
        /// The value.
        value: Option<f64>,
    },
}

/// The translation shape of a layout key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKey {
    /// A keyword property.
    Keyword(&'static str),
    /// A box dimension.
    Size(SizeProp),
    /// A member of an edge group.
    Edge(EdgeGroup),
    /// `gap`, `rowGap`, or `columnGap`.
    Gap,
    /// A pass-through numeric key and its setter.
    Scalar(String),
}

const KEYWORD_KEYS: [&str; 9] = [
    "display",
    "position",
    "flexDirection",
    "flexWrap",
    "justifyContent",
    "alignItems",
    "alignSelf",
    "alignContent",
    "overflow",
];

/// Keys that are never layout keys even though they hold numbers.
const NON_LAYOUT: [&str; 9] = [
    "opacity",
    "scale",
    "scaleX",
    "scaleY",
    "rotation",
    "skewX",
    "skewY",
    "borderRadius",
    "text",
];

impl LayoutKey {
    /// Classifies `key`. `supports` reports whether the solver has a
    /// pass-through setter of a given name.
    ///
    /// Returns `None` for keys layout ignores, including any key whose
    /// `setXxx` setter `supports` rejects.
    #[must_use]
    pub fn classify(key: &str, supports: impl Fn(&str) -> bool) -> Option<Self> {
        if let Some(k) = KEYWORD_KEYS.into_iter().find(|k| *k == key) {
            return Some(Self::Keyword(k));
        }
        let size = match key {
            "width" => Some(SizeProp::Width),
            "height" => Some(SizeProp::Height),
            "minWidth" => Some(SizeProp::MinWidth),
            "minHeight" => Some(SizeProp::MinHeight),
            "maxWidth" => Some(SizeProp::MaxWidth),
            "maxHeight" => Some(SizeProp::MaxHeight),
            "flexBasis" => Some(SizeProp::FlexBasis),
            _ => None,
        };
        if let Some(prop) = size {
            return Some(Self::Size(prop));
        }
        if matches!(key, "gap" | "rowGap" | "columnGap") {
            return Some(Self::Gap);
        }
        if let Some(group) = EdgeGroup::ALL.into_iter().find(|g| g.owns(key)) {
            return Some(Self::Edge(group));
        }
        if NON_LAYOUT.contains(&key) || crate::props::keys::is_text_key(key) {
            return None;
        }
        let setter = setter_name(key);
        supports(&setter).then_some(Self::Scalar(setter))
    }
}

/// `flexGrow` → `setFlexGrow`.
#[must_use]
pub fn setter_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "set".into(),
    }
}

/// Parses a dimension value for `key`.
pub fn parse_dimension(key: &str, value: &Literal, allow_auto: bool) -> Result<Dimension, SurfaceError> {
    match value {
        Literal::Number(n) => Ok(Dimension::Points(*n)),
        Literal::Text(s) | Literal::Keyword(s) => {
            let s = s.trim();
            if s == "auto" && allow_auto {
                Ok(Dimension::Auto)
            } else if let Some(pct) = s.strip_suffix('%') {
                pct.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite())
                    .map(|p| Dimension::Percent(p / 100.0))
                    .ok_or_else(|| {
                        ConfigurationError::UnresolvablePercentage {
                            key: key.into(),
                            value: s.into(),
                        }
                        .into()
                    })
            } else {
                Err(SurfaceError::invalid(key, value))
            }
        }
        _ => Err(SurfaceError::invalid(key, value)),
    }
}

fn keyword<T>(key: &str, value: &Literal, parse: fn(&str) -> Option<T>) -> Result<T, SurfaceError> {
    value
        .as_str()
        .and_then(parse)
        .ok_or_else(|| SurfaceError::invalid(key, value))
}

/// Optional keyword where `"auto"` means the solver default.
fn auto_keyword<T>(
    key: &str,
    value: &Literal,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, SurfaceError> {
    if value.as_str() == Some("auto") {
        return Ok(None);
    }
    keyword(key, value, parse).map(Some)
}

fn translate_keyword(key: &str, value: Option<&Literal>) -> Result<LayoutCommand, SurfaceError> {
    use LayoutCommand as C;
    let Some(v) = value else {
        return Ok(match key {
            "display" => C::Display(DisplayMode::Flex),
            "position" => C::Position(PositionType::Relative),
            "flexDirection" => C::FlexDirection(FlexDirection::Row),
            "flexWrap" => C::FlexWrap(FlexWrap::NoWrap),
            "justifyContent" => C::JustifyContent(None),
            "alignItems" => C::AlignItems(None),
            "alignSelf" => C::AlignSelf(None),
            "alignContent" => C::AlignContent(None),
            _ => C::Overflow(OverflowMode::Visible),
        });
    };
    Ok(match key {
        "display" => C::Display(keyword(key, v, DisplayMode::parse)?),
        "position" => C::Position(keyword(key, v, PositionType::parse)?),
        "flexDirection" => C::FlexDirection(keyword(key, v, FlexDirection::parse)?),
        "flexWrap" => C::FlexWrap(keyword(key, v, FlexWrap::parse)?),
        "justifyContent" => C::JustifyContent(Some(keyword(key, v, JustifyContent::parse)?)),
        "alignItems" => C::AlignItems(auto_keyword(key, v, Align::parse)?),
        "alignSelf" => C::AlignSelf(auto_keyword(key, v, Align::parse)?),
        "alignContent" => C::AlignContent(Some(keyword(key, v, AlignContent::parse)?)),
        _ => C::Overflow(keyword(key, v, OverflowMode::parse)?),
    })
}

fn translate_edges(
    group: EdgeGroup,
    live: &dyn Fn(&str) -> Option<Literal>,
    out: &mut Vec<LayoutCommand>,
) -> Result<(), SurfaceError> {
    for edge in Edge::ALL {
        let candidates = [group.edge_key(edge), group.axis_key(edge), group.base().into()];
        let mut value = group.default_value();
        for key in &candidates {
            if let Some(v) = live(key) {
                value = parse_dimension(key, &v, group.accepts_auto())?;
                break;
            }
        }
        out.push(LayoutCommand::Edge(group, edge, value));
    }
    Ok(())
}

fn translate_gaps(
    live: &dyn Fn(&str) -> Option<Literal>,
    out: &mut Vec<LayoutCommand>,
) -> Result<(), SurfaceError> {
    for (axis, key) in [(GapAxis::Row, "rowGap"), (GapAxis::Column, "columnGap")] {
        let value = match live(key).map(|v| (key, v)).or_else(|| live("gap").map(|v| ("gap", v))) {
            Some((k, v)) => parse_dimension(k, &v, false)?,
            None => Dimension::Points(0.0),
        };
        out.push(LayoutCommand::Gap(axis, value));
    }
    Ok(())
}

/// Translates a set of changed keys into commands.
///
/// `live` returns the current value of any key (tween value first);
/// `supports` reports the solver's pass-through setters. Non-layout keys are
/// ignored. Edge groups and gaps are emitted once however many of their keys
/// changed.
pub fn translate<'k>(
    keys: impl IntoIterator<Item = &'k str>,
    live: &dyn Fn(&str) -> Option<Literal>,
    supports: &dyn Fn(&str) -> bool,
) -> Result<Vec<LayoutCommand>, SurfaceError> {
    let mut out = Vec::new();
    let mut groups = BTreeSet::new();
    let mut gaps = false;
    for key in keys {
        match LayoutKey::classify(key, supports) {
            None => {}
            Some(LayoutKey::Keyword(k)) => out.push(translate_keyword(k, live(k).as_ref())?),
            Some(LayoutKey::Size(prop)) => {
                let value = match live(key) {
                    Some(v) => parse_dimension(key, &v, true)?,
                    None => Dimension::Auto,
                };
                out.push(LayoutCommand::Size(prop, value));
            }
            Some(LayoutKey::Edge(group)) => {
                groups.insert(group);
            }
            Some(LayoutKey::Gap) => gaps = true,
            Some(LayoutKey::Scalar(setter)) => {
                let value = match live(key) {
                    Some(Literal::Number(n)) => Some(n),
                    Some(other) => return Err(SurfaceError::invalid(key, other)),
                    None => None,
                };
                out.push(LayoutCommand::Scalar { setter, value });
            }
        }
    }
    for group in groups {
        translate_edges(group, live, &mut out)?;
    }
    if gaps {
        translate_gaps(live, &mut out)?;
    }
    Ok(out)
}
