// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`LayoutSolver`] over `taffy`'s flexbox.

use std::fmt;

use kurbo::{Rect, Size};
use taffy::prelude::{AvailableSpace, NodeId, TaffyTree, auto, length, percent};
use taffy::style::{self, Style};

use super::translate::{
    Align, AlignContent, Dimension, DisplayMode, Edge, EdgeGroup, FlexDirection, FlexWrap,
    GapAxis, JustifyContent, LayoutCommand, OverflowMode, PositionType, SizeProp,
};
use super::{LayoutNodeId, LayoutSolver, TextMeasure};
use crate::error::LayoutError;

const SETTERS: [&str; 3] = ["setFlexGrow", "setFlexShrink", "setAspectRatio"];

/// A flexbox solver backed by a [`TaffyTree`].
///
/// Text leaves carry their [`TextMeasure`] as node context and are sized
/// through it during [`calculate`](LayoutSolver::calculate).
pub struct TaffySolver {
    tree: TaffyTree<TextMeasure>,
}

impl fmt::Debug for TaffySolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaffySolver")
            .field("nodes", &self.tree.total_node_count())
            .finish()
    }
}

impl Default for TaffySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TaffySolver {
    /// Creates an empty solver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
        }
    }

    /// Returns the number of live solver nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tree.total_node_count()
    }

    fn update_style(
        &mut self,
        node: LayoutNodeId,
        f: impl FnOnce(&mut Style),
    ) -> Result<(), LayoutError> {
        let id = NodeId::from(node.0);
        let mut s = self.tree.style(id).map_err(err)?.clone();
        f(&mut s);
        self.tree.set_style(id, s).map_err(err)
    }
}

fn err(e: taffy::TaffyError) -> LayoutError {
    LayoutError(e.to_string())
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "layout runs in f32; surface coordinates stay well inside its range"
)]
fn f32_of(v: f64) -> f32 {
    v as f32
}

fn dimension(d: Dimension) -> style::Dimension {
    match d {
        Dimension::Points(v) => length(f32_of(v)),
        Dimension::Percent(v) => percent(f32_of(v)),
        Dimension::Auto => auto(),
    }
}

fn length_percentage_auto(d: Dimension) -> style::LengthPercentageAuto {
    match d {
        Dimension::Points(v) => length(f32_of(v)),
        Dimension::Percent(v) => percent(f32_of(v)),
        Dimension::Auto => auto(),
    }
}

/// `Auto` never reaches here; the translator rejects it for these edges.
fn length_percentage(d: Dimension) -> style::LengthPercentage {
    match d {
        Dimension::Points(v) => length(f32_of(v)),
        Dimension::Percent(v) => percent(f32_of(v)),
        Dimension::Auto => length(0.0),
    }
}

fn align(a: Align) -> style::AlignItems {
    match a {
        Align::FlexStart => style::AlignItems::FlexStart,
        Align::FlexEnd => style::AlignItems::FlexEnd,
        Align::Center => style::AlignItems::Center,
        Align::Stretch => style::AlignItems::Stretch,
        Align::Baseline => style::AlignItems::Baseline,
    }
}

fn justify(j: JustifyContent) -> style::JustifyContent {
    match j {
        JustifyContent::FlexStart => style::JustifyContent::FlexStart,
        JustifyContent::FlexEnd => style::JustifyContent::FlexEnd,
        JustifyContent::Center => style::JustifyContent::Center,
        JustifyContent::SpaceBetween => style::JustifyContent::SpaceBetween,
        JustifyContent::SpaceAround => style::JustifyContent::SpaceAround,
        JustifyContent::SpaceEvenly => style::JustifyContent::SpaceEvenly,
    }
}

fn align_content(a: AlignContent) -> style::AlignContent {
    match a {
        AlignContent::FlexStart => style::AlignContent::FlexStart,
        AlignContent::FlexEnd => style::AlignContent::FlexEnd,
        AlignContent::Center => style::AlignContent::Center,
        AlignContent::Stretch => style::AlignContent::Stretch,
        AlignContent::SpaceBetween => style::AlignContent::SpaceBetween,
        AlignContent::SpaceAround => style::AlignContent::SpaceAround,
        AlignContent::SpaceEvenly => style::AlignContent::SpaceEvenly,
    }
}

fn overflow(o: OverflowMode) -> style::Overflow {
    match o {
        OverflowMode::Visible => style::Overflow::Visible,
        OverflowMode::Hidden => style::Overflow::Hidden,
        OverflowMode::Scroll => style::Overflow::Scroll,
        OverflowMode::Clip => style::Overflow::Clip,
    }
}

fn apply_command(s: &mut Style, command: &LayoutCommand) {
    match command {
        LayoutCommand::Display(d) => {
            s.display = match d {
                DisplayMode::Flex => style::Display::Flex,
                DisplayMode::None => style::Display::None,
            };
        }
        LayoutCommand::Position(p) => {
            s.position = match p {
                PositionType::Relative => style::Position::Relative,
                PositionType::Absolute => style::Position::Absolute,
            };
        }
        LayoutCommand::FlexDirection(d) => {
            s.flex_direction = match d {
                FlexDirection::Row => style::FlexDirection::Row,
                FlexDirection::RowReverse => style::FlexDirection::RowReverse,
                FlexDirection::Column => style::FlexDirection::Column,
                FlexDirection::ColumnReverse => style::FlexDirection::ColumnReverse,
            };
        }
        LayoutCommand::FlexWrap(w) => {
            s.flex_wrap = match w {
                FlexWrap::NoWrap => style::FlexWrap::NoWrap,
                FlexWrap::Wrap => style::FlexWrap::Wrap,
                FlexWrap::WrapReverse => style::FlexWrap::WrapReverse,
            };
        }
        LayoutCommand::JustifyContent(j) => s.justify_content = j.map(justify),
        LayoutCommand::AlignItems(a) => s.align_items = a.map(align),
        LayoutCommand::AlignSelf(a) => s.align_self = a.map(align),
        LayoutCommand::AlignContent(a) => s.align_content = a.map(align_content),
        LayoutCommand::Overflow(o) => {
            s.overflow.x = overflow(*o);
            s.overflow.y = overflow(*o);
        }
        LayoutCommand::Size(prop, d) => {
            let d = dimension(*d);
            match prop {
                SizeProp::Width => s.size.width = d,
                SizeProp::Height => s.size.height = d,
                SizeProp::MinWidth => s.min_size.width = d,
                SizeProp::MinHeight => s.min_size.height = d,
                SizeProp::MaxWidth => s.max_size.width = d,
                SizeProp::MaxHeight => s.max_size.height = d,
                SizeProp::FlexBasis => s.flex_basis = d,
            }
        }
        LayoutCommand::Edge(group, edge, d) => match group {
            EdgeGroup::Margin | EdgeGroup::Inset => {
                let rect = if *group == EdgeGroup::Margin {
                    &mut s.margin
                } else {
                    &mut s.inset
                };
                let v = length_percentage_auto(*d);
                match edge {
                    Edge::Top => rect.top = v,
                    Edge::Right => rect.right = v,
                    Edge::Bottom => rect.bottom = v,
                    Edge::Left => rect.left = v,
                }
            }
            EdgeGroup::Padding | EdgeGroup::Border => {
                let rect = if *group == EdgeGroup::Padding {
                    &mut s.padding
                } else {
                    &mut s.border
                };
                let v = length_percentage(*d);
                match edge {
                    Edge::Top => rect.top = v,
                    Edge::Right => rect.right = v,
                    Edge::Bottom => rect.bottom = v,
                    Edge::Left => rect.left = v,
                }
            }
        },
        LayoutCommand::Gap(axis, d) => match axis {
            GapAxis::Row => s.gap.height = length_percentage(*d),
            GapAxis::Column => s.gap.width = length_percentage(*d),
        },
        LayoutCommand::Scalar { setter, value } => match setter.as_str() {
            "setFlexGrow" => s.flex_grow = value.map_or(0.0, f32_of),
            "setFlexShrink" => s.flex_shrink = value.map_or(1.0, f32_of),
            "setAspectRatio" => s.aspect_ratio = value.map(f32_of),
            _ => {}
        },
    }
}

impl LayoutSolver for TaffySolver {
    fn create_node(&mut self) -> Result<LayoutNodeId, LayoutError> {
        let id = self.tree.new_leaf(Style::default()).map_err(err)?;
        Ok(LayoutNodeId(id.into()))
    }

    fn insert_child_at(
        &mut self,
        parent: LayoutNodeId,
        child: LayoutNodeId,
        index: usize,
    ) -> Result<(), LayoutError> {
        let parent = NodeId::from(parent.0);
        let count = self.tree.child_count(parent);
        self.tree
            .insert_child_at_index(parent, index.min(count), NodeId::from(child.0))
            .map_err(err)
    }

    fn remove_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> Result<(), LayoutError> {
        self.tree
            .remove_child(NodeId::from(parent.0), NodeId::from(child.0))
            .map(|_| ())
            .map_err(err)
    }

    fn reset(&mut self, node: LayoutNodeId) -> Result<(), LayoutError> {
        let id = NodeId::from(node.0);
        self.tree.set_style(id, Style::default()).map_err(err)?;
        self.tree.set_node_context(id, None).map_err(err)
    }

    fn release(&mut self, node: LayoutNodeId) -> Result<(), LayoutError> {
        self.tree.remove(NodeId::from(node.0)).map(|_| ()).map_err(err)
    }

    fn set_measure(
        &mut self,
        node: LayoutNodeId,
        measure: Option<TextMeasure>,
    ) -> Result<(), LayoutError> {
        let id = NodeId::from(node.0);
        self.tree.set_node_context(id, measure).map_err(err)?;
        self.tree.mark_dirty(id).map_err(err)
    }

    fn apply(&mut self, node: LayoutNodeId, command: &LayoutCommand) -> Result<(), LayoutError> {
        self.update_style(node, |s| apply_command(s, command))
    }

    fn supports(&self, setter: &str) -> bool {
        SETTERS.contains(&setter)
    }

    fn calculate(&mut self, root: LayoutNodeId, available: Size) -> Result<(), LayoutError> {
        let space = taffy::geometry::Size {
            width: AvailableSpace::Definite(f32_of(available.width)),
            height: AvailableSpace::Definite(f32_of(available.height)),
        };
        self.tree
            .compute_layout_with_measure(
                NodeId::from(root.0),
                space,
                |known, avail, _node, ctx, _style| {
                    let Some(measure) = ctx else {
                        return taffy::geometry::Size {
                            width: known.width.unwrap_or(0.0),
                            height: known.height.unwrap_or(0.0),
                        };
                    };
                    let width = match avail.width {
                        AvailableSpace::Definite(w) => Some(f64::from(w)),
                        _ => None,
                    };
                    let size = measure.measure(
                        (known.width.map(f64::from), known.height.map(f64::from)),
                        width,
                    );
                    taffy::geometry::Size {
                        width: f32_of(size.width),
                        height: f32_of(size.height),
                    }
                },
            )
            .map_err(err)
    }

    fn computed_box(&self, node: LayoutNodeId) -> Result<Rect, LayoutError> {
        let layout = self.tree.layout(NodeId::from(node.0)).map_err(err)?;
        let x = f64::from(layout.location.x);
        let y = f64::from(layout.location.y);
        Ok(Rect::new(
            x,
            y,
            x + f64::from(layout.size.width),
            y + f64::from(layout.size.height),
        ))
    }

    fn children(&self, node: LayoutNodeId) -> Result<Vec<LayoutNodeId>, LayoutError> {
        Ok(self
            .tree
            .children(NodeId::from(node.0))
            .map_err(err)?
            .into_iter()
            .map(|id| LayoutNodeId(id.into()))
            .collect())
    }
}
