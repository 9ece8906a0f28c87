// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout: the solver contract and the property translator.
//!
//! Surfaces describe layout with string-keyed properties (`flexDirection`,
//! `width`, `marginTop`, ...). The [`translate`] module turns those into
//! solver-neutral [`LayoutCommand`]s, and a [`LayoutSolver`] applies them to
//! its own node tree. The tree keeps one solver node per surface and mirrors
//! child order into the solver on every structural mutation.
//!
//! [`TaffySolver`] is the shipped solver, backed by `taffy`'s flexbox
//! implementation.

use kurbo::{Rect, Size};

use crate::error::LayoutError;

mod flex;
mod measure;
pub mod translate;

pub use flex::TaffySolver;
pub use measure::TextMeasure;
pub use translate::{
    Align, AlignContent, Dimension, DisplayMode, Edge, EdgeGroup, FlexDirection, FlexWrap,
    GapAxis, JustifyContent, LayoutCommand, LayoutKey, OverflowMode, PositionType, SizeProp,
};

/// A handle to a node owned by a [`LayoutSolver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayoutNodeId(pub u64);

/// A constraint-based layout engine, driven by a
/// [`SurfaceTree`](crate::surface::SurfaceTree).
///
/// Computed boxes are relative to the node's parent.
pub trait LayoutSolver {
    /// Creates a detached node with default constraints.
    fn create_node(&mut self) -> Result<LayoutNodeId, LayoutError>;

    /// Inserts `child` under `parent` at `index`.
    fn insert_child_at(
        &mut self,
        parent: LayoutNodeId,
        child: LayoutNodeId,
        index: usize,
    ) -> Result<(), LayoutError>;

    /// Detaches `child` from `parent`.
    fn remove_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> Result<(), LayoutError>;

    /// Restores every constraint of `node` to its default.
    fn reset(&mut self, node: LayoutNodeId) -> Result<(), LayoutError>;

    /// Frees `node`. It must already be detached.
    fn release(&mut self, node: LayoutNodeId) -> Result<(), LayoutError>;

    /// Installs or clears the intrinsic-size measure of a leaf.
    fn set_measure(
        &mut self,
        node: LayoutNodeId,
        measure: Option<TextMeasure>,
    ) -> Result<(), LayoutError>;

    /// Applies one constraint command.
    fn apply(&mut self, node: LayoutNodeId, command: &LayoutCommand) -> Result<(), LayoutError>;

    /// Returns whether the solver understands the pass-through scalar setter
    /// `setter` (such as `setFlexGrow`).
    fn supports(&self, setter: &str) -> bool;

    /// Solves the tree under `root` for the given available space.
    fn calculate(&mut self, root: LayoutNodeId, available: Size) -> Result<(), LayoutError>;

    /// Returns the last computed box of `node`, relative to its parent.
    fn computed_box(&self, node: LayoutNodeId) -> Result<Rect, LayoutError>;

    /// Returns the children of `node`, in order.
    fn children(&self, node: LayoutNodeId) -> Result<Vec<LayoutNodeId>, LayoutError>;
}
