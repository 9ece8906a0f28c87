// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host bridge.
//!
//! A declarative host (a reconciler diffing component output) talks to the
//! tree through opaque [`HostHandle`]s and whole property bags. The
//! [`HostBridge`] translates that protocol into [`SurfaceTree`] calls:
//! handles resolve through the tree's registry, bag pairs become
//! [`PropertyDelta`]s, and the end of a commit flushes a zero-time frame pass
//! so the scene is consistent before the next tick.
//!
//! ```rust,ignore
//! let mut bridge = HostBridge::new(TaffySolver::new(), backend, FrameDriverConfig::desktop())?;
//! let card = bridge.create_instance(SurfaceKind::View, &props)?;
//! let label = bridge.create_text_instance("hello")?;
//! bridge.append_initial_child(card, label)?;
//! bridge.append_child_to_container(card)?;
//! bridge.reset_after_commit(&mut Tracer::none())?;
//! ```

use crate::backend::RenderBackend;
use crate::error::SurfaceError;
use crate::frame::{FrameDriver, FrameDriverConfig, FrameReport};
use crate::layout::LayoutSolver;
use crate::props::keys::TEXT_CONTENT;
use crate::props::{PropertyBag, PropertyDelta};
use crate::surface::{HostHandle, NodeId, SurfaceKind, SurfaceTree};
use crate::time::HostTime;
use crate::trace::Tracer;

/// Adapts a host diff engine's mutation protocol to a [`SurfaceTree`].
#[derive(Debug)]
pub struct HostBridge<S, B> {
    tree: SurfaceTree<S, B>,
    driver: FrameDriver,
}

impl<S: LayoutSolver, B: RenderBackend> HostBridge<S, B> {
    /// Creates a bridge over a fresh tree sized to `config.viewport`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Layout`] if the solver cannot create the root.
    pub fn new(solver: S, backend: B, config: FrameDriverConfig) -> Result<Self, SurfaceError> {
        Ok(Self {
            tree: SurfaceTree::new(solver, backend, config.viewport)?,
            driver: FrameDriver::new(config),
        })
    }

    /// The underlying tree.
    #[must_use]
    pub fn tree(&self) -> &SurfaceTree<S, B> {
        &self.tree
    }

    /// The underlying tree, mutably.
    #[must_use]
    pub fn tree_mut(&mut self) -> &mut SurfaceTree<S, B> {
        &mut self.tree
    }

    /// The frame driver.
    #[must_use]
    pub fn driver(&self) -> &FrameDriver {
        &self.driver
    }

    /// The handle of the root container.
    #[must_use]
    pub fn root_handle(&self) -> HostHandle {
        self.tree.handle(self.tree.root())
    }

    /// Creates a detached surface with an initial property bag.
    ///
    /// # Errors
    ///
    /// Any error [`SurfaceTree::update_props`] raises for `props`. The
    /// half-built surface is destroyed before returning.
    pub fn create_instance(
        &mut self,
        kind: SurfaceKind,
        props: &PropertyBag,
    ) -> Result<HostHandle, SurfaceError> {
        let id = self.tree.create_node(kind)?;
        let delta = PropertyDelta::between(&PropertyBag::new(), props);
        if let Err(e) = self.tree.update_props(id, &delta) {
            self.tree.destroy_node(id)?;
            return Err(e);
        }
        Ok(self.tree.handle(id))
    }

    /// Creates a detached text surface holding `text`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Layout`] if the solver cannot create a node.
    pub fn create_text_instance(&mut self, text: &str) -> Result<HostHandle, SurfaceError> {
        let id = self.tree.create_node(SurfaceKind::Text)?;
        self.tree
            .update_props(id, &PropertyDelta::new().set(TEXT_CONTENT, text))?;
        Ok(self.tree.handle(id))
    }

    /// Appends a child while the parent is still being built.
    ///
    /// # Errors
    ///
    /// As [`SurfaceTree::append_child`].
    pub fn append_initial_child(
        &mut self,
        parent: HostHandle,
        child: HostHandle,
    ) -> Result<(), SurfaceError> {
        self.append_child(parent, child)
    }

    /// Computes the delta between two bags, or `None` if they are equal.
    #[must_use]
    pub fn prepare_update(&self, old: &PropertyBag, new: &PropertyBag) -> Option<PropertyDelta> {
        let delta = PropertyDelta::between(old, new);
        (!delta.is_empty()).then_some(delta)
    }

    /// Applies a delta from [`prepare_update`](Self::prepare_update).
    ///
    /// # Errors
    ///
    /// [`SurfaceError::StaleNode`] for an unknown handle, else as
    /// [`SurfaceTree::update_props`].
    pub fn commit_update(
        &mut self,
        handle: HostHandle,
        delta: &PropertyDelta,
    ) -> Result<(), SurfaceError> {
        let id = self.node(handle)?;
        self.tree.update_props(id, delta)
    }

    /// Replaces the content of a text surface.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::StaleNode`] for an unknown handle.
    pub fn commit_text_update(
        &mut self,
        handle: HostHandle,
        old: &str,
        new: &str,
    ) -> Result<(), SurfaceError> {
        let id = self.node(handle)?;
        if old == new {
            return Ok(());
        }
        self.tree
            .update_props(id, &PropertyDelta::new().set(TEXT_CONTENT, new))
    }

    /// Appends `child` to `parent`, moving it if attached.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::StaleNode`] for an unknown handle, else as
    /// [`SurfaceTree::append_child`].
    pub fn append_child(&mut self, parent: HostHandle, child: HostHandle) -> Result<(), SurfaceError> {
        let (p, c) = (self.node(parent)?, self.node(child)?);
        self.tree.append_child(p, c)
    }

    /// Inserts `child` into `parent` before `before`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::StaleNode`] for an unknown handle, else as
    /// [`SurfaceTree::insert_before`].
    pub fn insert_before(
        &mut self,
        parent: HostHandle,
        child: HostHandle,
        before: HostHandle,
    ) -> Result<(), SurfaceError> {
        let (p, c, b) = (self.node(parent)?, self.node(child)?, self.node(before)?);
        self.tree.insert_before(p, c, b)
    }

    /// Removes `child` from `parent` and destroys its subtree.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::StaleNode`] for an unknown handle, else as
    /// [`SurfaceTree::remove_child`].
    pub fn remove_child(&mut self, parent: HostHandle, child: HostHandle) -> Result<(), SurfaceError> {
        let (p, c) = (self.node(parent)?, self.node(child)?);
        self.tree.remove_child(p, c)
    }

    /// Appends `child` to the root container.
    ///
    /// # Errors
    ///
    /// As [`append_child`](Self::append_child).
    pub fn append_child_to_container(&mut self, child: HostHandle) -> Result<(), SurfaceError> {
        let c = self.node(child)?;
        self.tree.append_child(self.tree.root(), c)
    }

    /// Inserts `child` into the root container before `before`.
    ///
    /// # Errors
    ///
    /// As [`insert_before`](Self::insert_before).
    pub fn insert_in_container_before(
        &mut self,
        child: HostHandle,
        before: HostHandle,
    ) -> Result<(), SurfaceError> {
        let (c, b) = (self.node(child)?, self.node(before)?);
        self.tree.insert_before(self.tree.root(), c, b)
    }

    /// Removes `child` from the root container and destroys its subtree.
    ///
    /// # Errors
    ///
    /// As [`remove_child`](Self::remove_child).
    pub fn remove_child_from_container(&mut self, child: HostHandle) -> Result<(), SurfaceError> {
        let c = self.node(child)?;
        self.tree.remove_child(self.tree.root(), c)
    }

    /// Ends a host commit with a zero-time frame pass.
    ///
    /// # Errors
    ///
    /// As [`FrameDriver::flush`].
    pub fn reset_after_commit(&mut self, tracer: &mut Tracer<'_>) -> Result<FrameReport, SurfaceError> {
        self.driver.flush(&mut self.tree, tracer)
    }

    /// Runs a frame pass for a host tick.
    ///
    /// # Errors
    ///
    /// As [`FrameDriver::tick`].
    pub fn tick(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> Result<FrameReport, SurfaceError> {
        self.driver.tick(&mut self.tree, now, tracer)
    }

    fn node(&self, handle: HostHandle) -> Result<NodeId, SurfaceError> {
        self.tree.resolve(handle).ok_or(SurfaceError::StaleNode)
    }
}
