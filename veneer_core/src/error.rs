// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for surface tree operations.
//!
//! Every mutating operation on a [`SurfaceTree`](crate::surface::SurfaceTree)
//! returns `Result<_, SurfaceError>`. Errors propagate synchronously to the
//! caller; nothing is retried and no partial work is rolled back beyond what
//! the individual variants document.

use veneer_tween::TweenError;

/// Violations of the tree's structural invariants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// `remove_child` was called with a child whose parent is not the given
    /// parent.
    #[error("node is not a child of the given parent")]
    NotAChild,
    /// `insert_before` was called with a reference node that is not a child of
    /// the given parent.
    #[error("reference node is not a child of the given parent")]
    InvalidReference,
    /// Attaching the node would make it its own ancestor.
    #[error("attaching the node would create a cycle")]
    WouldCycle,
    /// The root cannot be attached, detached, or destroyed.
    #[error("the root surface cannot be moved or removed")]
    RootNotRemovable,
}

/// A property value that cannot be applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// A tween instruction resolved to neither a speed nor a duration.
    #[error("tween instruction for `{key}` has neither a speed nor a duration")]
    MissingDuration {
        /// The property the instruction targeted.
        key: String,
    },
    /// The value is not one the property accepts.
    #[error("invalid value `{value}` for property `{key}`")]
    InvalidPropertyValue {
        /// The property name.
        key: String,
        /// A rendering of the rejected value.
        value: String,
    },
    /// A percentage string could not be parsed.
    #[error("cannot resolve percentage `{value}` for property `{key}`")]
    UnresolvablePercentage {
        /// The property name.
        key: String,
        /// The rejected string.
        value: String,
    },
}

/// The layout solver rejected an operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("layout solver error: {0}")]
pub struct LayoutError(pub String);

/// Errors returned by surface tree operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// A structural invariant would be violated.
    #[error(transparent)]
    Structural(#[from] StructuralError),
    /// A property value could not be applied.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A property value matches no interpolable kind, or the kinds within one
    /// interpolation disagree.
    #[error("no arithmetic available for property `{key}`")]
    ArithmeticUnavailable {
        /// The property name.
        key: String,
    },
    /// The operation addressed a destroyed node.
    #[error("node has been destroyed")]
    StaleNode,
    /// The layout solver rejected an operation.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl SurfaceError {
    /// Converts a tween error raised while instructing `key`.
    pub(crate) fn from_tween(key: &str, err: TweenError) -> Self {
        match err {
            TweenError::MissingDuration => {
                ConfigurationError::MissingDuration { key: key.into() }.into()
            }
            TweenError::ArithmeticUnavailable { .. } => {
                Self::ArithmeticUnavailable { key: key.into() }
            }
        }
    }

    pub(crate) fn invalid(key: &str, value: impl core::fmt::Debug) -> Self {
        ConfigurationError::InvalidPropertyValue {
            key: key.into(),
            value: format!("{value:?}"),
        }
        .into()
    }
}
