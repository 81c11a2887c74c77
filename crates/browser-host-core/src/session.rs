//! Session identity and creation descriptor types.

use serde::{Deserialize, Serialize};

/// Unique identifier for a rendering session.
///
/// Identifiers are assigned by the session factory at creation time and
/// remain stable for the session's lifetime. The registry never observes
/// two live sessions sharing one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(i32);

impl SessionId {
    /// Wrap a factory-assigned raw identifier.
    pub fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Get the raw identifier value.
    pub fn raw(&self) -> i32 {
        self.0
    }
}

impl From<i32> for SessionId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a frame within a session.
///
/// The dispatcher treats frames as opaque routing context; it never
/// dereferences them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(i64);

impl FrameId {
    /// Wrap a raw frame identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier value.
    pub fn raw(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for creating a new rendering session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// Initial URL to load
    pub url: String,
    /// Whether the session renders off-screen into a pixel buffer
    pub offscreen: bool,
    /// Whether the background is transparent
    pub transparent: bool,
}

impl Default for SessionDescriptor {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            offscreen: false,
            transparent: false,
        }
    }
}

impl SessionDescriptor {
    /// Create a descriptor for a windowed session loading the given URL.
    pub fn windowed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Create a descriptor for an off-screen rendered session.
    pub fn offscreen(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            offscreen: true,
            transparent: false,
        }
    }
}
