// Image handles and load state

use std::fmt;

/// Handle to an image registered with the [`ImageStore`](super::ImageStore)
///
/// Handles are handed out before decoding finishes, so holding one says
/// nothing about whether pixels are available yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(pub(crate) u32);

impl ImageHandle {
    /// Create a handle from a raw index
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image#{}", self.0)
    }
}

/// Decode progress of a registered image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Decode requested, completion not yet observed
    Pending,
    /// Pixels available
    Ready,
    /// Decode failed; the image stays transparent
    Failed,
}

/// Completion notification for an image decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEvent {
    Loaded {
        handle: ImageHandle,
        width: u32,
        height: u32,
    },
    Failed {
        handle: ImageHandle,
        reason: String,
    },
}

impl ImageEvent {
    /// Handle the event refers to
    pub fn handle(&self) -> ImageHandle {
        match self {
            ImageEvent::Loaded { handle, .. } | ImageEvent::Failed { handle, .. } => *handle,
        }
    }
}
