//! Asset handles
//!
//! The runtime never parses asset files. Loaders outside the core hand
//! entities opaque handles; a behavior holding no handle simply draws nothing.

/// Handle to a texture already uploaded by the asset pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    id: u64,
    width: u32,
    height: u32,
}

impl TextureHandle {
    /// Create a handle for texture `id` with its pixel dimensions
    pub const fn new(id: u64, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// Backend identifier
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Handle to a mesh already uploaded by the asset pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);
