//! Settings of an annotation session.

use crate::label_mask::DEFAULT_ACTIVE_LABEL;
use crate::slice::Plane;

/// Settings of a [`BrainSession`](crate::BrainSession).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// The label edited after loading a subject without labels.
    pub default_label: i32,
    /// Edge length in voxels of the square brush used by [`BrainSession::paint_click`](crate::BrainSession::paint_click).
    pub brush_size: usize,
    /// Brain probability above which a voxel is kept by skull stripping.
    pub extraction_threshold: f32,
    /// The plane shown after loading a subject.
    pub initial_plane: Plane,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            default_label: DEFAULT_ACTIVE_LABEL,
            brush_size: 1,
            extraction_threshold: 0.5,
            initial_plane: Plane::Axial,
        }
    }
}
