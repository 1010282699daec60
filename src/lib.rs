//! Multi-label segmentation masks for the manual annotation of 3D brain MRI volumes.
//!
//! A [`LabelMaskModel`] holds the labels of one subject while they are edited one label at a time.
//! A [`BrainSession`] binds it to the displayed plane and slice for a viewer, and moves label volumes
//! between storage ([`VolumeStore`], e.g. FreeSurfer MGH files) and automatic segmentation ([`AutoSegmenter`]).

pub mod config;
pub mod error;
pub mod fs_mgh;
pub mod known_labels;
pub mod label_mask;
pub mod segmenter;
pub mod session;
pub mod slice;
pub mod store;
pub mod util;
pub mod volume;

pub use config::SessionConfig;
pub use error::{BrainPaintError, Result};
pub use fs_mgh::{read_mgh, write_mgh, FsMgh, FsMghData, FsMghHeader};
pub use known_labels::{KnownLabels, BACKGROUND_LABEL};
pub use label_mask::{LabelMaskModel, SliceViews, DEFAULT_ACTIVE_LABEL};
pub use segmenter::{brain_mask, AutoSegmenter, Segmentation};
pub use session::BrainSession;
pub use slice::{project, voxel_for_click, Plane};
pub use store::{MghVolumeStore, VolumeStore};
pub use volume::{LabelVolume, Volume};
