//! An annotation session on one loaded subject, as driven by a viewer.
//!
//! The session tracks which plane and slice are displayed, turns clicks on the displayed slice
//! into brush strokes on the active label, and moves label volumes between the
//! [`LabelMaskModel`] and storage or an automatic segmenter.

use ndarray::Array3;

use std::fmt;
use std::path::Path;

use crate::config::SessionConfig;
use crate::error::{BrainPaintError, Result};
use crate::label_mask::{LabelMaskModel, SliceViews};
use crate::segmenter::{brain_mask, AutoSegmenter};
use crate::slice::{voxel_for_click, Plane};
use crate::store::VolumeStore;
use crate::volume::{LabelVolume, Volume};

#[derive(Debug, Clone)]
pub struct BrainSession {
    model: LabelMaskModel,
    config: SessionConfig,
    plane: Plane,
    slice_index: usize,
}

impl BrainSession {

    /// Start a session on a subject. The middle slice of the configured initial plane is displayed.
    pub fn new(volume: Volume, labels: Option<&LabelVolume>, config: SessionConfig) -> Result<BrainSession> {
        let model = LabelMaskModel::ingest_with_default(volume, labels, config.default_label)?;
        let plane = config.initial_plane;
        let slice_index = plane.num_slices(model.shape()) / 2;
        Ok(BrainSession { model, config, plane, slice_index })
    }

    /// Load a subject, and optionally its labels, from storage and start a session on it.
    pub fn open<S: VolumeStore>(store: &mut S, path: &Path, label_path: Option<&Path>, config: SessionConfig) -> Result<BrainSession> {
        let (volume, labels) = store.load(path, label_path)?;
        BrainSession::new(volume, labels.as_ref(), config)
    }

    pub fn model(&self) -> &LabelMaskModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut LabelMaskModel {
        &mut self.model
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn slice_index(&self) -> usize {
        self.slice_index
    }

    /// Display another plane, starting at its middle slice.
    pub fn set_plane(&mut self, plane: Plane) {
        self.plane = plane;
        self.slice_index = plane.num_slices(self.model.shape()) / 2;
    }

    pub fn set_slice_index(&mut self, index: usize) -> Result<()> {
        let len = self.plane.num_slices(self.model.shape());
        if index >= len {
            return Err(BrainPaintError::SliceOutOfBounds(self.plane.axis(), index, len));
        }
        self.slice_index = index;
        Ok(())
    }

    /// The intensity, active mask and other labels slices currently displayed.
    pub fn current_slices(&self) -> Result<SliceViews> {
        self.model.slice(self.plane, self.slice_index)
    }

    /// The voxel shown at a pixel of the displayed slice.
    pub fn voxel_for_click(&self, click_x: usize, click_y: usize) -> Result<[usize; 3]> {
        voxel_for_click(self.plane, self.slice_index, click_x, click_y, self.model.shape())
    }

    /// Paint the configured square brush centered on a pixel of the displayed slice. Parts of the brush
    /// outside of the slice are dropped. Returns the number of voxels painted.
    pub fn paint_click(&mut self, click_x: usize, click_y: usize, value: u8) -> Result<usize> {
        self.voxel_for_click(click_x, click_y)?;

        let [rows, cols] = self.plane.slice_shape(self.model.shape());
        let size = self.config.brush_size.clamp(1, rows.max(cols).max(1));
        let half = (size - 1) / 2;
        let mut voxels: Vec<[usize; 3]> = Vec::with_capacity(size * size);
        for dx in 0..size {
            for dy in 0..size {
                let x = (click_x + dx).checked_sub(half);
                let y = (click_y + dy).checked_sub(half);
                if let (Some(x), Some(y)) = (x, y) {
                    if let Ok(voxel) = self.voxel_for_click(x, y) {
                        voxels.push(voxel);
                    }
                }
            }
        }
        Ok(self.model.paint(voxels, value))
    }

    pub fn switch_active_label(&mut self, label: i32) {
        self.model.switch_active_label(label);
    }

    /// Replace the labels of the subject with a label volume from storage.
    pub fn load_labels<S: VolumeStore>(&mut self, store: &mut S, path: &Path) -> Result<()> {
        let labels = store.load_label_volume(path)?;
        self.model.reload_labels(&labels)
    }

    /// Write all labels of the subject, including unsaved edits of the active label, to storage.
    pub fn save_labels<S: VolumeStore>(&self, store: &mut S, path: &Path) -> Result<()> {
        store.save_label_volume(path, &self.model.export_label_volume())
    }

    /// Replace the labels of the subject with the output of an automatic segmentation.
    pub fn auto_segment<A: AutoSegmenter>(&mut self, segmenter: &mut A) -> Result<()> {
        let segmentation = segmenter.infer(self.model.volume())?;
        let labels = segmentation.into_label_volume()?;
        self.model.reload_labels(&labels)?;
        log::info!("Applied automatic segmentation, known labels: {:?}.", self.model.known_labels().as_slice());
        Ok(())
    }

    /// Remove non-brain tissue from the intensity volume, given a per-voxel brain probability map.
    /// Voxels with a probability at or below the configured threshold are zeroed.
    pub fn strip_skull(&mut self, probabilities: &Array3<f32>) -> Result<()> {
        let shape = self.model.shape();
        if probabilities.shape() != &shape[..] {
            return Err(BrainPaintError::InvalidVolumeShape(shape, probabilities.shape().to_vec()));
        }
        let mask = brain_mask(probabilities, self.config.extraction_threshold);
        let stripped = self.model.volume().apply_mask(&mask);
        self.model.replace_volume(stripped)
    }
}

impl fmt::Display for BrainSession {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Showing slice {} of the {}. {}", self.slice_index, self.plane, self.model)
    }
}
