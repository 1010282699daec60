//! The multi-label segmentation state of one loaded subject.
//!
//! Manual annotation edits one label at a time. The voxels of the label currently being edited
//! live in the binary *active mask*, all other labelled voxels live in the *other labels* volume
//! with their true label code. For every voxel `v`, once an operation has settled:
//!
//! * `active_mask[v] == 1` if and only if the voxel carries the active label, and
//! * `other_labels[v]` is the voxel's label code, or `0` if it is background or carries the active label.
//!
//! Painting only touches the active mask. The other labels volume is updated when the active
//! label is switched, and [`LabelMaskModel::export_label_volume`] merges both for saving.

use ndarray::{Array2, Array3};

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{BrainPaintError, Result};
use crate::known_labels::{KnownLabels, BACKGROUND_LABEL};
use crate::slice::{project, Plane};
use crate::volume::{LabelVolume, Volume};

/// The label edited when nothing else is known.
pub const DEFAULT_ACTIVE_LABEL: i32 = 1;


/// The three aligned 2D views of a subject at one plane and slice index.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceViews {
    pub intensity: Array2<f32>,
    pub active_mask: Array2<u8>,
    pub other_labels: Array2<i32>,
}


/// Multi-label segmentation masks over an intensity volume.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMaskModel {
    volume: Volume,
    known_labels: KnownLabels,
    active_label: i32,
    multi_label: bool,
    active_mask: Array3<u8>,
    other_labels: Array3<i32>,
}


/// The dense state derived from a raw label volume.
struct IngestedLabels {
    known_labels: KnownLabels,
    active_label: i32,
    multi_label: bool,
    active_mask: Array3<u8>,
    other_labels: Array3<i32>,
}


impl IngestedLabels {

    fn empty(shape: [usize; 3], active_label: i32) -> IngestedLabels {
        IngestedLabels {
            known_labels: KnownLabels::default(),
            active_label,
            multi_label: false,
            active_mask: Array3::zeros(shape),
            other_labels: Array3::zeros(shape),
        }
    }

    /// Split a raw label volume into active mask and other labels.
    ///
    /// With a single foreground code, that code becomes the active label. With several,
    /// `preferred_label` stays active, even if no voxel carries it yet. Known labels are the codes
    /// present in the volume plus background, the active label joins them on the first switch to it.
    fn from_raw(raw: &LabelVolume, shape: [usize; 3], preferred_label: i32) -> Result<IngestedLabels> {
        if raw.shape() != &shape[..] {
            return Err(BrainPaintError::InvalidVolumeShape(shape, raw.shape().to_vec()));
        }

        let distinct: BTreeSet<i32> = raw.iter().copied().collect();
        let known_labels = KnownLabels::from_codes(distinct);
        let multi_label = known_labels.len() > 2;

        let active_label = if multi_label {
            preferred_label
        } else {
            known_labels.foreground().next().unwrap_or(preferred_label)
        };

        let mut active_mask = Array3::zeros(shape);
        let mut other_labels = Array3::zeros(shape);
        ndarray::azip!((m in &mut active_mask, o in &mut other_labels, &code in raw) {
            if code == active_label {
                *m = 1;
            } else {
                *o = code;
            }
        });

        Ok(IngestedLabels { known_labels, active_label, multi_label, active_mask, other_labels })
    }

    fn log(&self) {
        log::debug!(
            "Ingested labels {:?}, active label {}, multi-label: {}.",
            self.known_labels.as_slice(),
            self.active_label,
            self.multi_label
        );
    }
}


impl LabelMaskModel {

    /// Create the label state for a subject from its intensity volume and an optional raw label volume.
    ///
    /// Without labels, only the background is known and the active label is [`DEFAULT_ACTIVE_LABEL`].
    /// Fails with [`BrainPaintError::InvalidVolumeShape`] if the label volume does not match the volume shape.
    pub fn ingest(volume: Volume, raw_labels: Option<&LabelVolume>) -> Result<LabelMaskModel> {
        LabelMaskModel::ingest_with_default(volume, raw_labels, DEFAULT_ACTIVE_LABEL)
    }

    /// Like [`LabelMaskModel::ingest`], with `default_label` as the active label unless the label volume
    /// holds exactly one foreground code.
    pub fn ingest_with_default(volume: Volume, raw_labels: Option<&LabelVolume>, default_label: i32) -> Result<LabelMaskModel> {
        let shape = volume.shape();
        let labels = match raw_labels {
            Some(raw) => IngestedLabels::from_raw(raw, shape, default_label)?,
            None => IngestedLabels::empty(shape, default_label),
        };
        labels.log();
        Ok(LabelMaskModel {
            volume,
            known_labels: labels.known_labels,
            active_label: labels.active_label,
            multi_label: labels.multi_label,
            active_mask: labels.active_mask,
            other_labels: labels.other_labels,
        })
    }

    /// Replace all label state of the current subject with the given raw label volume, e.g. one loaded
    /// from a file or produced by an automatic segmentation. The current active label is kept if the
    /// volume holds several foreground labels.
    ///
    /// The model is left untouched if this fails.
    pub fn reload_labels(&mut self, raw_labels: &LabelVolume) -> Result<()> {
        let labels = IngestedLabels::from_raw(raw_labels, self.shape(), self.active_label)?;
        self.install(labels);
        Ok(())
    }

    /// Replace the intensity volume, e.g. after skull stripping. Labels are kept, so the shape must not change.
    pub fn replace_volume(&mut self, volume: Volume) -> Result<()> {
        if volume.shape() != self.shape() {
            return Err(BrainPaintError::InvalidVolumeShape(self.shape(), volume.shape().to_vec()));
        }
        self.volume = volume;
        Ok(())
    }

    fn install(&mut self, labels: IngestedLabels) {
        labels.log();
        self.known_labels = labels.known_labels;
        self.active_label = labels.active_label;
        self.multi_label = labels.multi_label;
        self.active_mask = labels.active_mask;
        self.other_labels = labels.other_labels;
    }


    /// Make `new_label` the label being edited. Unknown labels are created on demand, so this never fails.
    ///
    /// The voxels of the previously active label are folded back into the other labels volume before the
    /// mask of the new label is pulled out of it, so no voxel's label is lost across switches. Switching to
    /// the active label again leaves the state unchanged.
    pub fn switch_active_label(&mut self, new_label: i32) {
        let old_label = self.active_label;

        if self.known_labels.insert(new_label) {
            self.multi_label = true;
        }

        self.clip_active_mask();

        ndarray::azip!((o in &mut self.other_labels, &m in &self.active_mask) if m == 1 { *o = old_label });

        ndarray::azip!((m in &mut self.active_mask, o in &mut self.other_labels) {
            if *o == new_label {
                *m = 1;
                *o = BACKGROUND_LABEL;
            } else {
                *m = 0;
            }
        });

        self.active_label = new_label;
        log::debug!("Switched active label from {} to {}.", old_label, new_label);
    }

    /// Clamp the active mask to 0/1, painting tools may leave larger values behind.
    fn clip_active_mask(&mut self) {
        self.active_mask.mapv_inplace(|m| m.min(1));
    }


    /// Set the active mask to `value` (clamped to 0/1) at the given voxels. Voxels outside the
    /// volume are skipped. Returns the number of voxels painted.
    pub fn paint<I>(&mut self, voxels: I, value: u8) -> usize
    where
        I: IntoIterator<Item = [usize; 3]>,
    {
        let value = value.min(1);
        let mut painted = 0;
        for voxel in voxels {
            match self.active_mask.get_mut(voxel) {
                Some(m) => {
                    *m = value;
                    painted += 1;
                }
                None => log::warn!("Skipping paint outside of the volume at voxel {:?}.", voxel),
            }
        }
        painted
    }

    /// The aligned intensity, active mask and other labels slices at `index` of the given plane.
    pub fn slice(&self, plane: Plane, index: usize) -> Result<SliceViews> {
        Ok(SliceViews {
            intensity: project(self.volume.view(), plane, index)?,
            active_mask: project(self.active_mask.view(), plane, index)?.mapv(|m| m.min(1)),
            other_labels: project(self.other_labels.view(), plane, index)?,
        })
    }

    /// Merge active mask and other labels into a single label volume, the format written to storage.
    pub fn export_label_volume(&self) -> LabelVolume {
        let active_label = self.active_label;
        let mut exported = self.other_labels.clone();
        ndarray::azip!((e in &mut exported, &m in &self.active_mask) if m != 0 { *e = active_label });
        exported
    }


    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn shape(&self) -> [usize; 3] {
        self.volume.shape()
    }

    pub fn known_labels(&self) -> &KnownLabels {
        &self.known_labels
    }

    pub fn active_label(&self) -> i32 {
        self.active_label
    }

    /// Whether more than background and one foreground label are known.
    pub fn is_multi_label(&self) -> bool {
        self.multi_label
    }

    pub fn active_mask(&self) -> &Array3<u8> {
        &self.active_mask
    }

    /// Direct write access to the active mask for painting tools. Values above 1 are clamped on the next label switch.
    pub fn active_mask_mut(&mut self) -> &mut Array3<u8> {
        &mut self.active_mask
    }

    pub fn other_labels(&self) -> &Array3<i32> {
        &self.other_labels
    }
}

impl fmt::Display for LabelMaskModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Label masks with {} known labels, editing label {}.", self.known_labels.len(), self.active_label)
    }
}
