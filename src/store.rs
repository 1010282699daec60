//! Loading subject volumes from storage and persisting edited label volumes.

use std::path::Path;

use crate::error::Result;
use crate::fs_mgh::{read_mgh, write_mgh, FsMghHeader};
use crate::volume::{LabelVolume, Volume};

/// Storage for the volumes of a subject. Orientation handling is the concern of the store, the
/// returned volumes are in the orientation used for display.
pub trait VolumeStore {
    /// Load the intensity volume of a subject.
    fn load_volume(&mut self, path: &Path) -> Result<Volume>;

    /// Load a label volume, `0` is background.
    fn load_label_volume(&mut self, path: &Path) -> Result<LabelVolume>;

    /// Persist a label volume.
    fn save_label_volume(&mut self, path: &Path, labels: &LabelVolume) -> Result<()>;

    /// Load the intensity volume and, if a label path is given, the label volume of a subject.
    fn load(&mut self, path: &Path, label_path: Option<&Path>) -> Result<(Volume, Option<LabelVolume>)> {
        let volume = self.load_volume(path)?;
        let labels = match label_path {
            Some(p) => Some(self.load_label_volume(p)?),
            None => None,
        };
        Ok((volume, labels))
    }
}


/// A [`VolumeStore`] for FreeSurfer MGH and MGZ files.
///
/// Only the first frame of 4D files is used. Label volumes are saved as MRI_INT, with the geometry of
/// the most recently loaded intensity volume.
#[derive(Debug, Clone, Default)]
pub struct MghVolumeStore {
    template: Option<FsMghHeader>,
}

impl MghVolumeStore {
    pub fn new() -> MghVolumeStore {
        MghVolumeStore::default()
    }

    /// The header of the most recently loaded intensity volume.
    pub fn template(&self) -> Option<&FsMghHeader> {
        self.template.as_ref()
    }
}

impl VolumeStore for MghVolumeStore {
    fn load_volume(&mut self, path: &Path) -> Result<Volume> {
        let mgh = read_mgh(path)?;
        log::info!("Loaded {} from '{}'.", mgh.header, path.display());
        let volume = Volume::from_raw(mgh.data.frame_f32(0));
        self.template = Some(mgh.header);
        Ok(volume)
    }

    fn load_label_volume(&mut self, path: &Path) -> Result<LabelVolume> {
        let mgh = read_mgh(path)?;
        log::info!("Loaded labels {} from '{}'.", mgh.header, path.display());
        Ok(mgh.data.frame_i32(0))
    }

    fn save_label_volume(&mut self, path: &Path, labels: &LabelVolume) -> Result<()> {
        write_mgh(path, labels, self.template.as_ref())?;
        log::info!("Saved labeled data to '{}'.", path.display());
        Ok(())
    }
}
