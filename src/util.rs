//! Utility functions used in all other brainpaint modules.

use std::path::Path;

/// Check whether the file extension ends with ".gz" or ".mgz", i.e., whether the file is GZip compressed.
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| {
            let name = a.to_string_lossy();
            name.ends_with(".gz") || name.ends_with(".mgz")
        })
        .unwrap_or(false)
}
