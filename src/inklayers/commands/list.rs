use crate::commands::{CmdResult, ListedLayers};
use crate::error::Result;
use crate::image::Image;
use std::path::PathBuf;

/// Loads every file and lists its layer paths, in argument order.
pub fn run(files: &[PathBuf]) -> Result<CmdResult> {
    let listed = files
        .iter()
        .map(|file| {
            let image = Image::load_from_file(file)?;
            Ok(ListedLayers {
                file: file.clone(),
                layers: image.get_all_layer_paths(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CmdResult::default().with_listed_layers(listed))
}
