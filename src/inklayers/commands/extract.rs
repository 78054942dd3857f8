use crate::commands::{base_name, CmdMessage, CmdResult};
use crate::error::Result;
use crate::image::{layer_file_name, needs_update, Image, SaveMode};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Layers to combine into a single file per input. Empty means "every
    /// layer to its own file".
    pub layers: Vec<String>,
    pub preserve_layer_paths: bool,
    pub lazy: bool,
}

pub fn run(files: &[PathBuf], output_dir: &Path, options: &ExtractOptions) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for file in files {
        let image = Image::load_from_file(file)?;
        let mode = if options.lazy {
            SaveMode::IfStale(file.as_path())
        } else {
            SaveMode::Always
        };

        if options.layers.is_empty() {
            extract_every_layer(&image, file, output_dir, mode, &mut result)?;
        } else {
            extract_selection(&image, file, output_dir, mode, options, &mut result)?;
        }
    }

    Ok(result)
}

fn extract_every_layer(
    image: &Image,
    file: &Path,
    output_dir: &Path,
    mode: SaveMode<'_>,
    result: &mut CmdResult,
) -> Result<()> {
    let base = base_name(file);
    // counted up front, the returned map lists fresh targets too
    let stale = match mode {
        SaveMode::Always => None,
        SaveMode::IfStale(input) => {
            let mut count = 0;
            for path in image.get_all_layer_paths() {
                if needs_update(&output_dir.join(layer_file_name(&base, &path)), input)? {
                    count += 1;
                }
            }
            Some(count)
        }
    };

    let written = image.extract_all_layers_to_file(output_dir, &base, mode)?;
    let total = written.len();
    result.written_files.extend(written.into_values());

    let message = match stale {
        Some(0) => CmdMessage::info(format!(
            "{}: all {} layer files up to date",
            file.display(),
            total
        )),
        Some(count) => CmdMessage::success(format!(
            "{}: rewrote {} of {} layer files in {}",
            file.display(),
            count,
            total,
            output_dir.display()
        )),
        None => CmdMessage::success(format!(
            "{}: extracted {} layers to {}",
            file.display(),
            total,
            output_dir.display()
        )),
    };
    result.add_message(message);
    Ok(())
}

fn extract_selection(
    image: &Image,
    file: &Path,
    output_dir: &Path,
    mode: SaveMode<'_>,
    options: &ExtractOptions,
    result: &mut CmdResult,
) -> Result<()> {
    let target = output_dir.join(format!("{}_extracted.svg", base_name(file)));
    let extracted = image.extract_layers(&options.layers, options.preserve_layer_paths)?;

    if extracted.save_with(&target, mode)? {
        result.add_message(CmdMessage::success(format!(
            "{}: extracted {} to {}",
            file.display(),
            options.layers.join(", "),
            target.display()
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "{} is up to date",
            target.display()
        )));
    }
    result.written_files.push(target);
    Ok(())
}
