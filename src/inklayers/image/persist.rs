use super::Image;
use crate::error::{DocumentError, Result};
use crate::model::ROOT_PATH;
use indexmap::IndexMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How [`Image::save_with`] decides whether to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode<'a> {
    Always,
    /// Write only when the output is missing or older than this input file.
    IfStale(&'a Path),
}

impl Image {
    pub fn to_svg_string(&self) -> String {
        self.markup.to_xml()
    }

    /// Writes the document to `path`, creating parent directories as needed.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(DocumentError::Io)?;
            }
        }
        fs::write(path, self.to_svg_string()).map_err(DocumentError::Io)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    /// Saves only if `output` is missing or `input` was modified after it.
    /// Returns whether a write happened.
    pub fn save_lazy<P: AsRef<Path>, Q: AsRef<Path>>(&self, output: P, input: Q) -> Result<bool> {
        let output = output.as_ref();
        if !needs_update(output, input.as_ref())? {
            log::info!("{} is up to date, skipping", output.display());
            return Ok(false);
        }
        self.save(output)?;
        Ok(true)
    }

    pub fn save_with<P: AsRef<Path>>(&self, path: P, mode: SaveMode<'_>) -> Result<bool> {
        match mode {
            SaveMode::Always => self.save(path).map(|_| true),
            SaveMode::IfStale(input) => self.save_lazy(path, input),
        }
    }

    /// Writes one path-preserving extraction per layer into `output_dir`,
    /// named after `base_name` and the layer path (see [`layer_file_name`]).
    ///
    /// Returns every layer path with its target file, whether or not the file
    /// had to be rewritten.
    pub fn extract_all_layers_to_file<P: AsRef<Path>>(
        &self,
        output_dir: P,
        base_name: &str,
        mode: SaveMode<'_>,
    ) -> Result<IndexMap<String, PathBuf>> {
        let output_dir = output_dir.as_ref();
        let mut written = IndexMap::new();

        for path in self.get_all_layer_paths() {
            let target = output_dir.join(layer_file_name(base_name, &path));
            if let SaveMode::IfStale(input) = mode {
                if !needs_update(&target, input)? {
                    log::info!("{} is up to date, skipping", target.display());
                    written.insert(path, target);
                    continue;
                }
            }
            self.extract_layer(&path, true)?.save(&target)?;
            written.insert(path, target);
        }

        Ok(written)
    }
}

/// `{base}.svg` for the root, `{base}_face_eyes.svg` for `/face/eyes`.
pub fn layer_file_name(base_name: &str, layer_path: &str) -> String {
    if layer_path == ROOT_PATH {
        format!("{}.svg", base_name)
    } else {
        format!("{}{}.svg", base_name, layer_path.replace('/', "_"))
    }
}

/// True when `output` does not exist or `input` is strictly newer.
pub fn needs_update(output: &Path, input: &Path) -> Result<bool> {
    let output_modified = match fs::metadata(output) {
        Ok(meta) => meta.modified()?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(DocumentError::Io(err)),
    };
    let input_modified = fs::metadata(input)?.modified()?;
    Ok(input_modified > output_modified)
}
