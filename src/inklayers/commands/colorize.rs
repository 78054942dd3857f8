use crate::commands::{base_name, CmdMessage, CmdResult};
use crate::error::Result;
use crate::image::Image;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ColorizeOptions {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub fill_opacity: Option<f64>,
    pub stroke_opacity: Option<f64>,
    /// Set properties even where the object has none (or `none`)
    pub force: bool,
    /// Include sublayers of the target layer
    pub recursive: bool,
    /// Defaults to `{stem}_colorized.svg` next to the input
    pub output: Option<PathBuf>,
}

impl ColorizeOptions {
    fn is_empty(&self) -> bool {
        self.fill.is_none()
            && self.stroke.is_none()
            && self.fill_opacity.is_none()
            && self.stroke_opacity.is_none()
    }
}

pub fn run(file: &Path, layer_path: &str, options: &ColorizeOptions) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if options.is_empty() {
        result.add_message(CmdMessage::warning(
            "Nothing to change: pass --fill, --stroke, --fill-opacity or --stroke-opacity",
        ));
        return Ok(result);
    }

    let mut image = Image::load_from_file(file)?;
    {
        let mut layer = image.layer_mut(layer_path)?;
        if let Some(color) = &options.fill {
            layer.set_fill_color(color, options.force, options.recursive);
        }
        if let Some(color) = &options.stroke {
            layer.set_stroke_color(color, options.force, options.recursive);
        }
        if let Some(opacity) = options.fill_opacity {
            layer.set_fill_opacity(opacity, options.force, options.recursive)?;
        }
        if let Some(opacity) = options.stroke_opacity {
            layer.set_stroke_opacity(opacity, options.force, options.recursive)?;
        }
    }

    let output = options.output.clone().unwrap_or_else(|| default_output(file));
    image.save(&output)?;

    result.add_message(CmdMessage::success(format!(
        "Colorized {} in {}, wrote {}",
        layer_path,
        file.display(),
        output.display()
    )));
    Ok(result.with_written_files(vec![output]))
}

fn default_output(file: &Path) -> PathBuf {
    let name = format!("{}_colorized.svg", base_name(file));
    match file.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::DocumentError;
    use crate::test_utils::{fill_of, style_value, FACE_SVG};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("face.svg");
        fs::write(&file, FACE_SVG).unwrap();
        (dir, file)
    }

    fn fill(color: &str) -> ColorizeOptions {
        ColorizeOptions {
            fill: Some(color.to_string()),
            ..ColorizeOptions::default()
        }
    }

    #[test]
    fn writes_next_to_the_input_by_default() {
        let (dir, file) = setup();
        let result = run(&file, "/face/mouth", &fill("#FF0000")).unwrap();

        let output = dir.path().join("face_colorized.svg");
        assert_eq!(result.written_files, vec![output.clone()]);
        let image = Image::load_from_file(&output).unwrap();
        assert_eq!(fill_of(&image, "/face/mouth", "lips"), Some("#FF0000".into()));
        // input untouched
        assert_eq!(fs::read_to_string(&file).unwrap(), FACE_SVG);
    }

    #[test]
    fn recursive_and_force_reach_every_object() {
        let (dir, file) = setup();
        let output = dir.path().join("out/face.svg");
        let options = ColorizeOptions {
            fill: Some("#00FF00".into()),
            stroke_opacity: Some(0.5),
            force: true,
            recursive: true,
            output: Some(output.clone()),
            ..ColorizeOptions::default()
        };
        run(&file, "/face", &options).unwrap();

        let image = Image::load_from_file(&output).unwrap();
        assert_eq!(fill_of(&image, "/face/nose", "nose_tip"), Some("#00FF00".into()));
        assert_eq!(
            style_value(&image, "/face/eyes/left", "eye_left", "stroke-opacity"),
            Some("0.5".into())
        );
        assert_eq!(fill_of(&image, "/outline", "contour"), Some("none".into()));
    }

    #[test]
    fn nothing_requested_is_a_warning() {
        let (dir, file) = setup();
        let result = run(&file, "/face", &ColorizeOptions::default()).unwrap();
        assert!(result.written_files.is_empty());
        assert!(matches!(result.messages[0].level, MessageLevel::Warning));
        assert!(!dir.path().join("face_colorized.svg").exists());
    }

    #[test]
    fn unknown_layer_fails() {
        let (_dir, file) = setup();
        let err = run(&file, "/hair", &fill("#FF0000")).unwrap_err();
        assert!(err.is_unknown_layer());
    }

    #[test]
    fn out_of_range_opacity_fails() {
        let (dir, file) = setup();
        let options = ColorizeOptions {
            fill_opacity: Some(1.5),
            ..ColorizeOptions::default()
        };
        let err = run(&file, "/face", &options).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidOpacity(_)));
        assert!(!dir.path().join("face_colorized.svg").exists());
    }
}
