//! # Image
//!
//! An [`Image`] is a loaded document: the root [`Layer`] (path `/`) together
//! with the [`Markup`] arena it indexes into.
//!
//! Everything that reads the tree borrows the image immutably. Style edits go
//! through [`LayerMut`] / [`ObjectMut`], short-lived handles pairing a model
//! node with mutable access to the markup. Structural edits (extraction) never
//! touch `self`: they clone the image first and reshape the clone, see
//! [`extract`].
//!
//! Cloning an `Image` copies the arena by value, so the clone shares no
//! mutable state with its source.

use crate::error::{DocumentError, Result};
use crate::markup::Markup;
use crate::model::{format_opacity, Container, Layer, Object};
use crate::style::{Property, Style};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod extract;
pub mod persist;

pub use persist::{layer_file_name, needs_update, SaveMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    root: Layer,
    markup: Markup,
    source: Option<PathBuf>,
}

impl Image {
    pub fn from_markup(markup: Markup) -> Result<Self> {
        let root = Layer::parse(&markup, markup.root(), None)?;
        Ok(Self {
            root,
            markup,
            source: None,
        })
    }

    pub fn load_from_str(text: &str) -> Result<Self> {
        Self::from_markup(Markup::parse(text)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(DocumentError::Io)?;
        let mut image = Self::load_from_str(&text)?;
        image.source = Some(path.to_path_buf());
        log::debug!(
            "loaded {} ({} layers)",
            path.display(),
            image.get_all_layer_paths().len()
        );
        Ok(image)
    }

    /// File the image was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn root(&self) -> &Layer {
        &self.root
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    pub fn get_layer_by_path(&self, path: &str) -> Result<&Layer> {
        self.root.get_layer_by_path(path)
    }

    pub fn find_layers_by_name(&self, name: &str) -> Vec<&Layer> {
        self.root.find_layers_by_name(name)
    }

    pub fn find_first_layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.root.find_first_layer_by_name(name)
    }

    pub fn get_all_layer_paths(&self) -> Vec<String> {
        self.root.get_all_layer_paths()
    }

    pub fn structure(&self) -> String {
        self.root.structure()
    }

    pub fn layer_mut(&mut self, path: &str) -> Result<LayerMut<'_>> {
        let layer = self.root.get_layer_by_path(path)?;
        Ok(LayerMut {
            layer,
            markup: &mut self.markup,
        })
    }

    pub fn root_mut(&mut self) -> LayerMut<'_> {
        LayerMut {
            layer: &self.root,
            markup: &mut self.markup,
        }
    }
}

impl FromStr for Image {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::load_from_str(s)
    }
}

/// A layer of an [`Image`] opened for style edits.
#[derive(Debug)]
pub struct LayerMut<'a> {
    layer: &'a Layer,
    markup: &'a mut Markup,
}

impl<'a> LayerMut<'a> {
    pub fn layer(&self) -> &Layer {
        self.layer
    }

    pub fn set_fill_color(&mut self, color: &str, force: bool, recursive: bool) {
        self.layer
            .set_property(self.markup, Property::Fill, color, force, recursive);
    }

    pub fn set_stroke_color(&mut self, color: &str, force: bool, recursive: bool) {
        self.layer
            .set_property(self.markup, Property::Stroke, color, force, recursive);
    }

    pub fn set_fill_opacity(&mut self, opacity: f64, force: bool, recursive: bool) -> Result<()> {
        let value = format_opacity(opacity)?;
        self.layer.set_property(
            self.markup,
            Property::FillOpacity,
            &value,
            force,
            recursive,
        );
        Ok(())
    }

    pub fn set_stroke_opacity(&mut self, opacity: f64, force: bool, recursive: bool) -> Result<()> {
        let value = format_opacity(opacity)?;
        self.layer.set_property(
            self.markup,
            Property::StrokeOpacity,
            &value,
            force,
            recursive,
        );
        Ok(())
    }

    pub fn set_visible(&mut self, visible: bool, recursive: bool) {
        self.layer.set_visible(self.markup, visible, recursive);
    }

    /// Opens a sublayer, with `path` relative to this layer.
    pub fn sublayer(&mut self, path: &str) -> Result<LayerMut<'_>> {
        let layer = self.layer.get_layer_by_path(path)?;
        Ok(LayerMut {
            layer,
            markup: &mut *self.markup,
        })
    }

    /// Opens one of this layer's direct objects.
    pub fn object_mut(&mut self, id: &str) -> Option<ObjectMut<'_>> {
        let object = self.layer.object(id)?;
        Some(ObjectMut {
            object,
            markup: &mut *self.markup,
        })
    }
}

/// A single object opened for style edits.
pub struct ObjectMut<'a> {
    object: &'a Object,
    markup: &'a mut Markup,
}

impl<'a> ObjectMut<'a> {
    pub fn object(&self) -> &Object {
        self.object
    }

    pub fn style(&self) -> Option<Style> {
        self.object.style(&*self.markup)
    }

    pub fn set_fill_color(&mut self, color: &str, force: bool) {
        self.object.set_fill_color(self.markup, color, force);
    }

    pub fn set_stroke_color(&mut self, color: &str, force: bool) {
        self.object.set_stroke_color(self.markup, color, force);
    }

    pub fn set_fill_opacity(&mut self, opacity: f64, force: bool) -> Result<()> {
        self.object.set_fill_opacity(self.markup, opacity, force)
    }

    pub fn set_stroke_opacity(&mut self, opacity: f64, force: bool) -> Result<()> {
        self.object.set_stroke_opacity(self.markup, opacity, force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{face_image, fill_of, style_value, FACE_SVG};

    #[test]
    fn load_from_str_and_parse_agree() {
        let a = face_image();
        let b: Image = FACE_SVG.parse().unwrap();
        assert_eq!(a, b);
        assert!(a.source().is_none());
    }

    #[test]
    fn load_malformed_markup_fails() {
        assert!(matches!(
            Image::load_from_str("<svg><g></svg>"),
            Err(DocumentError::Parse(_))
        ));
    }

    #[test]
    fn load_missing_file_fails_with_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = Image::load_from_file(dir.path().join("missing.svg")).unwrap_err();
        assert!(matches!(err, DocumentError::Io(_)));
    }

    #[test]
    fn load_from_file_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.svg");
        fs::write(&path, FACE_SVG).unwrap();

        let image = Image::load_from_file(&path).unwrap();
        assert_eq!(image.source(), Some(path.as_path()));
        assert_eq!(image.get_all_layer_paths().len(), 9);
    }

    #[test]
    fn root_objects_include_defs_and_namedview() {
        let image = face_image();
        let ids: Vec<_> = image.root().objects().keys().collect();
        assert_eq!(ids, vec!["namedview1", "defs1"]);
    }

    #[test]
    fn unmodified_image_serializes_to_its_source() {
        let image = face_image();
        assert_eq!(image.to_svg_string(), FACE_SVG);
    }

    #[test]
    fn force_semantics_on_objects() {
        let mut image = face_image();
        {
            let mut outline = image.layer_mut("/outline").unwrap();
            outline.set_fill_color("#FF0000", false, false);
        }
        assert_eq!(fill_of(&image, "/outline", "contour"), Some("none".into()));

        image
            .layer_mut("/outline")
            .unwrap()
            .set_fill_color("#FF0000", true, false);
        assert_eq!(fill_of(&image, "/outline", "contour"), Some("#FF0000".into()));

        let mut mouth = image.layer_mut("/face/mouth").unwrap();
        let mut lips = mouth.object_mut("lips").unwrap();
        lips.set_fill_color("#FF0000", false);
        assert_eq!(lips.style().unwrap().get("fill"), Some("#FF0000"));
    }

    #[test]
    fn colorize_eyes_recursively() {
        let mut image = face_image();
        image
            .layer_mut("/face/eyes")
            .unwrap()
            .set_fill_color("#FF0000", false, true);

        assert_eq!(fill_of(&image, "/face/eyes", "brows"), Some("#FF0000".into()));
        assert_eq!(fill_of(&image, "/face/eyes/right", "eye_right"), Some("#FF0000".into()));
        assert_eq!(fill_of(&image, "/face/eyes/left", "eye_left"), Some("#FF0000".into()));
        assert_eq!(fill_of(&image, "/face", "head"), Some("#ffe0bd".into()));
        assert_eq!(fill_of(&image, "/face/nose", "nose_tip"), Some("none".into()));
    }

    #[test]
    fn opacity_edits_follow_force_policy() {
        let mut image = face_image();
        {
            let mut left = image.layer_mut("/face/eyes/left").unwrap();
            left.set_stroke_opacity(0.0, false, false).unwrap();
            left.set_fill_color("#000000", true, false);
        }
        {
            let mut mouth = image.layer_mut("/face/mouth").unwrap();
            mouth.set_stroke_opacity(0.0, false, false).unwrap();
        }
        image
            .layer_mut("/face")
            .unwrap()
            .set_fill_opacity(1.0, true, false)
            .unwrap();

        assert_eq!(style_value(&image, "/face/eyes/left", "eye_left", "stroke-opacity"), None);
        assert_eq!(fill_of(&image, "/face/eyes/left", "eye_left"), Some("#000000".into()));
        assert_eq!(
            style_value(&image, "/face/mouth", "lips", "stroke-opacity"),
            Some("0".into())
        );
        assert_eq!(style_value(&image, "/face", "head", "fill-opacity"), Some("1".into()));

        let cheeks = image.get_layer_by_path("/face").unwrap().group("cheeks").unwrap();
        let cheek = cheeks.object("cheek_left").unwrap();
        assert_eq!(
            cheek.style(image.markup()).unwrap().to_string(),
            "fill:#ff9999;fill-opacity:1"
        );
    }

    #[test]
    fn invalid_opacity_is_rejected() {
        let mut image = face_image();
        let err = image
            .root_mut()
            .set_fill_opacity(2.0, true, true)
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidOpacity(v) if v == 2.0));
        assert_eq!(image, face_image());
    }

    #[test]
    fn sublayer_handles_are_relative() {
        let mut image = face_image();
        let mut face = image.layer_mut("/face").unwrap();
        face.sublayer("/eyes/right")
            .unwrap()
            .set_stroke_color("#00FF00", false, false);
        assert!(face.sublayer("/ears").unwrap_err().is_unknown_layer());
        assert_eq!(
            style_value(&image, "/face/eyes/right", "eye_right", "stroke"),
            Some("#00FF00".into())
        );
    }

    #[test]
    fn layer_mut_on_unknown_path_fails() {
        let mut image = face_image();
        assert!(matches!(
            image.layer_mut("/not/existing"),
            Err(DocumentError::LayerUnknown(_))
        ));
    }
}
