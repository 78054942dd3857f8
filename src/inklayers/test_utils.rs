//! Fixtures shared by the unit tests.

use crate::image::Image;

/// Layers: `/background`, `/outline`, `/face`, `/face/mouth`, `/face/eyes`,
/// `/face/eyes/right`, `/face/eyes/left`, `/face/nose`.
pub(crate) const FACE_SVG: &str = include_str!("../../tests/fixtures/face.svg");

pub(crate) fn face_image() -> Image {
    let _ = env_logger::builder().is_test(true).try_init();
    Image::load_from_str(FACE_SVG).unwrap()
}

/// Fill value of an object on the given layer, if it has one.
pub(crate) fn fill_of(image: &Image, layer_path: &str, object_id: &str) -> Option<String> {
    style_value(image, layer_path, object_id, "fill")
}

pub(crate) fn style_value(
    image: &Image,
    layer_path: &str,
    object_id: &str,
    key: &str,
) -> Option<String> {
    use crate::model::Container;

    let layer = image.get_layer_by_path(layer_path).unwrap();
    let object = layer.object(object_id).unwrap();
    object
        .style(image.markup())
        .and_then(|style| style.get(key).map(str::to_string))
}
