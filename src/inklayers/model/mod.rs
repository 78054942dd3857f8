//! # Document Model
//!
//! The model mirrors the nesting of an Inkscape SVG:
//!
//! ```text
//! Image (root layer, path "/")
//! ├── objects   id   -> Object   (identified non-group children)
//! ├── groups    id   -> Group    (plain <g> children)
//! └── layers    name -> Layer    (<g inkscape:groupmode="layer">)
//!     ├── objects / groups
//!     └── layers ...
//! ```
//!
//! Model values hold [`NodeId`]s into the [`Markup`] arena that backs the
//! document; they never own markup themselves. Read-only queries only need the
//! model, while style edits take the arena as `&mut Markup` and leave the model
//! untouched. Structural edits (pruning, re-rooting) update both together and
//! live in this module so the two cannot drift apart.
//!
//! [`Layer`] embeds a [`Group`] rather than re-declaring its fields; both
//! implement [`Container`] for code that only needs `objects`/`groups`.
//!
//! Classification is by namespace URI, not by prefix: a layer is a `g` in the
//! SVG namespace whose `groupmode` attribute in the Inkscape namespace is
//! `layer`. Elements with no namespace bound at all count as SVG, so bare
//! `<svg>` fragments still load.

use crate::error::{DocumentError, Result};
use crate::markup::{local_name, Markup, NodeId};
use crate::style::{Property, Style, STYLE_ATTRIBUTE};
use indexmap::IndexMap;

pub mod group;
pub mod layer;
pub mod object;

pub use group::Group;
pub use layer::Layer;
pub use object::Object;

pub const ID_ATTRIBUTE: &str = "id";
pub const GROUP_TAG: &str = "g";
pub const GROUPMODE_ATTRIBUTE: &str = "groupmode";
pub const LAYER_GROUPMODE: &str = "layer";
pub const LABEL_ATTRIBUTE: &str = "label";

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const INKSCAPE_NAMESPACE: &str = "http://www.inkscape.org/namespaces/inkscape";

/// Path of the root layer.
pub const ROOT_PATH: &str = "/";

/// Anything holding objects and plain groups: a [`Group`] or a [`Layer`].
pub trait Container {
    fn node(&self) -> NodeId;

    fn objects(&self) -> &IndexMap<String, Object>;

    fn groups(&self) -> &IndexMap<String, Group>;

    fn object(&self, id: &str) -> Option<&Object> {
        self.objects().get(id)
    }

    fn group(&self, id: &str) -> Option<&Group> {
        self.groups().get(id)
    }
}

pub(crate) fn is_layer_node(markup: &Markup, node: NodeId) -> bool {
    is_group_node(markup, node)
        && markup.attribute_ns(node, INKSCAPE_NAMESPACE, GROUPMODE_ATTRIBUTE)
            == Some(LAYER_GROUPMODE)
}

pub(crate) fn is_group_node(markup: &Markup, node: NodeId) -> bool {
    markup.element(node).is_some_and(|el| {
        el.local_name() == GROUP_TAG && el.namespace().map_or(true, |ns| ns == SVG_NAMESPACE)
    })
}

pub(crate) fn tag_of(markup: &Markup, node: NodeId) -> String {
    markup
        .element(node)
        .map(|el| el.name().to_string())
        .unwrap_or_default()
}

/// Writes one style property on a node, honoring the force policy.
///
/// A node without a `style` attribute only gets one when `force` is set.
pub(crate) fn update_node_style(
    markup: &mut Markup,
    node: NodeId,
    property: Property,
    value: &str,
    force: bool,
) -> bool {
    let mut style = match markup.attribute(node, STYLE_ATTRIBUTE) {
        Some(raw) => Style::parse(raw),
        None if force => Style::default(),
        None => return false,
    };
    if !style.update(property.key(), value, force) {
        return false;
    }
    markup.set_attribute(node, STYLE_ATTRIBUTE, style.to_string());
    true
}

pub(crate) fn format_opacity(opacity: f64) -> Result<String> {
    if !(0.0..=1.0).contains(&opacity) {
        return Err(DocumentError::InvalidOpacity(opacity));
    }
    Ok(opacity.to_string())
}

/// Builds a layer path from its parent's path and its own name.
pub fn join_layer_path(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Path-prefix match: `/face` covers `/face` and `/face/eyes`, not `/faces`.
pub fn is_path_prefix(prefix: &str, path: &str) -> bool {
    prefix == ROOT_PATH
        || path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Key for a plain group lacking an `id`, stable for one parse of a document.
pub(crate) fn synthetic_group_key(markup: &Markup, node: NodeId, index: usize) -> String {
    let tag = tag_of(markup, node);
    format!("{}#{}", local_name(&tag), index)
}
