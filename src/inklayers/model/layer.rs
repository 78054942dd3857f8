use super::group::{parse_content, Group};
use super::{
    is_path_prefix, join_layer_path, Container, Object, ID_ATTRIBUTE, INKSCAPE_NAMESPACE,
    LABEL_ATTRIBUTE, ROOT_PATH,
};
use crate::error::{DocumentError, Result};
use crate::markup::{Markup, NodeId};
use crate::style::{Property, Style, STYLE_ATTRIBUTE};
use indexmap::IndexMap;
use std::fmt;

/// A `<g inkscape:groupmode="layer">`, addressable by its layer path.
///
/// Paths are resolved relative to the layer they are asked on: `/` is the
/// receiver itself, `/eyes` its direct sublayer named `eyes`. Asked on the
/// document root, that is the usual absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub(crate) group: Group,
    pub(crate) layer_name: String,
    pub(crate) layer_path: String,
    pub(crate) layers: IndexMap<String, Layer>,
}

impl Layer {
    /// Parses `node` and everything below it. `parent_path` is `None` for the
    /// document root, which gets name and path `/`.
    pub(crate) fn parse(markup: &Markup, node: NodeId, parent_path: Option<&str>) -> Result<Self> {
        let (layer_name, layer_path) = match parent_path {
            None => (ROOT_PATH.to_string(), ROOT_PATH.to_string()),
            Some(parent) => {
                let name = layer_label(markup, node)?;
                let path = join_layer_path(parent, &name);
                (name, path)
            }
        };

        let content = parse_content(markup, node);
        let mut layers = IndexMap::new();
        for child in &content.layer_nodes {
            let layer = Layer::parse(markup, *child, Some(&layer_path))?;
            if layers.contains_key(&layer.layer_name) {
                return Err(DocumentError::DuplicateLayer(layer.layer_path));
            }
            layers.insert(layer.layer_name.clone(), layer);
        }

        let id = markup
            .attribute(node, ID_ATTRIBUTE)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            group: Group::from_content(id, node, content),
            layer_name,
            layer_path,
            layers,
        })
    }

    pub fn name(&self) -> &str {
        &self.layer_name
    }

    pub fn path(&self) -> &str {
        &self.layer_path
    }

    pub fn is_root(&self) -> bool {
        self.layer_path == ROOT_PATH
    }

    pub fn as_group(&self) -> &Group {
        &self.group
    }

    pub fn layers(&self) -> &IndexMap<String, Layer> {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    pub fn get_layer_by_path(&self, path: &str) -> Result<&Layer> {
        let mut current = self;
        for segment in path_segments(path)? {
            current = current
                .layers
                .get(segment)
                .ok_or_else(|| DocumentError::LayerUnknown(path.to_string()))?;
        }
        Ok(current)
    }

    pub fn get_layer_by_path_mut(&mut self, path: &str) -> Result<&mut Layer> {
        let mut current = self;
        for segment in path_segments(path)? {
            current = current
                .layers
                .get_mut(segment)
                .ok_or_else(|| DocumentError::LayerUnknown(path.to_string()))?;
        }
        Ok(current)
    }

    /// Every layer named `name` in this subtree, this layer included.
    ///
    /// The receiver comes first. Below it, each layer's direct sublayers are
    /// checked before descending into them in child order, so `/x` is found
    /// before `/a/x`.
    pub fn find_layers_by_name(&self, name: &str) -> Vec<&Layer> {
        let mut found = Vec::new();
        if self.layer_name == name {
            found.push(self);
        }
        self.collect_by_name(name, &mut found);
        found
    }

    pub fn find_first_layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.find_layers_by_name(name).into_iter().next()
    }

    fn collect_by_name<'a>(&'a self, name: &str, found: &mut Vec<&'a Layer>) {
        found.extend(self.layers.get(name));
        for layer in self.layers.values() {
            layer.collect_by_name(name, found);
        }
    }

    /// This layer's path followed by every sublayer path, pre-order.
    pub fn get_all_layer_paths(&self) -> Vec<String> {
        let mut paths = vec![self.layer_path.clone()];
        for layer in self.layers.values() {
            paths.extend(layer.get_all_layer_paths());
        }
        paths
    }

    /// Indented outline of the subtree, one line per layer, group and object.
    pub fn structure(&self) -> String {
        let mut out = format!("{}\n", self);
        self.write_structure(1, &mut out);
        out
    }

    fn write_structure(&self, level: usize, out: &mut String) {
        self.group.write_structure(level, out);
        let indent = " ".repeat(level * 2);
        for layer in self.layers.values() {
            out.push_str(&format!("{}{}\n", indent, layer));
            layer.write_structure(level + 1, out);
        }
    }

    /// Applies a style property to this layer's content and, with
    /// `recursive`, to every sublayer.
    pub fn set_property(
        &self,
        markup: &mut Markup,
        property: Property,
        value: &str,
        force: bool,
        recursive: bool,
    ) {
        self.group.set_property(markup, property, value, force);
        if recursive {
            for layer in self.layers.values() {
                layer.set_property(markup, property, value, force, recursive);
            }
        }
    }

    /// Sets `display:inline|none` on the layer's own style attribute. A layer
    /// without a style attribute is left alone.
    pub fn set_visible(&self, markup: &mut Markup, visible: bool, recursive: bool) {
        if recursive {
            for layer in self.layers.values() {
                layer.set_visible(markup, visible, recursive);
            }
        }
        let node = self.node();
        let Some(raw) = markup.attribute(node, STYLE_ATTRIBUTE) else {
            log::debug!("layer {} has no style attribute, visibility unchanged", self.layer_path);
            return;
        };
        let mut style = Style::parse(raw);
        style.set(
            Property::Display.key(),
            if visible { "inline" } else { "none" },
        );
        markup.set_attribute(node, STYLE_ATTRIBUTE, style.to_string());
    }

    pub fn is_visible(&self, markup: &Markup) -> bool {
        markup
            .attribute(self.node(), STYLE_ATTRIBUTE)
            .map(Style::parse)
            .map_or(true, |style| style.get(Property::Display.key()) != Some("none"))
    }

    pub(crate) fn remove_all_layers(&mut self, markup: &mut Markup) {
        for layer in self.layers.values() {
            markup.detach(layer.node());
        }
        self.layers.clear();
    }

    pub(crate) fn remove_all_objects_and_groups(&mut self, markup: &mut Markup) {
        self.group.clear_content(markup);
    }

    /// Drops every sublayer not on the way to one of `paths`. Layers kept
    /// only as ancestors lose their own objects and groups.
    pub(crate) fn retain_layer_paths(&mut self, markup: &mut Markup, paths: &[&str]) {
        let mut removed = Vec::new();
        for (name, layer) in self.layers.iter_mut() {
            if paths.iter().any(|path| is_path_prefix(&layer.layer_path, path)) {
                layer.retain_layer_paths(markup, paths);
            } else {
                removed.push(name.clone());
            }
        }

        for name in removed {
            if let Some(layer) = self.layers.shift_remove(&name) {
                markup.detach(layer.node());
            }
        }

        if !self.is_root() && !paths.contains(&self.layer_path.as_str()) {
            self.remove_all_objects_and_groups(markup);
        }
    }

    /// Appends a detached layer node below this layer and parses it in place.
    pub(crate) fn adopt_layer(&mut self, markup: &mut Markup, node: NodeId) -> Result<&Layer> {
        markup.append(self.node(), node);
        let layer = match Layer::parse(markup, node, Some(&self.layer_path)) {
            Ok(layer) => layer,
            Err(err) => {
                markup.detach(node);
                return Err(err);
            }
        };
        if self.layers.contains_key(&layer.layer_name) {
            markup.detach(node);
            return Err(DocumentError::DuplicateLayer(layer.layer_path));
        }
        let name = layer.layer_name.clone();
        Ok(self.layers.entry(name).or_insert(layer))
    }
}

impl Container for Layer {
    fn node(&self) -> NodeId {
        self.group.node
    }

    fn objects(&self) -> &IndexMap<String, Object> {
        &self.group.objects
    }

    fn groups(&self) -> &IndexMap<String, Group> {
        &self.group.groups
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer: name={}", self.layer_name)
    }
}

fn layer_label(markup: &Markup, node: NodeId) -> Result<String> {
    markup
        .attribute_ns(node, INKSCAPE_NAMESPACE, LABEL_ATTRIBUTE)
        .or_else(|| markup.attribute(node, ID_ATTRIBUTE))
        .map(str::to_string)
        .ok_or_else(|| {
            DocumentError::Parse(format!(
                "layer without inkscape:{} or {} attribute",
                LABEL_ATTRIBUTE, ID_ATTRIBUTE
            ))
        })
}

fn path_segments(path: &str) -> Result<Vec<&str>> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| DocumentError::MalformedPath(path.to_string()))?;
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    Ok(rest.split('/').collect())
}
