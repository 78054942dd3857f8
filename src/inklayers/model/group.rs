use super::{
    is_group_node, is_layer_node, synthetic_group_key, Container, Object, ID_ATTRIBUTE,
};
use crate::markup::{Markup, NodeId};
use crate::style::Property;
use indexmap::IndexMap;
use std::fmt;

/// A plain `<g>` that is not a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub(crate) id: String,
    pub(crate) node: NodeId,
    pub(crate) objects: IndexMap<String, Object>,
    pub(crate) groups: IndexMap<String, Group>,
}

/// The direct children of a container, sorted into the three model buckets.
pub(crate) struct Content {
    pub(crate) objects: IndexMap<String, Object>,
    pub(crate) groups: IndexMap<String, Group>,
    pub(crate) layer_nodes: Vec<NodeId>,
}

/// Classifies each direct child element of `node` in document order.
pub(crate) fn parse_content(markup: &Markup, node: NodeId) -> Content {
    let mut content = Content {
        objects: IndexMap::new(),
        groups: IndexMap::new(),
        layer_nodes: Vec::new(),
    };

    for (index, child) in markup.child_elements(node).enumerate() {
        if is_layer_node(markup, child) {
            content.layer_nodes.push(child);
        } else if is_group_node(markup, child) {
            let key = markup
                .attribute(child, ID_ATTRIBUTE)
                .map(str::to_string)
                .unwrap_or_else(|| synthetic_group_key(markup, child, index));
            let group = Group::parse(markup, child, key);
            if let Some(previous) = content.groups.insert(group.id.clone(), group) {
                log::warn!("duplicate group id '{}' among siblings", previous.id);
            }
        } else if let Some(id) = markup.attribute(child, ID_ATTRIBUTE) {
            let object = Object::parse(markup, child, id.to_string());
            if content.objects.insert(object.id.clone(), object).is_some() {
                log::warn!("duplicate object id '{}' among siblings", id);
            }
        }
    }

    content
}

impl Group {
    pub(crate) fn parse(markup: &Markup, node: NodeId, id: String) -> Self {
        let content = parse_content(markup, node);
        if !content.layer_nodes.is_empty() {
            log::debug!(
                "group '{}' contains {} layer(s) outside the layer tree, they are not addressable",
                id,
                content.layer_nodes.len()
            );
        }
        Self::from_content(id, node, content)
    }

    pub(crate) fn from_content(id: String, node: NodeId, content: Content) -> Self {
        Self {
            id,
            node,
            objects: content.objects,
            groups: content.groups,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Child groups first (recursively), then direct objects.
    pub fn set_property(&self, markup: &mut Markup, property: Property, value: &str, force: bool) {
        for group in self.groups.values() {
            group.set_property(markup, property, value, force);
        }
        for object in self.objects.values() {
            object.set_property(markup, property, value, force);
        }
    }

    /// Detaches every direct object and group from the markup and the model.
    pub(crate) fn clear_content(&mut self, markup: &mut Markup) {
        for object in self.objects.values() {
            markup.detach(object.node);
        }
        for group in self.groups.values() {
            markup.detach(group.node);
        }
        self.objects.clear();
        self.groups.clear();
    }

    pub(crate) fn write_structure(&self, level: usize, out: &mut String) {
        let indent = " ".repeat(level * 2);
        for object in self.objects.values() {
            out.push_str(&format!("{}{}\n", indent, object));
        }
        for group in self.groups.values() {
            out.push_str(&format!("{}{}\n", indent, group));
            group.write_structure(level + 1, out);
        }
    }
}

impl Container for Group {
    fn node(&self) -> NodeId {
        self.node
    }

    fn objects(&self) -> &IndexMap<String, Object> {
        &self.objects
    }

    fn groups(&self) -> &IndexMap<String, Group> {
        &self.groups
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group: id={}", self.id)
    }
}
