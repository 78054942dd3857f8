use super::{format_opacity, tag_of, update_node_style, ID_ATTRIBUTE};
use crate::error::Result;
use crate::markup::{Markup, NodeId};
use crate::style::{Property, Style, STYLE_ATTRIBUTE};
use indexmap::IndexMap;
use std::fmt;

/// A graphical primitive with an `id`: a path, rect, text, image...
///
/// Identified children (a `tspan` inside a `text`, say) are parsed as nested
/// sub-objects so style edits reach them in the same pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub(crate) id: String,
    pub(crate) tag: String,
    pub(crate) node: NodeId,
    pub(crate) objects: IndexMap<String, Object>,
}

impl Object {
    pub(crate) fn parse(markup: &Markup, node: NodeId, id: String) -> Self {
        Self {
            id,
            tag: tag_of(markup, node),
            node,
            objects: parse_sub_objects(markup, node),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn objects(&self) -> &IndexMap<String, Object> {
        &self.objects
    }

    pub fn style(&self, markup: &Markup) -> Option<Style> {
        markup.attribute(self.node, STYLE_ATTRIBUTE).map(Style::parse)
    }

    /// Sub-objects first, then this object.
    pub fn set_property(&self, markup: &mut Markup, property: Property, value: &str, force: bool) {
        for object in self.objects.values() {
            object.set_property(markup, property, value, force);
        }
        update_node_style(markup, self.node, property, value, force);
    }

    pub fn set_fill_color(&self, markup: &mut Markup, color: &str, force: bool) {
        self.set_property(markup, Property::Fill, color, force);
    }

    pub fn set_stroke_color(&self, markup: &mut Markup, color: &str, force: bool) {
        self.set_property(markup, Property::Stroke, color, force);
    }

    pub fn set_fill_opacity(&self, markup: &mut Markup, opacity: f64, force: bool) -> Result<()> {
        let value = format_opacity(opacity)?;
        self.set_property(markup, Property::FillOpacity, &value, force);
        Ok(())
    }

    pub fn set_stroke_opacity(&self, markup: &mut Markup, opacity: f64, force: bool) -> Result<()> {
        let value = format_opacity(opacity)?;
        self.set_property(markup, Property::StrokeOpacity, &value, force);
        Ok(())
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object: tag={}, id={}", self.tag, self.id)
    }
}

fn parse_sub_objects(markup: &Markup, node: NodeId) -> IndexMap<String, Object> {
    let mut objects = IndexMap::new();
    for child in markup.child_elements(node) {
        if let Some(id) = markup.attribute(child, ID_ATTRIBUTE) {
            let object = Object::parse(markup, child, id.to_string());
            if objects.insert(object.id.clone(), object).is_some() {
                log::warn!("duplicate object id '{}' among siblings", id);
            }
        }
    }
    objects
}
