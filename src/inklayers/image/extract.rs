//! # Subtree extraction
//!
//! Every extraction starts from a clone of the source image and reshapes the
//! clone, so the source is never modified and a failed lookup leaves nothing
//! half-done.
//!
//! Two modes:
//!
//! - **Path-preserving**: keep each requested layer where it is, together with
//!   its chain of ancestors. Ancestors that were not requested themselves are
//!   emptied of their own objects and groups, so only the requested content is
//!   drawn but every path still resolves as in the source.
//!
//! - **Flattening**: re-root each requested layer as a direct child of the
//!   document root, in request order. The layers keep their own sublayers.

use super::Image;
use crate::error::Result;
use crate::markup::NodeId;
use crate::model::{Container, ROOT_PATH};
use indexmap::IndexMap;

impl Image {
    /// Extracts a single layer. `/` returns a copy of the whole document.
    pub fn extract_layer(&self, path: &str, preserve_layer_paths: bool) -> Result<Image> {
        if path == ROOT_PATH {
            return Ok(self.clone());
        }
        self.extract_layers(&[path], preserve_layer_paths)
    }

    pub fn extract_layers<S: AsRef<str>>(
        &self,
        paths: &[S],
        preserve_layer_paths: bool,
    ) -> Result<Image> {
        let paths: Vec<&str> = paths.iter().map(|path| path.as_ref()).collect();
        let mut image = self.clone();
        if preserve_layer_paths {
            image.retain_layer_paths(&paths)?;
        } else {
            image.flatten_layer_paths(&paths)?;
        }
        log::debug!(
            "extracted {:?} (preserve_layer_paths={})",
            paths,
            preserve_layer_paths
        );
        Ok(image)
    }

    /// One path-preserving extraction per layer path, root included.
    pub fn extract_all_layers(&self) -> Result<IndexMap<String, Image>> {
        self.get_all_layer_paths()
            .into_iter()
            .map(|path| {
                let image = self.extract_layer(&path, true)?;
                Ok((path, image))
            })
            .collect()
    }

    fn retain_layer_paths(&mut self, paths: &[&str]) -> Result<()> {
        for path in paths {
            self.root.get_layer_by_path(path)?;
        }
        self.root.retain_layer_paths(&mut self.markup, paths);
        Ok(())
    }

    fn flatten_layer_paths(&mut self, paths: &[&str]) -> Result<()> {
        let mut nodes: Vec<NodeId> = Vec::new();
        for path in paths {
            let layer = self.root.get_layer_by_path(path)?;
            if layer.is_root() {
                // the root flattens to its own top-level layers
                nodes.extend(layer.layers().values().map(Container::node));
            } else {
                nodes.push(layer.node());
            }
        }

        let copies: Vec<NodeId> = nodes
            .into_iter()
            .map(|node| self.markup.duplicate(node))
            .collect();

        self.root.remove_all_layers(&mut self.markup);
        for copy in copies {
            self.root.adopt_layer(&mut self.markup, copy)?;
        }
        Ok(())
    }
}
