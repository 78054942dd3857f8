//! # Inklayers Architecture
//!
//! Inklayers is a **library for Inkscape layer trees** with a small CLI client on top.
//! An Inkscape SVG nests its drawing in `<g inkscape:groupmode="layer">` groups; this crate
//! loads such a document into a tree of layers addressable by POSIX-like paths
//! (`/face/eyes/right`), extracts subsets of that tree into standalone documents, and
//! rewrites fill/stroke properties across whole layers.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs + args.rs)                                    │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - list / extract / colorize over files                     │
//! │  - Return `CmdResult`, never print                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Image (image/)                                             │
//! │  - Load, resolve paths, extract, restyle, save              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model + Markup (model/, markup.rs, style.rs)               │
//! │  - Layer/Group/Object tree over a mutable XML arena         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use inklayers::Image;
//!
//! # fn main() -> inklayers::Result<()> {
//! let mut image = Image::load_from_file("face.svg")?;
//! println!("{:?}", image.get_all_layer_paths());
//!
//! image.layer_mut("/face/eyes")?.set_fill_color("#FF0000", false, true);
//! image.extract_layer("/face/eyes", true)?.save("output/eyes.svg")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`image`]: The [`Image`] entry point: loading, extraction, persistence
//! - [`model`]: `Layer`, `Group`, `Object` and the path helpers
//! - [`markup`]: Mutable XML arena preserving names, attribute order and prolog
//! - [`style`]: Inline `style` attribute parsing and updates
//! - [`commands`]: Business logic behind the CLI subcommands
//! - [`config`]: `inklayers.json` defaults for the CLI
//! - [`error`]: Error types

pub mod commands;
pub mod config;
pub mod error;
pub mod image;
pub mod markup;
pub mod model;
pub mod style;

#[cfg(test)]
mod test_utils;

pub use error::{DocumentError, Result};
pub use image::{Image, LayerMut, ObjectMut, SaveMode};
pub use model::{Container, Group, Layer, Object};
