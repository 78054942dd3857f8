use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inklayers")]
#[command(about = "Inspect, extract and restyle the layers of Inkscape SVG files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the layer paths of one or more SVG files
    #[command(alias = "ls")]
    List {
        /// SVG files to inspect
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Print a JSON object mapping each file to its layer paths
        #[arg(short, long)]
        json: bool,
    },

    /// Extract layers into standalone SVG files
    #[command(alias = "x")]
    Extract {
        /// SVG files to extract the layers from
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Output directory (defaults to output_dir from inklayers.json, or ./output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only these layer paths, combined into one file per input (repeatable)
        #[arg(short, long = "layer", value_name = "PATH")]
        layers: Vec<String>,

        /// Re-root the selected layers under the document root, even if
        /// inklayers.json sets preserve_layer_paths
        #[arg(long, conflicts_with = "preserve_paths")]
        flatten: bool,

        /// Keep the selected layers at their original paths
        #[arg(long)]
        preserve_paths: bool,

        /// Only rewrite outputs older than their input
        #[arg(long)]
        lazy: bool,

        /// Always rewrite outputs, even if inklayers.json sets lazy
        #[arg(long, conflicts_with = "lazy")]
        no_lazy: bool,
    },

    /// Set fill/stroke properties on the objects of a layer
    #[command(group(
        ArgGroup::new("properties")
            .required(true)
            .multiple(true)
            .args(["fill", "stroke", "fill_opacity", "stroke_opacity"])
    ))]
    Colorize {
        /// SVG file to modify
        file: PathBuf,

        /// Layer path (e.g. /face/eyes)
        layer: String,

        /// Fill color (e.g. #FF0000)
        #[arg(long)]
        fill: Option<String>,

        /// Stroke color
        #[arg(long)]
        stroke: Option<String>,

        /// Fill opacity between 0 and 1
        #[arg(long)]
        fill_opacity: Option<f64>,

        /// Stroke opacity between 0 and 1
        #[arg(long)]
        stroke_opacity: Option<f64>,

        /// Also set properties objects do not have, or have set to none
        #[arg(short, long)]
        force: bool,

        /// Include sublayers
        #[arg(short, long)]
        recursive: bool,

        /// Output file (defaults to <stem>_colorized.svg next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
