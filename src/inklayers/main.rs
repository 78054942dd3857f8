use clap::Parser;
use colored::*;
use inklayers::commands::colorize::ColorizeOptions;
use inklayers::commands::extract::ExtractOptions;
use inklayers::commands::{colorize, extract, list, CmdMessage, ListedLayers, MessageLevel};
use inklayers::config::LayersConfig;
use inklayers::error::Result;
use std::path::PathBuf;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = LayersConfig::load(&cwd)?;

    match cli.command {
        Commands::List { files, json } => handle_list(files, json),
        Commands::Extract {
            files,
            output,
            layers,
            flatten,
            preserve_paths,
            lazy,
            no_lazy,
        } => {
            let options = ExtractOptions {
                layers,
                preserve_layer_paths: if flatten {
                    false
                } else {
                    preserve_paths || config.preserve_layer_paths
                },
                lazy: !no_lazy && (lazy || config.lazy),
            };
            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            handle_extract(files, output_dir, options)
        }
        Commands::Colorize {
            file,
            layer,
            fill,
            stroke,
            fill_opacity,
            stroke_opacity,
            force,
            recursive,
            output,
        } => {
            let options = ColorizeOptions {
                fill,
                stroke,
                fill_opacity,
                stroke_opacity,
                force,
                recursive,
                output,
            };
            handle_colorize(file, &layer, options)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn handle_list(files: Vec<PathBuf>, json: bool) -> Result<()> {
    let result = list::run(&files)?;
    if json {
        print_layers_json(&result.listed_layers)?;
    } else {
        print_layers(&result.listed_layers);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_extract(files: Vec<PathBuf>, output_dir: PathBuf, options: ExtractOptions) -> Result<()> {
    let result = extract::run(&files, &output_dir, &options)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_colorize(file: PathBuf, layer: &str, options: ColorizeOptions) -> Result<()> {
    let result = colorize::run(&file, layer, &options)?;
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

fn print_layers(listed: &[ListedLayers]) {
    for entry in listed {
        println!("File: {}", entry.file.display().to_string().bold());
        for path in &entry.layers {
            println!("  {}", path);
        }
    }
}

fn print_layers_json(listed: &[ListedLayers]) -> Result<()> {
    let mut by_file = serde_json::Map::new();
    for entry in listed {
        by_file.insert(
            entry.file.display().to_string(),
            serde_json::Value::from(entry.layers.clone()),
        );
    }
    println!("{}", serde_json::to_string_pretty(&by_file)?);
    Ok(())
}
