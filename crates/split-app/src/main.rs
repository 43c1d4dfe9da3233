// ABOUTME: Replay driver for the split layout engine.
// ABOUTME: Feeds scripted pointer and resize input to a layout and prints size changes.

mod script;

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use split_core::{Config, LayoutSnapshot, PaneSize, Rect};
use split_layout::{Dispatcher, LayoutOptions, Notification, SplitLayout, Surface};

use script::Command;

/// Container whose size is driven by `resize` commands
#[derive(Clone)]
struct ReplaySurface {
    bounds: Rc<Cell<Rect>>,
}

impl Surface for ReplaySurface {
    fn container_bounds(&self) -> Option<Rect> {
        Some(self.bounds.get())
    }

    fn clear_selection(&mut self) {
        tracing::trace!("Selection cleared");
    }
}

/// One line of output: the sizes reported after a drag step
#[derive(Serialize)]
struct SizeReport<'a> {
    step: usize,
    sizes: &'a [PaneSize],
}

/// Replay pointer and resize scripts against a split layout
#[derive(Parser, Debug)]
#[command(name = "splitter-replay", version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script to replay; reads stdin when omitted
    script: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load_or_default()),
    }
}

fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin"),
    }
}

fn build_options(config: &Config, step: Rc<Cell<usize>>) -> LayoutOptions {
    let mut options = LayoutOptions::from(&config.layout);

    if config.restore_layout {
        let pane_count = config.layout.pane_count;
        let fallback = config.layout.initial_sizes();
        let mounted = Cell::new(false);
        // Only the first mount restores; later remounts have a different pane count
        options = options.with_deferred_initial_sizes(move || {
            let restored = if mounted.replace(true) {
                Default::default()
            } else {
                LayoutSnapshot::load_from_default()
                    .map(|snapshot| snapshot.initial_sizes(pane_count))
                    .unwrap_or_default()
            };
            if restored.is_empty() {
                fallback.clone()
            } else {
                tracing::info!("Restoring {} pane sizes from snapshot", restored.len());
                restored
            }
        });
    }

    options.on_size_change(move |sizes| {
        let report = SizeReport {
            step: step.get(),
            sizes,
        };
        match serde_json::to_string(&report) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Failed to encode sizes: {}", e),
        }
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting splitter-replay");

    let args = Cli::parse();
    let config = load_config(args.config.as_ref())?;
    let commands = script::parse(&read_script(args.script.as_ref())?)?;

    let surface = ReplaySurface {
        bounds: Rc::new(Cell::new(Rect::new(
            0.0,
            0.0,
            config.container_width,
            config.container_height,
        ))),
    };
    let bounds = surface.bounds.clone();
    let step = Rc::new(Cell::new(0));

    let layout = SplitLayout::new(
        surface,
        vec![(); config.layout.pane_count],
        build_options(&config, step.clone()),
    )?;
    let layout = Rc::new(RefCell::new(layout));

    let dispatcher = Dispatcher::new();
    let _subscription = SplitLayout::attach(&layout, &dispatcher);

    for (index, command) in commands.into_iter().enumerate() {
        step.set(index);
        match command {
            Command::Grab(splitter) => {
                layout
                    .borrow_mut()
                    .handle(&Notification::PointerDown { splitter })?;
            }
            Command::GrabAt(point) => {
                let hit = layout.borrow().splitter_at(point);
                match hit {
                    Some(splitter) => {
                        layout
                            .borrow_mut()
                            .handle(&Notification::PointerDown { splitter })?;
                    }
                    None => tracing::warn!("No splitter at {:?}", point),
                }
            }
            Command::Move(point) => {
                dispatcher.dispatch(Notification::PointerMove(point));
            }
            Command::Release => {
                dispatcher.dispatch(Notification::PointerUp);
            }
            Command::Resize { width, height } => {
                bounds.set(Rect::new(0.0, 0.0, width, height));
                dispatcher.dispatch(Notification::ViewportResized);
            }
            Command::Panes(count) => {
                layout.borrow_mut().set_contents(vec![(); count])?;
            }
        }
    }

    let layout = layout.borrow();
    tracing::info!("Final sizes: {:?}", layout.sizes());

    if config.restore_layout {
        let snapshot = LayoutSnapshot::new(layout.orientation(), layout.pane_sizes());
        match snapshot.save_to_default() {
            Ok(path) => tracing::info!("Saved layout to {}", path.display()),
            Err(e) => tracing::warn!("Failed to save layout: {}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_config_and_script() {
        let cli = Cli::try_parse_from(["splitter-replay", "--config", "layout.toml", "drag.txt"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("layout.toml")));
        assert_eq!(cli.script, Some(PathBuf::from("drag.txt")));
    }

    #[test]
    fn script_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["splitter-replay"]).unwrap();
        assert_eq!(cli.config, None);
        assert_eq!(cli.script, None);
    }

    #[test]
    fn rejects_extra_positional() {
        assert!(Cli::try_parse_from(["splitter-replay", "a.txt", "b.txt"]).is_err());
        assert!(Cli::try_parse_from(["splitter-replay", "--config"]).is_err());
    }
}
