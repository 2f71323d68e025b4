use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ssse::{
    CargoDelta, Editor, EditorOptions, Field, OfficerRole, QualityCatalog, ShipAttribute, TrackedQuality,
    locate, statics,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about = statics::EN_APP_TITLE)]
struct Cli {
    /// Quality definitions; defaults to the game's `entities/qualities.json`.
    #[arg(long, value_name = "PATH", global = true)]
    qualities: Option<PathBuf>,
    /// Also list save records no definition knows about.
    #[arg(long, global = true)]
    show_unknown: bool,
    /// Debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a save's captain, ship, officers and qualities.
    Show {
        #[arg(value_name = "SAVE")]
        save: PathBuf,
        /// Include qualities the save does not have.
        #[arg(long)]
        all: bool,
    },
    /// Change a save and write it back.
    Edit {
        #[arg(value_name = "SAVE")]
        save: PathBuf,
        #[arg(long = "set", value_name = "TAG=VALUE", value_parser = parse_assignment)]
        set: Vec<(i64, String)>,
        #[arg(long = "add", value_name = "TAG")]
        add: Vec<i64>,
        #[arg(long = "remove", value_name = "TAG")]
        remove: Vec<i64>,
        #[arg(long = "ship", value_name = "ATTR=VALUE", value_parser = parse_ship_assignment)]
        ship: Vec<(ShipAttribute, i64)>,
        /// Write here instead of over the input.
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Save even when there are warnings.
        #[arg(long)]
        force: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(i64, String), String> {
    let (tag, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected TAG=VALUE, got {raw:?}"))?;
    let tag = tag
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid tag {tag:?}: {e}"))?;
    Ok((tag, value.to_string()))
}

fn parse_ship_assignment(raw: &str) -> Result<(ShipAttribute, i64), String> {
    let (attr, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ATTR=VALUE, got {raw:?}"))?;
    let attr = attr.trim().parse::<ShipAttribute>()?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid value {value:?}: {e}"))?;
    Ok((attr, value))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_catalog(explicit: Option<&Path>) -> Result<QualityCatalog> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => locate::qualities_path()
            .context("no home directory; pass --qualities with the path to qualities.json")?,
    };
    QualityCatalog::load_path(&path)
        .with_context(|| format!("failed to load quality definitions from {}", path.display()))
}

/// A save name that doesn't exist as given is looked up in the game's saves directory.
fn resolve_save(path: &Path) -> PathBuf {
    if path.exists() || path.is_absolute() {
        return path.to_path_buf();
    }
    locate::saves_dir()
        .map(|dir| dir.join(path))
        .filter(|candidate| candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut catalog = load_catalog(cli.qualities.as_deref())?;
    let options = EditorOptions {
        show_unknown: cli.show_unknown,
    };

    match cli.command {
        Command::Show { save, all } => {
            let save = resolve_save(&save);
            let editor = Editor::open(&save, &mut catalog, options)
                .with_context(|| format!("failed to open {}", save.display()))?;
            print_editor(&editor, all);
        }
        Command::Edit {
            save,
            set,
            add,
            remove,
            ship,
            output,
            force,
        } => {
            let save = resolve_save(&save);
            let mut editor = Editor::open(&save, &mut catalog, options)
                .with_context(|| format!("failed to open {}", save.display()))?;

            for tag in add {
                editor
                    .add_quality(tag, &mut catalog)
                    .with_context(|| format!("cannot add {tag}"))?;
            }
            for (tag, text) in set {
                let delta = editor
                    .apply_edit(tag, &text)
                    .with_context(|| format!("cannot set {tag}"))?;
                if delta != CargoDelta::NONE {
                    tracing::debug!(tag, old = delta.old, new = delta.new, "cargo changed");
                }
            }
            for tag in remove {
                editor
                    .remove_quality(tag)
                    .with_context(|| format!("cannot remove {tag}"))?;
            }
            for (attr, value) in ship {
                if !editor.set_ship_attribute(attr, value) {
                    bail!("the current ship has no {} to set", attr.label());
                }
            }

            let warnings = editor.save_warnings();
            for warning in &warnings {
                eprintln!("warning: {warning}");
            }
            if !warnings.is_empty() && !force {
                bail!("not saved; {}", statics::EN_HINT_FORCE);
            }

            let target = output.unwrap_or(save);
            let written = editor
                .save_to_path(&target)
                .with_context(|| format!("failed to save {}", target.display()))?;
            println!("{} {}", statics::EN_SAVED_TO, written.display());
        }
    }
    Ok(())
}

fn field_value(field: &Field) -> &str {
    field.text().unwrap_or(statics::EN_ABSENT)
}

fn print_editor(editor: &Editor, all: bool) {
    let summary = editor.summary();
    println!(
        "{}: {}",
        statics::EN_HEADING_CAPTAIN,
        summary.player_name.as_deref().unwrap_or(statics::EN_UNSET)
    );
    println!(
        "{}: {}",
        statics::EN_HEADING_PORT,
        summary.current_port.as_deref().unwrap_or(statics::EN_UNSET)
    );
    println!("{}: {}", statics::EN_HEADING_DATE, summary.in_game_date);

    println!();
    match editor.ship() {
        Some(ship) => {
            println!("{}: {}", statics::EN_HEADING_SHIP, ship.item.name);
            for attr in ShipAttribute::ALL {
                let level = editor.ship_level(attr).unwrap_or(0);
                println!("  {}: {level}", attr.label());
            }
        }
        None => println!("{}: {}", statics::EN_HEADING_SHIP, statics::EN_NO_SHIP),
    }

    println!("{}:", statics::EN_HEADING_OFFICERS);
    for role in OfficerRole::ALL {
        let name = editor
            .officers()
            .get(&role)
            .map_or(statics::EN_VACANT, String::as_str);
        println!("  {}: {name}", role.slot_name());
    }

    println!("{}:", statics::EN_HEADING_TRACKED);
    for tracked in TrackedQuality::ALL {
        if let Some(field) = editor.tracked_field(tracked) {
            println!("  {}", format_field(field));
        }
    }

    let hold = editor
        .ship_level(ShipAttribute::HoldCapacity)
        .map_or_else(|| statics::EN_UNSET.to_string(), |h| h.to_string());
    println!("{}: {} / {hold}", statics::EN_HEADING_CARGO, editor.cargo());
    for item in editor.stowed_goods() {
        println!("  {item}");
    }
    println!("{}:", statics::EN_HEADING_EQUIPPED);
    for item in editor.equipped_goods() {
        println!("  {item} [{}]", item.slot.as_deref().unwrap_or(statics::EN_EMPTY));
    }

    for panel in editor.panels() {
        let fields: Vec<&Field> = panel
            .tags
            .iter()
            .filter_map(|tag| editor.field(*tag))
            .filter(|field| all || field.is_present())
            .collect();
        if fields.is_empty() {
            continue;
        }
        println!();
        println!("{}:", panel.category);
        for field in fields {
            println!("  {}", format_field(field));
        }
    }
}

fn format_field(field: &Field) -> String {
    format!("{} = {}", field.item, field_value(field))
}
