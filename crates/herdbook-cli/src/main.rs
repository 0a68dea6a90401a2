//! Herdbook CLI.
//!
//! Extracts pony metadata and trimmed sprites from a decoded game folder and
//! reconciles them into the persistent knowledge base at
//! `<output>/json/game-data.json`. Re-run after every game update; hand
//! edits in the document survive per the lock/merge rules in
//! `herdbook-sync`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use herdbook_extract::{GameFolder, LocaleSource};
use herdbook_store::Store;
use herdbook_sync::{HttpProbe, PageProbe, Reconciler, ReconcilerConfig, RunOptions, Sources};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "herdbook")]
#[command(author, version, about = "Extract and reconcile pony metadata from game data")]
struct Cli {
    /// Decoded game folder (object dumps, *.loc.json, textures).
    #[arg(short, long)]
    game_folder: PathBuf,

    /// Output folder receiving `json/game-data.json` and `images/`.
    #[arg(short, long, default_value = "assets")]
    output: PathBuf,

    /// Game version label recorded in the document. Defaults to the content
    /// version from `data_ver.xml`.
    #[arg(short = 'v', long)]
    game_version: Option<String>,

    /// Skip sprite extraction.
    #[arg(long)]
    no_images: bool,

    /// Verify external wiki links with live HEAD checks.
    #[arg(short = 'w', long)]
    check_links: bool,

    /// Reconciler configuration (membership lists, lookup tables, wiki
    /// sources) as JSON. Defaults are compiled in.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ReconcilerConfig::from_path(path)?,
        None => ReconcilerConfig::default(),
    };

    println!("{}", "loading game data".bold());
    let game = GameFolder::load(&cli.game_folder)?;
    println!("content version {}", game.content_version.green());

    let store_path = cli.output.join("json").join("game-data.json");
    let mut store = Store::open(&store_path)?;

    let locale_refs: Vec<&dyn LocaleSource> = game
        .locales
        .iter()
        .map(|table| table as &dyn LocaleSource)
        .collect();
    let textures = game.textures();
    let probe = if cli.check_links {
        Some(HttpProbe::new()?)
    } else {
        None
    };

    let sources = Sources {
        objects: &game.objects,
        locales: &locale_refs,
        campaign: &game.campaign,
        prizes: &game.prizes,
        textures: if cli.no_images {
            None
        } else {
            Some(&textures)
        },
        probe: probe.as_ref().map(|probe| probe as &dyn PageProbe),
    };

    let options = RunOptions {
        game_version: cli
            .game_version
            .clone()
            .unwrap_or_else(|| game.content_version.clone()),
        content_version: game.content_version.clone(),
        output_root: cli.output.clone(),
    };

    let count = game.objects.objects(&config.source_category).len();
    println!(
        "reconciling {} objects into {}",
        count.to_string().bold(),
        config.category.bold()
    );

    // The session flushes on both exit paths: an entity failure below still
    // leaves the partially-reconciled document on disk before the error
    // reaches the exit code.
    let mut session = store.session();
    Reconciler::new(&config).run(session.document(), &sources, &options)?;
    session.commit()?;

    println!("{} {}", "saved".green().bold(), store_path.display());
    Ok(())
}
