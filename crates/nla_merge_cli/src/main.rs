// SPDX-License-Identifier: MIT OR Apache-2.0
//! `nla_merge` - merge selected NLA strips of a scene document.
//!
//! Loads a scene (RON, or JSON when the file ends in `.json`), optionally
//! replaces the strip selection, runs the merge command from the NLA context
//! menu and writes the resulting scene.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::Parser;
use nla_merge::{AnimationHost, MergeStrips, OperatorRegistry, OperatorResult, Scene, NLA_CONTEXT_MENU};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nla_merge", version, about = "Merge selected NLA strips into one baked strip")]
struct Cli {
    /// Input scene document.
    input: PathBuf,

    /// Strip to select, as TRACK/STRIP. Replaces the stored selection.
    #[arg(long = "select", value_name = "TRACK/STRIP")]
    select: Vec<String>,

    /// Object owning the strips passed with --select (first object by default).
    #[arg(long)]
    object: Option<String>,

    /// Current frame to set before merging.
    #[arg(long)]
    frame: Option<i32>,

    /// Output path; the scene is printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn main() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nla_merge=info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut scene = load(&cli.input)?;

    if !cli.select.is_empty() {
        select(&mut scene, cli.object.as_deref(), &cli.select)?;
    }
    if let Some(frame) = cli.frame {
        scene.frame_set(frame);
    }

    let mut registry = OperatorRegistry::new();
    nla_merge::register(&mut registry)?;
    for entry in registry.menu_entries(NLA_CONTEXT_MENU, &scene) {
        tracing::debug!("{} ({}): enabled={}", entry.label, entry.idname, entry.enabled);
    }

    match registry.invoke(MergeStrips::IDNAME, &mut scene)? {
        OperatorResult::Finished => {}
        OperatorResult::Cancelled => bail!("at least two strips must be selected"),
    }

    let out_json = cli.out.as_deref().map_or_else(|| is_json(&cli.input), is_json);
    let text = if out_json {
        scene.to_json()?
    } else {
        scene.to_ron()?
    };

    match &cli.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Scene> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    let scene = if is_json(path) {
        Scene::from_json(&text).with_context(|| format!("parse '{}'", path.display()))?
    } else {
        Scene::from_ron(&text).with_context(|| format!("parse '{}'", path.display()))?
    };
    Ok(scene)
}

fn select(scene: &mut Scene, object: Option<&str>, selection: &[String]) -> anyhow::Result<()> {
    let target = match object {
        Some(name) => scene.object_by_name(name),
        None => scene.objects.values().next(),
    };
    let Some(target) = target.map(|o| o.id) else {
        bail!("no object '{}' in scene", object.unwrap_or_default());
    };

    let pairs = selection
        .iter()
        .map(|s| {
            s.split_once('/')
                .with_context(|| format!("'{s}' is not of the form TRACK/STRIP"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    scene.select_strips(target, pairs)?;
    Ok(())
}
