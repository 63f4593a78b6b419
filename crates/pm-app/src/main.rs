//! `pointmap`: render a dataset onto the headless map and print the result

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pm_app::{MapVisual, UpdateOutcome};
use pm_core::{HeadlessMap, MapEvent};
use pm_data::sources::{load_ipc, load_update_options};
use pm_data::{CsvSource, DataView, RenderConfig, UpdateOptions};
use pm_views::LegendModel;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render tabular point data onto a headless map")]
struct Args {
    /// Input data: DataView JSON (.json), CSV with `name:role` headers (.csv)
    /// or an Arrow IPC file (.arrow)
    input: PathBuf,

    /// Render configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Property pane objects JSON, e.g. {"api": {"accessToken": "..."}}
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Access token; overrides the one in the settings
    #[arg(long)]
    access_token: Option<String>,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Print the legend as HTML instead of the JSON report
    #[arg(long)]
    legend_html: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RenderConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let mut options = load_input(&args.input, &args)?;
    apply_settings(&mut options, &args)?;

    let legend = LegendModel::new();
    let mut visual = MapVisual::new(
        HeadlessMap::new(args.width, args.height),
        legend.clone(),
        config,
    )?;

    let now = Instant::now();
    let mut outcome = visual.update(&options)?;
    if let UpdateOutcome::Deferred(kind) = outcome {
        if let Some(event) = MapEvent::signal(kind) {
            if visual.emit(event, now)? {
                outcome = UpdateOutcome::Rendered;
            }
        }
    }
    info!("Update finished: {:?}", outcome);

    if args.legend_html {
        println!("{}", legend.to_html());
        return Ok(());
    }

    let map = visual.map();
    let sources: serde_json::Map<String, Value> = map
        .geojson_sources()
        .map(|(id, source)| (id.to_string(), source.to_json()))
        .collect();
    let camera = map.camera();
    let report = json!({
        "outcome": outcome,
        "features": visual.data().map_or(0, |data| data.features.len()),
        "max_size": visual.data().map_or(0.0, |data| data.max_size),
        "sources": sources,
        "layers": map
            .layer_ids()
            .into_iter()
            .filter_map(|id| map.layer(id))
            .collect::<Vec<_>>(),
        "legend": legend.snapshot(),
        "camera": {
            "center": [camera.center.lng, camera.center.lat],
            "zoom": camera.zoom,
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_input(path: &Path, args: &Args) -> Result<UpdateOptions> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let options = match extension.as_deref() {
        Some("json") => load_update_options(path)?,
        Some("csv") => {
            if !args.delimiter.is_ascii() {
                bail!("CSV delimiter must be a single ASCII character");
            }
            let table = CsvSource::new(path.to_path_buf())
                .with_delimiter(args.delimiter as u8)
                .load()?;
            UpdateOptions::single(DataView::new(table, Value::Null))
        }
        Some("arrow") | Some("ipc") | Some("feather") => {
            UpdateOptions::single(DataView::new(load_ipc(path)?, Value::Null))
        }
        _ => bail!("Unsupported input {}: expected .json, .csv or .arrow", path.display()),
    };
    Ok(options)
}

/// Overlay settings from the command line onto every data view
fn apply_settings(options: &mut UpdateOptions, args: &Args) -> Result<()> {
    let mut objects = match &args.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings {}", path.display()))?;
            Some(serde_json::from_str::<Value>(&text).context("Settings are not valid JSON")?)
        }
        None => None,
    };

    if let Some(token) = &args.access_token {
        let base = objects.take().unwrap_or_else(|| json!({}));
        objects = Some(with_token(base, token));
    }

    if let Some(objects) = objects {
        for view in &mut options.data_views {
            view.metadata.objects = match std::mem::take(&mut view.metadata.objects) {
                Value::Object(mut existing) => {
                    if let Value::Object(overlay) = &objects {
                        for (key, value) in overlay {
                            existing.insert(key.clone(), value.clone());
                        }
                    }
                    Value::Object(existing)
                }
                _ => objects.clone(),
            };
        }
    }
    Ok(())
}

fn with_token(mut objects: Value, token: &str) -> Value {
    if !objects.is_object() {
        objects = json!({});
    }
    let api = &mut objects["api"];
    if !api.is_object() {
        *api = json!({});
    }
    api["accessToken"] = Value::String(token.to_string());
    objects
}
