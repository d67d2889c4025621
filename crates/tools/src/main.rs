use std::path::PathBuf;

use clap::{Parser, Subcommand};
use styling::DisplayMode;
use tools::{
    StyleRequest, build_style, classify, feature_from_tags, load_config, mode_listing,
    parse_origin, parse_tag, resolve_city,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "citystyle", version, about = "Generate 3D Tiles building styles")]
struct Cli {
    /// Viewer config JSON; built-in city presets when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tile style for a display mode
    Style {
        /// by-height, by-distance, by-type, highlight-school, show-residential
        mode: DisplayMode,
        /// City index or name
        #[arg(long, default_value = "0")]
        city: String,
        /// Distance origin as LAT,LON; defaults to the city landmark
        #[arg(long)]
        origin: Option<String>,
        /// Residential type for show-residential
        #[arg(long)]
        residential: Option<String>,
        #[arg(long)]
        compact: bool,
    },
    /// Evaluate a style against a feature given as KEY=VALUE tags
    Classify {
        mode: DisplayMode,
        #[arg(long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,
        #[arg(long, default_value = "0")]
        city: String,
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        residential: Option<String>,
    },
    /// List the configured city presets
    Cities,
    /// List display modes with their dropdown index
    Modes,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    config.validate().map_err(|e| e.to_string())?;
    let cities = &config.cities;

    match cli.command {
        Command::Style {
            mode,
            city,
            origin,
            residential,
            compact,
        } => {
            let req = StyleRequest {
                mode,
                city: resolve_city(cities, &city)?,
                origin: origin.as_deref().map(parse_origin).transpose()?,
                residential,
            };
            info!(mode = %req.mode, city = req.city, "generating style");
            let style = build_style(cities, &req)?;
            let json = style.to_json_string(!compact).map_err(|e| e.to_string())?;
            println!("{json}");
        }
        Command::Classify {
            mode,
            tags,
            city,
            origin,
            residential,
        } => {
            let tags = tags
                .iter()
                .map(|t| parse_tag(t))
                .collect::<Result<Vec<_>, _>>()?;
            let req = StyleRequest {
                mode,
                city: resolve_city(cities, &city)?,
                origin: origin.as_deref().map(parse_origin).transpose()?,
                residential,
            };
            let style = build_style(cities, &req)?;
            let out = classify(mode, style.evaluate(&feature_from_tags(&tags)));
            let json = serde_json::to_string_pretty(&out).map_err(|e| e.to_string())?;
            println!("{json}");
        }
        Command::Cities => {
            for (i, c) in cities.iter().enumerate() {
                println!(
                    "{i}\t{}\t{:.5},{:.5}\talt {:.0} m\tlandmark {:.5},{:.5}",
                    c.name,
                    c.pose.position.lat_deg,
                    c.pose.position.lon_deg,
                    c.pose.alt_m,
                    c.landmark.lat_deg,
                    c.landmark.lon_deg,
                );
            }
        }
        Command::Modes => {
            for line in mode_listing() {
                println!("{line}");
            }
        }
    }
    Ok(())
}
