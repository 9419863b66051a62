//! Headless command line front end

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use ps_camera::ConfigError;
use ps_core::MapError;

use crate::config::EditorConfig;
use crate::document::Document;

/// Viewport the headless snapshot is taken for
pub const SNAPSHOT_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// Frame length used while settling the camera (ms)
const TICK: u32 = 16;

/// Upper bound on ticks spent settling the camera
const MAX_TICKS: usize = 1024;

/// Parsed command line
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "polysphere")]
#[command(about = "Settle the camera on a globe map and print a JSON snapshot")]
pub struct Options {
    /// Map file to open; the seed map when absent
    pub map: Option<PathBuf>,

    /// RON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// JSON snapshot of a settled document
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Map name
    pub name: String,
    /// Camera uniform as 48 floats (U, V, fragment + position)
    pub camera: Vec<f32>,
    /// Viewport pixel of every vertex facing the camera
    pub hotspots: Vec<Option<Vec2>>,
    /// Border vertices
    pub points: Vec<[f32; 3]>,
}

/// Load the document described by `options` and settle its camera
pub fn run(options: &Options) -> Result<Snapshot, CliError> {
    let config = match &options.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let mut document = match &options.map {
        Some(path) => Document::open(path, &config)?,
        None => Document::new(ps_core::Map::default(), &config),
    };

    document.set_viewport(SNAPSHOT_VIEWPORT);
    let mut ticks = 0;
    while document.editor().plane().phase().is_some() && ticks < MAX_TICKS {
        document.process(TICK);
        ticks += 1;
    }
    if document.pop().is_none() {
        tracing::warn!("Camera could not be derived for the snapshot viewport");
    }
    tracing::info!("Camera settled after {} ticks", ticks);

    let floats: [f32; 48] = bytemuck::cast(document.frame().uniform);
    Ok(Snapshot {
        name: document.map().name.clone(),
        camera: floats.to_vec(),
        hotspots: document.editor().hotspots().to_vec(),
        points: document.map().points().iter().map(|p| p.to_array()).collect(),
    })
}

impl Snapshot {
    /// Pretty JSON text
    pub fn to_json(&self) -> Result<String, CliError> {
        serde_json::to_string_pretty(self).map_err(|e| CliError::Output(e.to_string()))
    }
}

/// Command line errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Map error: {0}")]
    Map(#[from] MapError),
    #[error("Output error: {0}")]
    Output(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let options = Options::try_parse_from(["polysphere"]).unwrap();
        assert_eq!(options, Options::default());

        let options =
            Options::try_parse_from(["polysphere", "world.ron", "--config", "editor.ron"]).unwrap();
        assert_eq!(options.map, Some(PathBuf::from("world.ron")));
        assert_eq!(options.config, Some(PathBuf::from("editor.ron")));

        let options = Options::try_parse_from(["polysphere", "-c", "editor.ron"]).unwrap();
        assert_eq!(options.map, None);
        assert_eq!(options.config, Some(PathBuf::from("editor.ron")));

        assert!(Options::try_parse_from(["polysphere", "--config"]).is_err());
        assert!(Options::try_parse_from(["polysphere", "--verbose"]).is_err());
        assert!(Options::try_parse_from(["polysphere", "a.ron", "b.ron"]).is_err());
    }

    #[test]
    fn test_seed_snapshot() {
        let snapshot = run(&Options::default()).unwrap();
        assert_eq!(snapshot.camera.len(), 48);
        assert_eq!(snapshot.points.len(), 4);
        assert!(snapshot.hotspots.iter().all(Option::is_some));
        // eye position sits in the last column
        assert_eq!(snapshot.camera[44..48], [0.0, 0.0, 4.0, 1.0]);

        let text = snapshot.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "Untitled Map");
        assert_eq!(value["points"].as_array().unwrap().len(), 4);
        assert_eq!(value["hotspots"][0].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_map() {
        let options = Options {
            map: Some(PathBuf::from("/no/such/map.ron")),
            config: None,
        };
        assert!(matches!(run(&options), Err(CliError::Map(MapError::Io(_)))));
    }
}
