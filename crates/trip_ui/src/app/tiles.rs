//! Background fetch and caching of the vector base-map tiles. Each missing
//! tile is fetched on its own short-lived thread and delivered over a
//! channel; the UI drains results once per frame. A tile that failed stays
//! in the error map and is never refetched.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use trip_core::trips::LonLat;

mod mvt;

/// Slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// Road linework of one decoded tile, in WGS84.
#[derive(Debug, Clone)]
pub struct TileGeometry {
    pub lines: Vec<Vec<LonLat>>,
}

struct TileResult {
    key: TileKey,
    geometry: Result<TileGeometry, String>,
}

const MAX_INFLIGHT: usize = 8;
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TileCache {
    tiles: HashMap<TileKey, TileGeometry>,
    inflight: HashSet<TileKey>,
    errors: HashMap<TileKey, String>,
    sender: Sender<TileResult>,
    receiver: Receiver<TileResult>,
}

impl TileCache {
    pub fn new() -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        Self {
            tiles: HashMap::new(),
            inflight: HashSet::new(),
            errors: HashMap::new(),
            sender,
            receiver,
        }
    }

    /// Move finished fetches from the channel into the cache.
    pub fn drain_results(&mut self) {
        while let Ok(result) = self.receiver.try_recv() {
            self.inflight.remove(&result.key);
            match result.geometry {
                Ok(geometry) => {
                    self.tiles.insert(result.key, geometry);
                }
                Err(error) => {
                    log::warn!(
                        "tile {}/{}/{} failed: {error}",
                        result.key.z,
                        result.key.x,
                        result.key.y
                    );
                    self.errors.insert(result.key, error);
                }
            }
        }
    }

    /// Spawn fetches for tiles we have neither cached, in flight, nor
    /// already failed. At most [`MAX_INFLIGHT`] requests run at once.
    pub fn request_missing<I>(&mut self, url_template: &str, keys: I)
    where
        I: IntoIterator<Item = TileKey>,
    {
        for key in keys {
            if self.inflight.len() >= MAX_INFLIGHT {
                break;
            }
            if self.tiles.contains_key(&key)
                || self.inflight.contains(&key)
                || self.errors.contains_key(&key)
            {
                continue;
            }
            self.inflight.insert(key);
            let url = tile_url(url_template, key);
            let sender = self.sender.clone();
            std::thread::spawn(move || {
                let geometry = fetch_tile(&url, key);
                let _ = sender.send(TileResult { key, geometry });
            });
        }
    }

    pub fn tile(&self, key: &TileKey) -> Option<&TileGeometry> {
        self.tiles.get(key)
    }

    pub fn has_inflight(&self) -> bool {
        !self.inflight.is_empty()
    }
}

/// Substitute the `{z}`/`{x}`/`{y}` placeholders of a tile URL template.
pub fn tile_url(template: &str, key: TileKey) -> String {
    template
        .replace("{z}", &key.z.to_string())
        .replace("{x}", &key.x.to_string())
        .replace("{y}", &key.y.to_string())
}

fn fetch_tile(url: &str, key: TileKey) -> Result<TileGeometry, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|error| error.to_string())?;
    let response = client.get(url).send().map_err(|error| error.to_string())?;
    if !response.status().is_success() {
        return Err(format!("status {}", response.status()));
    }
    let bytes = response.bytes().map_err(|error| error.to_string())?;
    mvt::decode_lines(key, &bytes)
}

/// Web-Mercator x index of a longitude at the given zoom.
fn lon_to_x(lon: f64, zoom: u8) -> f64 {
    let n = (1u32 << zoom) as f64;
    ((lon + 180.0) / 360.0) * n
}

/// Web-Mercator y index of a latitude at the given zoom.
fn lat_to_y(lat: f64, zoom: u8) -> f64 {
    let lat = lat.clamp(-85.05112878, 85.05112878).to_radians();
    let n = (1u32 << zoom) as f64;
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) * 0.5 * n
}

/// Geographic bounds of the viewport, used for projection and tile cover.
#[derive(Debug, Clone, Copy)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    pub fn is_valid(&self) -> bool {
        self.lat_max > self.lat_min && self.lon_max > self.lon_min
    }
}

fn tile_span(bounds: &GeoBounds, zoom: u8) -> (i64, i64, i64, i64) {
    let x_min = lon_to_x(bounds.lon_min, zoom).floor() as i64;
    let x_max = lon_to_x(bounds.lon_max, zoom).floor() as i64;
    let y_min = lat_to_y(bounds.lat_max, zoom).floor() as i64;
    let y_max = lat_to_y(bounds.lat_min, zoom).floor() as i64;
    (x_min, x_max, y_min, y_max)
}

/// Deepest zoom in 12..=16 whose tile cover of `bounds` stays small.
pub fn choose_tile_zoom(bounds: &GeoBounds) -> u8 {
    let mut chosen = 12u8;
    for zoom in 12u8..=16u8 {
        let (x_min, x_max, y_min, y_max) = tile_span(bounds, zoom);
        let count = (x_max - x_min + 1).max(0) * (y_max - y_min + 1).max(0);
        if count <= 12 {
            chosen = zoom;
        }
    }
    chosen
}

/// Every tile at `zoom` intersecting `bounds`.
pub fn tiles_for_bounds(bounds: &GeoBounds, zoom: u8) -> Vec<TileKey> {
    let (x_min, x_max, y_min, y_max) = tile_span(bounds, zoom);
    let max_index = (1u32 << zoom).saturating_sub(1) as i64;
    let mut keys = Vec::new();
    for x in x_min.clamp(0, max_index)..=x_max.clamp(0, max_index) {
        for y in y_min.clamp(0, max_index)..=y_max.clamp(0, max_index) {
            keys.push(TileKey {
                z: zoom,
                x: x as u32,
                y: y as u32,
            });
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_template_substitution() {
        let key = TileKey { z: 13, x: 3900, y: 3070 };
        assert_eq!(
            tile_url("https://tiles.example/{z}/{x}/{y}.mvt", key),
            "https://tiles.example/13/3900/3070.mvt"
        );
    }

    #[test]
    fn tile_cover_includes_the_center_tile() {
        let bounds = GeoBounds {
            lat_min: 41.10,
            lat_max: 41.20,
            lon_min: -8.70,
            lon_max: -8.55,
        };
        let zoom = choose_tile_zoom(&bounds);
        let keys = tiles_for_bounds(&bounds, zoom);
        assert!(!keys.is_empty());

        let center_x = lon_to_x(-8.61, zoom).floor() as u32;
        let center_y = lat_to_y(41.15, zoom).floor() as u32;
        assert!(keys
            .iter()
            .any(|key| key.x == center_x && key.y == center_y));
    }

    #[test]
    fn zoom_choice_stays_in_range() {
        let bounds = GeoBounds {
            lat_min: 41.149,
            lat_max: 41.151,
            lon_min: -8.611,
            lon_max: -8.609,
        };
        let zoom = choose_tile_zoom(&bounds);
        assert!((12..=16).contains(&zoom));
    }
}
