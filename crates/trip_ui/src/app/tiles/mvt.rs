//! Minimal Mapbox Vector Tile decoding: just enough protobuf schema to pull
//! line-string geometry out of every layer, converted to WGS84.

use trip_core::trips::LonLat;

use super::{TileGeometry, TileKey};

#[derive(Clone, PartialEq, ::prost::Message)]
struct VectorTile {
    #[prost(message, repeated, tag = "3")]
    layers: Vec<Layer>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct Layer {
    #[prost(string, tag = "1")]
    name: String,
    #[prost(message, repeated, tag = "2")]
    features: Vec<Feature>,
    #[prost(uint32, tag = "5")]
    extent: u32,
    #[prost(uint32, tag = "15")]
    version: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct Feature {
    #[prost(uint64, tag = "1")]
    id: u64,
    #[prost(enumeration = "GeomType", tag = "3")]
    geom_type: i32,
    #[prost(uint32, repeated, packed = "true", tag = "4")]
    geometry: Vec<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ::prost::Enumeration)]
#[repr(i32)]
enum GeomType {
    Unknown = 0,
    Point = 1,
    Linestring = 2,
    Polygon = 3,
}

/// Decode every line-string feature of every layer in the tile.
pub(crate) fn decode_lines(key: TileKey, data: &[u8]) -> Result<TileGeometry, String> {
    use prost::Message;

    let tile = VectorTile::decode(data).map_err(|error| error.to_string())?;
    let mut lines = Vec::new();
    for layer in &tile.layers {
        let extent = if layer.extent == 0 {
            4096.0
        } else {
            f64::from(layer.extent)
        };
        for feature in &layer.features {
            if feature.geom_type != GeomType::Linestring as i32 {
                continue;
            }
            for line in decode_command_stream(&feature.geometry) {
                lines.push(
                    line.into_iter()
                        .map(|(x, y)| tile_point_to_lon_lat(key, f64::from(x), f64::from(y), extent))
                        .collect(),
                );
            }
        }
    }
    Ok(TileGeometry { lines })
}

// Command ids per the MVT spec: 1 = MoveTo, 2 = LineTo, 7 = ClosePath.
fn decode_command_stream(geometry: &[u32]) -> Vec<Vec<(i32, i32)>> {
    let mut lines: Vec<Vec<(i32, i32)>> = Vec::new();
    let mut cursor = 0usize;
    let mut x = 0i32;
    let mut y = 0i32;
    while cursor < geometry.len() {
        let command = geometry[cursor];
        cursor += 1;
        let id = command & 0x7;
        let count = command >> 3;
        match id {
            1 => {
                for _ in 0..count {
                    let Some(pair) = read_pair(geometry, cursor) else {
                        break;
                    };
                    x += pair.0;
                    y += pair.1;
                    cursor += 2;
                    lines.push(vec![(x, y)]);
                }
            }
            2 => {
                for _ in 0..count {
                    let Some(pair) = read_pair(geometry, cursor) else {
                        break;
                    };
                    x += pair.0;
                    y += pair.1;
                    cursor += 2;
                    if let Some(current) = lines.last_mut() {
                        current.push((x, y));
                    }
                }
            }
            7 => {}
            _ => break,
        }
    }
    lines
}

fn read_pair(geometry: &[u32], cursor: usize) -> Option<(i32, i32)> {
    if cursor + 1 >= geometry.len() {
        return None;
    }
    Some((
        decode_zigzag(geometry[cursor]),
        decode_zigzag(geometry[cursor + 1]),
    ))
}

fn decode_zigzag(value: u32) -> i32 {
    ((value >> 1) as i32) ^ (-((value & 1) as i32))
}

fn tile_point_to_lon_lat(key: TileKey, x: f64, y: f64, extent: f64) -> LonLat {
    let n = (1u32 << key.z) as f64;
    let gx = (f64::from(key.x) + x / extent) / n;
    let gy = (f64::from(key.y) + y / extent) / n;
    let lon = gx * 360.0 - 180.0;
    let lat = (std::f64::consts::PI * (1.0 - 2.0 * gy))
        .sinh()
        .atan()
        .to_degrees();
    LonLat::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_roundtrip() {
        assert_eq!(decode_zigzag(0), 0);
        assert_eq!(decode_zigzag(1), -1);
        assert_eq!(decode_zigzag(2), 1);
        assert_eq!(decode_zigzag(3), -2);
        assert_eq!(decode_zigzag(4), 2);
    }

    #[test]
    fn command_stream_decodes_a_two_segment_line() {
        // MoveTo(1,1), LineTo (+2,0), (+0,+3): command words are
        // (count << 3) | id, coordinates zigzag-encoded.
        let geometry = vec![
            (1 << 3) | 1, // MoveTo, count 1
            2,            // +1
            2,            // +1
            (2 << 3) | 2, // LineTo, count 2
            4,            // +2
            0,            // 0
            0,            // 0
            6,            // +3
        ];
        let lines = decode_command_stream(&geometry);
        assert_eq!(lines, vec![vec![(1, 1), (3, 1), (3, 4)]]);
    }

    #[test]
    fn truncated_stream_does_not_panic() {
        let geometry = vec![(3 << 3) | 2, 4];
        let lines = decode_command_stream(&geometry);
        assert!(lines.is_empty());
    }

    #[test]
    fn tile_origin_maps_to_tile_corner() {
        let key = TileKey { z: 0, x: 0, y: 0 };
        let corner = tile_point_to_lon_lat(key, 0.0, 0.0, 4096.0);
        assert!((corner.lon - -180.0).abs() < 1e-9);
        assert!(corner.lat > 85.0);
    }
}
