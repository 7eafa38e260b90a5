pub const MAP_PANEL_HEIGHT: f32 = 520.0;
pub const CHART_HEIGHT: f32 = 240.0;
pub const PIE_PANEL_HEIGHT: f32 = 240.0;

/// Screen-space distance within which hovering counts as "on the path".
pub const HOVER_RADIUS_PX: f32 = 6.0;

pub const DEFAULT_TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";
