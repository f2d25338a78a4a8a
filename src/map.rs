//! Map view model: one clustered marker per earthquake plus view settings.

use serde::Serialize;

use crate::config::{MapBounds, MapConfig};
use crate::types::EarthquakeEvent;

/// Popup HTML for a marker. `place` comes from the input table and is escaped.
pub fn popup_label(place: &str, distance_km: f64) -> String {
    let place = escape_html(place);
    format!("Location: {place}<br>Distance to Nearest Fracking Site (km): {distance_km:.2}")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// `[lat, lon]`
    pub location: [f64; 2],
    pub popup: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniMap {
    pub toggle_display: bool,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom_start: u8,
    /// `[[south, west], [north, east]]`
    pub max_bounds: [[f64; 2]; 2],
    pub control_scale: bool,
    pub cluster_markers: bool,
    pub popup_max_width: u32,
    pub minimap: MiniMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_geojson_url: Option<String>,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    pub fn build(events: &[EarthquakeEvent], config: &MapConfig) -> Self {
        let MapBounds { south, west, north, east } = config.bounds;
        let boundary = config.boundary_geojson_url.trim();
        Self {
            center: [config.center_latitude, config.center_longitude],
            zoom_start: config.zoom_start,
            max_bounds: [[south, west], [north, east]],
            control_scale: true,
            cluster_markers: config.cluster_markers,
            popup_max_width: config.popup_max_width,
            minimap: MiniMap {
                toggle_display: config.minimap_toggle,
                position: config.minimap_position.clone(),
            },
            boundary_geojson_url: (!boundary.is_empty()).then(|| boundary.to_string()),
            markers: events
                .iter()
                .map(|e| MapMarker {
                    location: e.location.to_lat_lon(),
                    popup: popup_label(&e.place, e.nearest_site_distance_km),
                    state: e.state.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeoPoint;

    #[test]
    fn test_popup_label_two_decimals() {
        assert_eq!(
            popup_label("5 km N of Pawnee, Oklahoma", 1.23456),
            "Location: 5 km N of Pawnee, Oklahoma<br>Distance to Nearest Fracking Site (km): 1.23"
        );
        assert!(popup_label("x", 2.0).ends_with("2.00"));
    }

    #[test]
    fn test_popup_label_escapes_place() {
        let label = popup_label("<img src=x onerror=alert(1)> & \"co\"", 1.0);
        assert_eq!(
            label,
            "Location: &lt;img src=x onerror=alert(1)&gt; &amp; &quot;co&quot;<br>Distance to Nearest Fracking Site (km): 1.00"
        );
        assert_eq!(label.matches("<br>").count(), 1);
    }

    #[test]
    fn test_build_default_view() {
        let events = vec![EarthquakeEvent {
            id: "a".into(),
            location: GeoPoint::new(32.0, -97.0).unwrap(),
            magnitude: Some(3.2),
            place: "A".into(),
            state: "TX".into(),
            nearest_site_distance_km: 1.5,
            nearest_site_index: Some(0),
        }];
        let view = MapView::build(&events, &MapConfig::default());
        assert_eq!(view.center, [28.8283, -98.5795]);
        assert_eq!(view.zoom_start, 5);
        assert_eq!(view.max_bounds, [[24.396308, -125.0], [49.384358, -66.934570]]);
        assert_eq!(view.minimap.position, "bottomright");
        assert!(view.minimap.toggle_display);
        assert!(view.cluster_markers);
        assert!(view.boundary_geojson_url.is_some());
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.markers[0].location, [32.0, -97.0]);
        assert!(view.markers[0].popup.contains("1.50"));
    }

    #[test]
    fn test_blank_boundary_url_is_omitted() {
        let config = MapConfig {
            boundary_geojson_url: String::new(),
            ..MapConfig::default()
        };
        assert!(MapView::build(&[], &config).boundary_geojson_url.is_none());
    }
}
