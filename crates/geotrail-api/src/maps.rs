//! Map rendering.
//!
//! Pure presentation: given locations or tracks with their ordered
//! points, produce a self-contained Leaflet HTML page. No validation or
//! entity logic belongs here.

use geotrail_core::{Location, Track, TrackPoint};

const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Colors cycled across tracks on the multi-track map.
const TRACK_COLORS: &[&str] = &["blue", "red", "green", "purple", "orange", "darkcyan"];

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wrap map-building JavaScript in a complete Leaflet page.
fn leaflet_page(title: &str, center: (f64, f64), zoom: u8, body_js: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('{tiles}', {{ attribution: '{attribution}' }}).addTo(map);
{body_js}
</script>
</body>
</html>"#,
        title = html_escape(title),
        lat = center.0,
        lon = center.1,
        zoom = zoom,
        tiles = TILE_URL,
        attribution = TILE_ATTRIBUTION,
        body_js = body_js,
    )
}

fn coords_json(points: &[TrackPoint]) -> String {
    let pairs: Vec<[f64; 2]> = points.iter().map(|p| [p.latitude, p.longitude]).collect();
    serde_json::to_string(&pairs).unwrap_or_else(|_| "[]".to_string())
}

fn centroid(points: &[TrackPoint]) -> (f64, f64) {
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.longitude).sum::<f64>() / n;
    (lat, lon)
}

/// Map with a single marker at the given location.
pub fn location_map(location: &Location) -> String {
    let body = format!(
        "L.marker([{lat}, {lon}]).addTo(map).bindPopup('<b>{name}</b>');",
        lat = location.latitude,
        lon = location.longitude,
        name = html_escape(&location.name),
    );
    leaflet_page(&location.name, (location.latitude, location.longitude), 15, &body)
}

/// Map with one track drawn as a polyline plus start and end markers.
/// Returns a placeholder fragment when the track has no points.
pub fn track_map(track: &Track, points: &[TrackPoint]) -> String {
    if points.is_empty() {
        return "<p>No track data to display</p>".to_string();
    }

    let coords = coords_json(points);
    let mut body = format!(
        "var coords = {coords};\n\
         L.polyline(coords, {{ color: 'blue', weight: 3, opacity: 0.8 }}).addTo(map);\n"
    );
    if points.len() >= 2 {
        body.push_str(&format!(
            "L.marker(coords[0]).addTo(map).bindPopup('<b>Start</b><br>{name}');\n\
             L.marker(coords[coords.length - 1]).addTo(map).bindPopup('<b>End</b><br>{name}');\n",
            name = html_escape(&track.name),
        ));
    }
    body.push_str("map.fitBounds(L.polyline(coords).getBounds());");

    leaflet_page(&track.name, centroid(points), 13, &body)
}

/// Map with every given track drawn in its own color.
pub fn multi_track_map(tracks: &[(Track, Vec<TrackPoint>)]) -> String {
    let all_points: Vec<TrackPoint> = tracks
        .iter()
        .flat_map(|(_, points)| points.iter().cloned())
        .collect();
    if all_points.is_empty() {
        return "<p>No track data to display</p>".to_string();
    }

    let mut body = String::new();
    for (i, (track, points)) in tracks.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = TRACK_COLORS[i % TRACK_COLORS.len()];
        body.push_str(&format!(
            "L.polyline({coords}, {{ color: '{color}', weight: 3, opacity: 0.8 }})\
             .addTo(map).bindTooltip('{name}');\n",
            coords = coords_json(points),
            name = html_escape(&track.name),
        ));
    }

    leaflet_page("Tracks", centroid(&all_points), 11, &body)
}

/// Map with a marker per stored location.
pub fn locations_map(locations: &[Location]) -> String {
    if locations.is_empty() {
        return "<p>No location data to display</p>".to_string();
    }

    let mut body = String::new();
    for location in locations {
        body.push_str(&format!(
            "L.marker([{lat}, {lon}]).addTo(map).bindPopup('<b>{name}</b>');\n",
            lat = location.latitude,
            lon = location.longitude,
            name = html_escape(&location.name),
        ));
    }

    let n = locations.len() as f64;
    let center = (
        locations.iter().map(|l| l.latitude).sum::<f64>() / n,
        locations.iter().map(|l| l.longitude).sum::<f64>() / n,
    );
    leaflet_page("Locations", center, 11, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn location(name: &str, lat: f64, lon: f64) -> Location {
        Location {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            timestamp: Utc::now(),
        }
    }

    fn track(name: &str) -> Track {
        Track {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
            points_count: None,
        }
    }

    fn point(lat: f64, lon: f64) -> TrackPoint {
        TrackPoint {
            id: 0,
            track_id: Uuid::nil(),
            latitude: lat,
            longitude: lon,
            timestamp: Utc::now(),
            altitude: None,
            speed: None,
        }
    }

    #[test]
    fn test_location_map_contains_marker() {
        let html = location_map(&location("Home", 48.85, 2.35));
        assert!(html.contains("L.marker([48.85, 2.35])"));
        assert!(html.contains("<b>Home</b>"));
        assert!(html.contains("leaflet"));
    }

    #[test]
    fn test_location_map_escapes_name() {
        let html = location_map(&location("<script>alert(1)</script>", 0.0, 0.0));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_track_map_empty_placeholder() {
        let html = track_map(&track("Empty"), &[]);
        assert_eq!(html, "<p>No track data to display</p>");
    }

    #[test]
    fn test_track_map_polyline_and_markers() {
        let points = [point(10.0, 20.0), point(10.5, 20.5), point(11.0, 21.0)];
        let html = track_map(&track("Ride"), &points);
        assert!(html.contains("L.polyline"));
        assert!(html.contains("[10.0,20.0]") || html.contains("[10,20]"));
        assert!(html.contains("<b>Start</b>"));
        assert!(html.contains("<b>End</b>"));
    }

    #[test]
    fn test_multi_track_map_cycles_colors() {
        let tracks: Vec<(Track, Vec<TrackPoint>)> = (0..3)
            .map(|i| {
                (
                    track(&format!("t{i}")),
                    vec![point(i as f64, 0.0), point(i as f64 + 0.1, 0.1)],
                )
            })
            .collect();
        let html = multi_track_map(&tracks);
        assert!(html.contains("'blue'"));
        assert!(html.contains("'red'"));
        assert!(html.contains("'green'"));
    }

    #[test]
    fn test_locations_map_empty_placeholder() {
        assert_eq!(locations_map(&[]), "<p>No location data to display</p>");
    }
}
