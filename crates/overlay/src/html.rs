//! Self-contained Leaflet page

use crate::layer::OverlayLayer;
use crate::legend::{escape_html, Legend};
use avaterrain_core::{Error, Result};
use serde::Serialize;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Base tile layers offered in the layer control; the first is shown initially
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BaseLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
}

pub const BASE_LAYERS: &[BaseLayer] = &[
    BaseLayer {
        name: "OpenStreetMap",
        url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution: "&copy; OpenStreetMap contributors",
    },
    BaseLayer {
        name: "Esri Topo",
        url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}",
        attribution: "Esri",
    },
];

#[derive(Serialize)]
struct MapConfig<'a> {
    center: [f64; 2],
    zoom: u8,
    base_layers: &'a [BaseLayer],
    overlay: &'a OverlayLayer,
}

/// Render the full HTML page for one overlay layer.
pub fn render_page(
    layer: &OverlayLayer,
    legend: &Legend,
    center: (f64, f64),
    zoom: u8,
) -> Result<String> {
    let config = MapConfig {
        center: [center.0, center.1],
        zoom,
        base_layers: BASE_LAYERS,
        overlay: layer,
    };
    let json = serde_json::to_string(&config)
        .map_err(|e| Error::Other(format!("Cannot serialize map config: {}", e)))?
        // keep the script block closed only by its own tag
        .replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="{css}">
<script src="{js}"></script>
<style>html, body, #map {{ width: 100%; height: 100%; margin: 0; padding: 0; }}</style>
</head>
<body>
<div id="map"></div>
{legend}<script>
const config = {json};
const map = L.map("map").setView(config.center, config.zoom);
const baseLayers = {{}};
config.base_layers.forEach(function (base, i) {{
  const tiles = L.tileLayer(base.url, {{ attribution: base.attribution, maxZoom: 18 }});
  if (i === 0) {{ tiles.addTo(map); }}
  baseLayers[base.name] = tiles;
}});
const overlay = L.imageOverlay(config.overlay.image, config.overlay.bounds, {{
  opacity: config.overlay.opacity,
  interactive: false,
  zIndex: 1
}}).addTo(map);
const overlays = {{}};
overlays[config.overlay.name] = overlay;
L.control.layers(baseLayers, overlays).addTo(map);
</script>
</body>
</html>
"#,
        title = escape_html(&legend.title),
        css = LEAFLET_CSS,
        js = LEAFLET_JS,
        legend = legend.to_html(),
        json = json,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str) -> OverlayLayer {
        OverlayLayer {
            name: name.to_string(),
            bounds: [[56.0, -5.5], [58.0, -2.8]],
            opacity: 0.6,
            image: "data:image/png;base64,AAAA".to_string(),
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn page_has_layers_and_legend() {
        let html = render_page(&layer("Slope Angle"), &Legend::default(), (57.0, -5.0), 8).unwrap();
        assert!(html.contains("\"center\":[57.0,-5.0]"));
        assert!(html.contains("\"zoom\":8"));
        assert!(html.contains("World_Topo_Map"));
        assert!(html.contains("OpenStreetMap"));
        assert!(html.contains("\"opacity\":0.6"));
        assert!(html.contains("L.control.layers"));
        assert!(html.contains("Avalanche Terrain Risk"));
    }

    #[test]
    fn script_cannot_be_closed_by_name() {
        let html = render_page(&layer("</script><b>"), &Legend::default(), (0.0, 0.0), 3).unwrap();
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
