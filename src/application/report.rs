//! Evaluation results and the views derived from them

use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{EvaluatedTree, MarkerColor, RiskThresholds, Site, UnevaluableTree};

/// Initial map zoom level around a site.
pub const MAP_ZOOM: u8 = 14;
/// Initial map camera pitch in degrees.
pub const MAP_PITCH: u8 = 50;

/// Outcome of evaluating one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub site: Site,
    pub evaluation_year: i32,
    pub wind_speed_kmh: f64,
    pub thresholds: RiskThresholds,
    /// Evaluated trees in catalog order
    pub trees: Vec<EvaluatedTree>,
    /// Trees excluded from all risk tables
    pub unevaluable: Vec<UnevaluableTree>,
}

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub current_height: f64,
    pub color: MarkerColor,
}

/// Initial camera position for the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewCenter {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub pitch: u8,
}

impl EvaluationReport {
    pub fn prune_recommended(&self) -> Vec<&EvaluatedTree> {
        self.trees.iter().filter(|t| t.prune_recommended).collect()
    }

    pub fn over_max(&self) -> Vec<&EvaluatedTree> {
        self.trees.iter().filter(|t| t.over_max).collect()
    }

    pub fn near_limit(&self) -> Vec<&EvaluatedTree> {
        self.trees.iter().filter(|t| t.near_limit).collect()
    }

    pub fn has_unevaluable(&self) -> bool {
        !self.unevaluable.is_empty()
    }

    /// Markers for all evaluated trees, colored by height.
    pub fn map_layer(&self) -> Vec<MapPoint> {
        self.trees
            .iter()
            .map(|t| MapPoint {
                id: t.id.clone(),
                latitude: t.latitude,
                longitude: t.longitude,
                current_height: t.current_height,
                color: MarkerColor::for_height(t.current_height, &self.thresholds),
            })
            .collect()
    }

    /// Mean position of the evaluated trees; `None` without any.
    pub fn view_center(&self) -> Option<ViewCenter> {
        if self.trees.is_empty() {
            return None;
        }
        let n = self.trees.len() as f64;
        let latitude = self.trees.iter().map(|t| t.latitude).sum::<f64>() / n;
        let longitude = self.trees.iter().map(|t| t.longitude).sum::<f64>() / n;
        Some(ViewCenter {
            latitude,
            longitude,
            zoom: MAP_ZOOM,
            pitch: MAP_PITCH,
        })
    }

    /// Map layer as a GeoJSON FeatureCollection with a `view` member.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .map_layer()
            .into_iter()
            .map(|p| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [p.longitude, p.latitude],
                    },
                    "properties": {
                        "id": p.id,
                        "current_height": p.current_height,
                        "color": p.color.rgba(),
                        "tier": p.color,
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "site": self.site.name,
            "view": self.view_center(),
            "features": features,
        })
    }
}
