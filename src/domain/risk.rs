//! Risk classification of a tree by height and wind

use serde::{Deserialize, Serialize};

/// Height in metres above which a tree is a pruning candidate in strong wind.
pub const HEIGHT_THRESHOLD: f64 = 10.0;
/// Wind speed in km/h above which tall trees should be pruned.
pub const WIND_THRESHOLD: f64 = 30.0;
/// Absolute height ceiling in metres around a WO site.
pub const WO_MAX_HEIGHT: f64 = 20.0;
/// Lower bound in metres of the advisory band below the ceiling.
pub const TOLERANCE_MIN: f64 = 15.0;

/// Fixed thresholds for one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub height_threshold: f64,
    pub wind_threshold: f64,
    pub wo_max_height: f64,
    pub tolerance_min: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            height_threshold: HEIGHT_THRESHOLD,
            wind_threshold: WIND_THRESHOLD,
            wo_max_height: WO_MAX_HEIGHT,
            tolerance_min: TOLERANCE_MIN,
        }
    }
}

impl RiskThresholds {
    /// Check that all thresholds are finite, non-negative and
    /// `tolerance_min <= wo_max_height`.
    pub fn validate(&self) -> Result<(), String> {
        let named = [
            ("height_threshold", self.height_threshold),
            ("wind_threshold", self.wind_threshold),
            ("wo_max_height", self.wo_max_height),
            ("tolerance_min", self.tolerance_min),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if self.tolerance_min > self.wo_max_height {
            return Err(format!(
                "tolerance_min ({}) must not exceed wo_max_height ({})",
                self.tolerance_min, self.wo_max_height
            ));
        }
        Ok(())
    }
}

/// Independent risk flags of one tree. More than one may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskFlags {
    pub prune_recommended: bool,
    pub over_max: bool,
    pub near_limit: bool,
}

/// Assigns risk flags from height and wind speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    pub fn classify(&self, current_height: f64, wind_speed: f64) -> RiskFlags {
        RiskFlags {
            prune_recommended: self.prune_recommended(current_height, wind_speed),
            over_max: self.over_max(current_height),
            near_limit: self.near_limit(current_height),
        }
    }

    /// Strict on both thresholds.
    pub fn prune_recommended(&self, current_height: f64, wind_speed: f64) -> bool {
        current_height > self.thresholds.height_threshold
            && wind_speed > self.thresholds.wind_threshold
    }

    pub fn over_max(&self, current_height: f64) -> bool {
        current_height > self.thresholds.wo_max_height
    }

    /// Inclusive band `[tolerance_min, wo_max_height]`; a tree exactly at the
    /// ceiling is near the limit without being over it.
    pub fn near_limit(&self, current_height: f64) -> bool {
        (self.thresholds.tolerance_min..=self.thresholds.wo_max_height).contains(&current_height)
    }
}

/// Map marker color, derived from height alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Yellow,
    Green,
}

impl MarkerColor {
    /// Red when over the ceiling, yellow inside the advisory band, green otherwise.
    pub fn for_height(current_height: f64, thresholds: &RiskThresholds) -> Self {
        let classifier = RiskClassifier::new(*thresholds);
        if classifier.over_max(current_height) {
            MarkerColor::Red
        } else if classifier.near_limit(current_height) {
            MarkerColor::Yellow
        } else {
            MarkerColor::Green
        }
    }

    /// RGBA fill used by map renderers.
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            MarkerColor::Red => [200, 30, 0, 160],
            MarkerColor::Yellow => [230, 180, 0, 160],
            MarkerColor::Green => [40, 160, 60, 160],
        }
    }
}
