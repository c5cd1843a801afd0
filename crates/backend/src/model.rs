use std::collections::HashMap;
use std::path::Path;

use courtside_shared::models::ShotRequest;
use serde::{Deserialize, Serialize};

/// Standard scaler plus coefficients for (LOC_X, LOC_Y, SHOT_DISTANCE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericWeights {
    pub mean: [f64; 3],
    pub scale: [f64; 3],
    pub coef: [f64; 3],
}

/// Logistic-regression shot model exported as plain coefficients.
///
/// Categorical features are one-hot encoded: zone by its coarse group,
/// shot type by point value ("2"/"3"), player by name. A category absent
/// from the tables contributes nothing to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotModel {
    #[serde(default)]
    pub version: Option<String>,
    pub intercept: f64,
    pub numeric: NumericWeights,
    #[serde(default)]
    pub zone: HashMap<String, f64>,
    #[serde(default)]
    pub shot_type: HashMap<String, f64>,
    #[serde(default)]
    pub player: HashMap<String, f64>,
}

impl ShotModel {
    pub fn load(path: &Path) -> Result<Self, String> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let model: ShotModel = serde_json::from_str(&data)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
        model.check()?;

        tracing::info!(
            path = %path.display(),
            players = model.player.len(),
            version = model.version.as_deref().unwrap_or("unversioned"),
            "Loaded shot model"
        );
        Ok(model)
    }

    fn check(&self) -> Result<(), String> {
        let all = std::iter::once(self.intercept)
            .chain(self.numeric.mean)
            .chain(self.numeric.scale)
            .chain(self.numeric.coef)
            .chain(self.zone.values().copied())
            .chain(self.shot_type.values().copied())
            .chain(self.player.values().copied());
        for v in all {
            if !v.is_finite() {
                return Err("model contains non-finite weights".to_string());
            }
        }
        Ok(())
    }

    /// Linear score before the sigmoid.
    pub fn decision_function(&self, req: &ShotRequest) -> f64 {
        let raw = [req.loc_x, req.loc_y, req.shot_distance];
        let mut z = self.intercept;
        for i in 0..3 {
            // Zero-variance features are passed through unscaled.
            let scale = if self.numeric.scale[i] == 0.0 {
                1.0
            } else {
                self.numeric.scale[i]
            };
            z += self.numeric.coef[i] * (raw[i] - self.numeric.mean[i]) / scale;
        }

        let shot_type = req.shot_type.points().to_string();
        z += self.zone.get(req.shot_zone_basic.group()).copied().unwrap_or(0.0);
        z += self.shot_type.get(&shot_type).copied().unwrap_or(0.0);
        z += self.player.get(&req.player_name).copied().unwrap_or(0.0);
        z
    }

    /// Probability that the shot is made.
    pub fn predict_proba(&self, req: &ShotRequest) -> f64 {
        sigmoid(self.decision_function(req))
    }

    /// Make probability and the made/missed call at the 0.5 threshold.
    pub fn predict(&self, req: &ShotRequest) -> (f64, bool) {
        let probability = self.predict_proba(req);
        (probability, probability >= 0.5)
    }

    pub fn knows_player(&self, name: &str) -> bool {
        self.player.contains_key(name)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use courtside_shared::models::{ShotType, ZoneBasic};

    pub(crate) fn sample_model() -> ShotModel {
        serde_json::from_value(serde_json::json!({
            "version": "test",
            "intercept": 0.1,
            "numeric": {
                "mean": [0.0, 100.0, 12.0],
                "scale": [100.0, 80.0, 8.0],
                "coef": [0.0, -0.1, -0.5]
            },
            "zone": { "Paint": 0.4, "Mid": -0.1, "Corner": 0.05, "Arc": -0.05 },
            "shot_type": { "2": 0.05, "3": -0.05 },
            "player": { "Stephen Curry": 0.3, "Ben Wallace": -0.6 }
        }))
        .unwrap()
    }

    pub(crate) fn request(player: &str, distance: f64, zone: ZoneBasic) -> ShotRequest {
        ShotRequest {
            loc_x: 0.0,
            loc_y: distance * 10.0,
            shot_distance: distance,
            shot_type: ShotType::for_zone(zone),
            shot_zone_basic: zone,
            player_name: player.to_string(),
        }
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_probability_in_unit_interval() {
        let m = sample_model();
        for d in [0.0, 5.0, 15.0, 25.0, 45.0] {
            let p = m.predict_proba(&request("Stephen Curry", d, ZoneBasic::MidRange));
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_probability_monotonic_in_score() {
        let m = sample_model();
        let near = request("Joel Embiid", 4.0, ZoneBasic::MidRange);
        let far = request("Joel Embiid", 20.0, ZoneBasic::MidRange);
        assert!(m.decision_function(&near) > m.decision_function(&far));
        assert!(m.predict_proba(&near) > m.predict_proba(&far));
    }

    #[test]
    fn test_unknown_player_contributes_nothing() {
        let m = sample_model();
        let known = request("Stephen Curry", 10.0, ZoneBasic::MidRange);
        let unknown = request("Someone Else", 10.0, ZoneBasic::MidRange);
        let diff = m.decision_function(&known) - m.decision_function(&unknown);
        assert!((diff - 0.3).abs() < 1e-9);
        assert!(m.knows_player("Stephen Curry"));
        assert!(!m.knows_player("Someone Else"));
    }

    #[test]
    fn test_zone_group_weights_apply() {
        let m = sample_model();
        let paint = request("X", 6.0, ZoneBasic::InThePaint);
        let ra = request("X", 6.0, ZoneBasic::RestrictedArea);
        // Both collapse to the same group.
        assert_eq!(m.decision_function(&paint), m.decision_function(&ra));
    }

    #[test]
    fn test_predict_threshold() {
        let m = sample_model();
        let req = request("Stephen Curry", 1.0, ZoneBasic::RestrictedArea);
        let (probability, made) = m.predict(&req);
        assert_eq!(probability, m.predict_proba(&req));
        assert_eq!(made, probability >= 0.5);
    }

    #[test]
    fn test_load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShotModel::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn test_load_round_trips_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, serde_json::to_string(&sample_model()).unwrap()).unwrap();
        assert_eq!(ShotModel::load(&path).unwrap(), sample_model());
    }

    #[test]
    fn test_shipped_model_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/model.json");
        let model = ShotModel::load(&path).unwrap();
        assert!(model.knows_player("LeBron James"));
    }
}
