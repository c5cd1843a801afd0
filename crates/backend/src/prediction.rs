use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use courtside_shared::models::{
    ComparableShots, Confidence, PlayerStats, ShotInfo, ShotPrediction, ShotRequest, ShotType,
    ZoneBasic,
};
use courtside_shared::shots::league_percentage_at;

use crate::error::PredictorError;
use crate::model::ShotModel;
use crate::players::PlayerService;
use crate::storage::{AnalyticsSnapshot, Storage};

const LOC_X_RANGE: std::ops::RangeInclusive<f64> = -300.0..=300.0;
const LOC_Y_RANGE: std::ops::RangeInclusive<f64> = 0.0..=500.0;
const DISTANCE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=50.0;
const MAX_NAME_LEN: usize = 100;

const COMPARABLE_ATTEMPTS: u32 = 1500;
const LEAGUE_THREE_PCT: f64 = 0.357;
const LEAGUE_TWO_PCT: f64 = 0.545;

/// Reject payloads outside the ranges the model was trained on.
pub fn validate(req: &ShotRequest) -> Result<(), PredictorError> {
    let mut problems = Vec::new();
    if !LOC_X_RANGE.contains(&req.loc_x) {
        problems.push(format!("LOC_X must be between -300 and 300, got {}", req.loc_x));
    }
    if !LOC_Y_RANGE.contains(&req.loc_y) {
        problems.push(format!("LOC_Y must be between 0 and 500, got {}", req.loc_y));
    }
    if !DISTANCE_RANGE.contains(&req.shot_distance) {
        problems.push(format!(
            "SHOT_DISTANCE must be between 0 and 50, got {}",
            req.shot_distance
        ));
    }
    let name_len = req.player_name.trim().chars().count();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        problems.push(format!("PLAYER_NAME must be 1 to {MAX_NAME_LEN} characters"));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(PredictorError::Validation {
            message: problems.join("; "),
            details: Some(serde_json::json!({ "errors": problems })),
        })
    }
}

/// Cache key over inputs rounded to two decimals.
pub fn cache_key(req: &ShotRequest) -> String {
    format!(
        "{:.2}|{:.2}|{:.2}|{}|{}|{}",
        req.loc_x,
        req.loc_y,
        req.shot_distance,
        req.shot_type.points(),
        req.shot_zone_basic.label(),
        req.player_name
    )
}

pub fn difficulty(distance: f64, zone: ZoneBasic) -> &'static str {
    if distance <= 3.0 {
        "Easy"
    } else if distance <= 10.0 && zone.is_paint() {
        "Moderate"
    } else if distance <= 16.0 {
        "Moderate"
    } else if distance <= 23.0 {
        "Difficult"
    } else {
        "Very Difficult"
    }
}

pub fn comparable_shots(distance: f64) -> ComparableShots {
    let league_avg = league_percentage_at(distance);
    ComparableShots {
        league_avg,
        attempts: COMPARABLE_ATTEMPTS,
        makes: (COMPARABLE_ATTEMPTS as f64 * league_avg) as u32,
    }
}

pub fn league_average(shot_type: ShotType) -> f64 {
    match shot_type {
        ShotType::ThreePoint => LEAGUE_THREE_PCT,
        ShotType::TwoPoint => LEAGUE_TWO_PCT,
    }
}

pub fn shot_info(req: &ShotRequest) -> ShotInfo {
    ShotInfo {
        distance: (req.shot_distance * 10.0).round() / 10.0,
        shot_type: match req.shot_type {
            ShotType::ThreePoint => "3-Pointer".to_string(),
            ShotType::TwoPoint => "2-Pointer".to_string(),
        },
        zone: req.shot_zone_basic.label().to_string(),
        difficulty: difficulty(req.shot_distance, req.shot_zone_basic).to_string(),
        comparable_shots: comparable_shots(req.shot_distance),
        league_average: league_average(req.shot_type),
    }
}

/// Season summary shown next to a prediction for a rostered player.
pub fn season_summary() -> PlayerStats {
    PlayerStats {
        fg_percentage: 0.475,
        three_point_percentage: 0.367,
        free_throw_percentage: 0.832,
        effective_fg_percentage: 0.545,
        true_shooting_percentage: 0.588,
        games_played: 65,
        minutes_per_game: 35.2,
        field_goals_made: 8.5,
        field_goals_attempted: 17.8,
    }
}

/// Bounded prediction cache; the oldest insert is evicted first.
pub struct PredictionCache {
    capacity: usize,
    entries: HashMap<String, ShotPrediction>,
    order: VecDeque<String>,
}

impl PredictionCache {
    pub fn new(capacity: usize) -> Self {
        PredictionCache {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ShotPrediction> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, value: ShotPrediction) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

pub struct PredictionService {
    model: Option<Arc<ShotModel>>,
    players: Arc<PlayerService>,
    storage: Arc<Storage>,
    cache: Mutex<PredictionCache>,
    timeout: Duration,
}

impl PredictionService {
    pub fn new(
        model: Option<ShotModel>,
        players: Arc<PlayerService>,
        storage: Arc<Storage>,
        cache_capacity: usize,
        timeout: Duration,
    ) -> Self {
        PredictionService {
            model: model.map(Arc::new),
            players,
            storage,
            cache: Mutex::new(PredictionCache::new(cache_capacity)),
            timeout,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub async fn predict(&self, req: ShotRequest) -> Result<ShotPrediction, PredictorError> {
        let started = Instant::now();
        validate(&req)?;

        let key = cache_key(&req);
        let cached = self.lock_cache()?.get(&key).cloned();
        if let Some(hit) = cached {
            self.record(&req, started, true)?;
            tracing::debug!(player = %req.player_name, "prediction cache hit");
            return Ok(hit);
        }

        let known_player = self.players.find_by_name(&req.player_name).is_ok();
        if !known_player {
            tracing::warn!(player = %req.player_name, "player not on roster, predicting anyway");
        }

        let model = self
            .model
            .clone()
            .ok_or_else(|| PredictorError::Model("Prediction model is not loaded".to_string()))?;
        if !model.knows_player(&req.player_name) {
            tracing::debug!(player = %req.player_name, "no player coefficient, using baseline");
        }
        let input = req.clone();
        let inference = tokio::task::spawn_blocking(move || model.predict(&input));
        let (probability, shot_made) = match tokio::time::timeout(self.timeout, inference).await {
            Ok(Ok(p)) => p,
            Ok(Err(e)) => return Err(PredictorError::Model(format!("Prediction failed: {e}"))),
            Err(_) => {
                return Err(PredictorError::Model(
                    "Prediction timeout exceeded".to_string(),
                ))
            }
        };

        let prediction = ShotPrediction {
            shot_made,
            probability,
            confidence: Confidence::from_probability(probability),
            shot_info: shot_info(&req),
            player_stats: known_player.then(season_summary),
        };
        self.lock_cache()?.insert(key, prediction.clone());
        self.record(&req, started, false)?;

        tracing::info!(
            player = %req.player_name,
            probability = format_args!("{:.3}", probability),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prediction completed"
        );
        Ok(prediction)
    }

    /// Run one throwaway prediction so the first real request is not cold.
    pub async fn warm_up(&self) {
        let sample = ShotRequest {
            loc_x: 0.0,
            loc_y: 10.0,
            shot_distance: 10.0,
            shot_type: ShotType::TwoPoint,
            shot_zone_basic: ZoneBasic::MidRange,
            player_name: "LeBron James".to_string(),
        };
        let Some(model) = self.model.clone() else {
            tracing::warn!("model warm-up skipped: no model loaded");
            return;
        };
        match tokio::task::spawn_blocking(move || model.predict_proba(&sample)).await {
            Ok(p) => tracing::info!(probability = p, "model warm-up completed"),
            Err(e) => tracing::warn!(error = %e, "model warm-up failed"),
        }
    }

    pub fn analytics(&self) -> Result<AnalyticsSnapshot, PredictorError> {
        self.storage.snapshot().map_err(PredictorError::Storage)
    }

    pub fn cache_stats(&self) -> Result<CacheStats, PredictorError> {
        let snap = self.analytics()?;
        let cache = self.lock_cache()?;
        Ok(CacheStats {
            size: cache.len(),
            capacity: cache.capacity,
            hits: snap.cache_hits,
            misses: snap.cache_misses,
            hit_rate: snap.hit_rate(),
        })
    }

    pub fn clear_cache(&self) -> Result<(), PredictorError> {
        self.lock_cache()?.clear();
        tracing::info!("prediction cache cleared");
        Ok(())
    }

    pub fn db_size_bytes(&self) -> Result<u64, PredictorError> {
        self.storage.db_size_bytes().map_err(PredictorError::Storage)
    }

    fn record(
        &self,
        req: &ShotRequest,
        started: Instant,
        cache_hit: bool,
    ) -> Result<(), PredictorError> {
        self.storage
            .record_prediction(
                &req.player_name,
                req.shot_zone_basic.label(),
                started.elapsed().as_micros() as u64,
                cache_hit,
            )
            .map_err(PredictorError::Storage)
    }

    fn lock_cache(&self) -> Result<std::sync::MutexGuard<'_, PredictionCache>, PredictorError> {
        self.cache.lock().map_err(|_| {
            PredictorError::ServiceUnavailable("prediction cache poisoned".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{request, sample_model};
    use crate::players::fallback_roster;

    fn service(model: Option<ShotModel>) -> (tempfile::TempDir, PredictionService) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("analytics.redb")).unwrap();
        let players = Arc::new(PlayerService::from_players(fallback_roster()));
        let svc = PredictionService::new(model, players, storage, 4, Duration::from_secs(5));
        (dir, svc)
    }

    #[test]
    fn test_validate_accepts_range_edges() {
        let mut req = request("Ja Morant", 50.0, ZoneBasic::AboveTheBreak3);
        req.loc_x = -300.0;
        req.loc_y = 500.0;
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut req = request("Ja Morant", 10.0, ZoneBasic::MidRange);
        req.loc_x = 301.0;
        req.shot_distance = 50.5;
        let err = validate(&req).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("LOC_X"));
        assert!(err.to_string().contains("SHOT_DISTANCE"));
    }

    #[test]
    fn test_validate_rejects_blank_and_long_names() {
        assert!(validate(&request("   ", 10.0, ZoneBasic::MidRange)).is_err());
        let long = "x".repeat(101);
        assert!(validate(&request(&long, 10.0, ZoneBasic::MidRange)).is_err());
    }

    #[test]
    fn test_cache_key_rounds_inputs() {
        let mut a = request("Klay Thompson", 20.0, ZoneBasic::MidRange);
        let mut b = a.clone();
        a.loc_x = 12.3441;
        b.loc_x = 12.3449;
        assert_eq!(cache_key(&a), cache_key(&b));
        b.loc_x = 12.36;
        assert_ne!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn test_difficulty_ladder() {
        assert_eq!(difficulty(2.0, ZoneBasic::RestrictedArea), "Easy");
        assert_eq!(difficulty(8.0, ZoneBasic::InThePaint), "Moderate");
        assert_eq!(difficulty(14.0, ZoneBasic::MidRange), "Moderate");
        assert_eq!(difficulty(20.0, ZoneBasic::MidRange), "Difficult");
        assert_eq!(difficulty(26.0, ZoneBasic::AboveTheBreak3), "Very Difficult");
    }

    #[test]
    fn test_shot_info_fields() {
        let info = shot_info(&request("X", 24.06, ZoneBasic::AboveTheBreak3));
        assert_eq!(info.distance, 24.1);
        assert_eq!(info.shot_type, "3-Pointer");
        assert_eq!(info.zone, "Above the Break 3");
        assert_eq!(info.league_average, 0.357);
        assert_eq!(info.comparable_shots.attempts, 1500);
        assert_eq!(info.comparable_shots.makes, 525);
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let mut cache = PredictionCache::new(2);
        let p = ShotPrediction {
            shot_made: true,
            probability: 0.6,
            confidence: Confidence::Medium,
            shot_info: shot_info(&request("X", 5.0, ZoneBasic::MidRange)),
            player_stats: None,
        };
        cache.insert("a".into(), p.clone());
        cache.insert("b".into(), p.clone());
        cache.insert("c".into(), p);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
    }

    #[tokio::test]
    async fn test_predict_returns_probability() {
        let (_dir, svc) = service(Some(sample_model()));
        let pred = svc
            .predict(request("Stephen Curry", 24.0, ZoneBasic::AboveTheBreak3))
            .await
            .unwrap();
        assert!((0.0..=1.0).contains(&pred.probability));
        assert_eq!(pred.shot_made, pred.probability >= 0.5);
        assert_eq!(pred.confidence, Confidence::from_probability(pred.probability));
        assert!(pred.player_stats.is_some());
    }

    #[tokio::test]
    async fn test_prediction_matches_model_call() {
        let (_dir, svc) = service(Some(sample_model()));
        let req = request("Stephen Curry", 1.0, ZoneBasic::RestrictedArea);
        let (probability, made) = sample_model().predict(&req);
        let pred = svc.predict(req).await.unwrap();
        assert_eq!(pred.probability, probability);
        assert_eq!(pred.shot_made, made);
    }

    #[tokio::test]
    async fn test_unknown_player_predicted_without_stats() {
        let (_dir, svc) = service(Some(sample_model()));
        let pred = svc
            .predict(request("Pickup Legend", 12.0, ZoneBasic::MidRange))
            .await
            .unwrap();
        assert!(pred.player_stats.is_none());
    }

    #[tokio::test]
    async fn test_identical_request_hits_cache() {
        let (_dir, svc) = service(Some(sample_model()));
        let req = request("Kevin Durant", 15.0, ZoneBasic::MidRange);
        let first = svc.predict(req.clone()).await.unwrap();
        let second = svc.predict(req).await.unwrap();
        assert_eq!(first, second);

        let stats = svc.cache_stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);

        let snap = svc.analytics().unwrap();
        assert_eq!(snap.total_predictions, 2);
        assert_eq!(snap.by_player["Kevin Durant"], 2);
        assert_eq!(snap.by_zone["Mid-Range"], 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_miss() {
        let (_dir, svc) = service(Some(sample_model()));
        let req = request("Kevin Durant", 15.0, ZoneBasic::MidRange);
        svc.predict(req.clone()).await.unwrap();
        svc.clear_cache().unwrap();
        svc.predict(req).await.unwrap();
        assert_eq!(svc.cache_stats().unwrap().misses, 2);
    }

    #[tokio::test]
    async fn test_missing_model_is_unavailable() {
        let (_dir, svc) = service(None);
        assert!(!svc.model_loaded());
        let err = svc
            .predict(request("LeBron James", 10.0, ZoneBasic::MidRange))
            .await
            .unwrap_err();
        assert!(matches!(err, PredictorError::Model(_)));
        assert_eq!(err.status(), axum::http::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_validation_runs_before_model() {
        let (_dir, svc) = service(None);
        let mut req = request("LeBron James", 10.0, ZoneBasic::MidRange);
        req.loc_y = -5.0;
        let err = svc.predict(req).await.unwrap_err();
        assert!(matches!(err, PredictorError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_warm_up_without_model_is_harmless() {
        let (_dir, svc) = service(None);
        svc.warm_up().await;
        assert_eq!(svc.analytics().unwrap().total_predictions, 0);
    }
}
