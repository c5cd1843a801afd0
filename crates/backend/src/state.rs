use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::error::PredictorError;
use crate::players::PlayerService;
use crate::prediction::PredictionService;

pub const SERVICE_NAME: &str = "Courtside Shot Predictor";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Request counters maintained by the request-context middleware.
#[derive(Debug, Default)]
pub struct RequestStats {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
}

impl RequestStats {
    pub fn record(&self, success: bool) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn counts(&self) -> (u64, u64, u64) {
        (
            self.total.load(Ordering::Relaxed),
            self.successful.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

/// Everything the REST handlers and GraphQL resolvers share.
pub struct Services {
    pub prediction: PredictionService,
    pub players: Arc<PlayerService>,
    pub requests: RequestStats,
    started: Instant,
}

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub model_loaded: bool,
    pub uptime_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemReport {
    pub uptime_seconds: f64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub total_predictions: u64,
    pub average_response_time: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub predictions_by_player: BTreeMap<String, u64>,
    pub predictions_by_zone: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub cache_size: usize,
    pub capacity: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub hit_rate: f64,
    pub total_requests: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub system: SystemReport,
    pub predictions: PredictionReport,
    pub cache: CacheReport,
    pub db_size_bytes: u64,
}

impl Services {
    pub fn new(prediction: PredictionService, players: Arc<PlayerService>) -> Self {
        Services {
            prediction,
            players,
            requests: RequestStats::default(),
            started: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn health(&self) -> Health {
        let model_loaded = self.prediction.model_loaded();
        Health {
            status: if model_loaded { "healthy" } else { "degraded" },
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: VERSION,
            model_loaded,
            uptime_seconds: self.uptime_seconds(),
        }
    }

    pub fn analytics(&self) -> Result<AnalyticsReport, PredictorError> {
        let snap = self.prediction.analytics()?;
        let cache = self.prediction.cache_stats()?;
        let (total, successful, failed) = self.requests.counts();

        Ok(AnalyticsReport {
            system: SystemReport {
                uptime_seconds: self.uptime_seconds(),
                total_requests: total,
                successful_requests: successful,
                failed_requests: failed,
                success_rate: successful as f64 / total.max(1) as f64,
            },
            predictions: PredictionReport {
                total_predictions: snap.total_predictions,
                average_response_time: snap.average_response_secs(),
                cache_hits: snap.cache_hits,
                cache_misses: snap.cache_misses,
                predictions_by_player: snap.by_player.clone(),
                predictions_by_zone: snap.by_zone.clone(),
            },
            cache: CacheReport {
                cache_size: cache.size,
                capacity: cache.capacity,
                cache_hits: cache.hits,
                cache_misses: cache.misses,
                hit_rate: cache.hit_rate,
                total_requests: cache.hits + cache.misses,
            },
            db_size_bytes: self.prediction.db_size_bytes()?,
        })
    }
}
