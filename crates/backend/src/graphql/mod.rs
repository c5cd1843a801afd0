use std::sync::Arc;

use async_graphql::{Context, Enum, ErrorExtensions, InputObject, Object, SimpleObject};
use courtside_shared::models::{self, ShotType, ZoneBasic};

use crate::state::Services;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(name = "ShotZoneBasic")]
pub enum GqlZone {
    #[graphql(name = "RESTRICTED_AREA")]
    RestrictedArea,
    #[graphql(name = "IN_THE_PAINT")]
    InThePaint,
    #[graphql(name = "MID_RANGE")]
    MidRange,
    #[graphql(name = "LEFT_CORNER_3")]
    LeftCorner3,
    #[graphql(name = "RIGHT_CORNER_3")]
    RightCorner3,
    #[graphql(name = "ABOVE_THE_BREAK_3")]
    AboveTheBreak3,
}

impl From<GqlZone> for ZoneBasic {
    fn from(z: GqlZone) -> Self {
        match z {
            GqlZone::RestrictedArea => ZoneBasic::RestrictedArea,
            GqlZone::InThePaint => ZoneBasic::InThePaint,
            GqlZone::MidRange => ZoneBasic::MidRange,
            GqlZone::LeftCorner3 => ZoneBasic::LeftCorner3,
            GqlZone::RightCorner3 => ZoneBasic::RightCorner3,
            GqlZone::AboveTheBreak3 => ZoneBasic::AboveTheBreak3,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlPlayer {
    pub id: u32,
    pub name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<u32>,
    pub height: Option<String>,
    pub weight: Option<u32>,
    pub years_pro: Option<u32>,
}

impl From<models::Player> for GqlPlayer {
    fn from(p: models::Player) -> Self {
        GqlPlayer {
            id: p.id,
            name: p.name,
            team: p.team,
            position: p.position,
            jersey_number: p.jersey_number,
            height: p.height,
            weight: p.weight,
            years_pro: p.years_pro,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlPlayerPage {
    pub players: Vec<GqlPlayer>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(SimpleObject)]
pub struct GqlComparableShots {
    pub league_avg: f64,
    pub attempts: u32,
    pub makes: u32,
}

#[derive(SimpleObject)]
pub struct GqlShotInfo {
    pub distance: f64,
    pub shot_type: String,
    pub zone: String,
    pub difficulty: String,
    pub comparable_shots: GqlComparableShots,
    pub league_average: f64,
}

#[derive(SimpleObject)]
pub struct GqlPlayerStats {
    pub fg_percentage: f64,
    pub three_point_percentage: f64,
    pub free_throw_percentage: f64,
    pub effective_fg_percentage: f64,
    pub true_shooting_percentage: f64,
    pub games_played: u32,
    pub minutes_per_game: f64,
    pub field_goals_made: f64,
    pub field_goals_attempted: f64,
}

#[derive(SimpleObject)]
pub struct GqlShotPrediction {
    pub shot_made: bool,
    pub probability: f64,
    pub confidence: String,
    pub shot_info: GqlShotInfo,
    pub player_stats: Option<GqlPlayerStats>,
}

impl From<models::ShotPrediction> for GqlShotPrediction {
    fn from(p: models::ShotPrediction) -> Self {
        let info = p.shot_info;
        GqlShotPrediction {
            shot_made: p.shot_made,
            probability: p.probability,
            confidence: p.confidence.to_string(),
            shot_info: GqlShotInfo {
                distance: info.distance,
                shot_type: info.shot_type,
                zone: info.zone,
                difficulty: info.difficulty,
                comparable_shots: GqlComparableShots {
                    league_avg: info.comparable_shots.league_avg,
                    attempts: info.comparable_shots.attempts,
                    makes: info.comparable_shots.makes,
                },
                league_average: info.league_average,
            },
            player_stats: p.player_stats.map(|s| GqlPlayerStats {
                fg_percentage: s.fg_percentage,
                three_point_percentage: s.three_point_percentage,
                free_throw_percentage: s.free_throw_percentage,
                effective_fg_percentage: s.effective_fg_percentage,
                true_shooting_percentage: s.true_shooting_percentage,
                games_played: s.games_played,
                minutes_per_game: s.minutes_per_game,
                field_goals_made: s.field_goals_made,
                field_goals_attempted: s.field_goals_attempted,
            }),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlCount {
    pub key: String,
    pub count: u64,
}

#[derive(SimpleObject)]
pub struct GqlAnalytics {
    pub uptime_seconds: f64,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_predictions: u64,
    pub average_response_time: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub cache_size: u64,
    pub db_size_bytes: u64,
    pub predictions_by_player: Vec<GqlCount>,
    pub predictions_by_zone: Vec<GqlCount>,
}

#[derive(SimpleObject)]
pub struct GqlHealth {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub model_loaded: bool,
    pub uptime_seconds: f64,
}

// Input types

#[derive(InputObject)]
pub struct ShotInput {
    pub loc_x: f64,
    pub loc_y: f64,
    pub shot_distance: f64,
    /// Point value, 2 or 3.
    pub shot_type: i32,
    pub shot_zone_basic: GqlZone,
    pub player_name: String,
}

impl ShotInput {
    fn into_request(self) -> async_graphql::Result<models::ShotRequest> {
        let shot_type = match self.shot_type {
            2 => ShotType::TwoPoint,
            3 => ShotType::ThreePoint,
            other => {
                return Err(crate::error::PredictorError::validation(format!(
                    "Shot type must be 2 or 3, got {other}"
                ))
                .extend())
            }
        };
        Ok(models::ShotRequest {
            loc_x: self.loc_x,
            loc_y: self.loc_y,
            shot_distance: self.shot_distance,
            shot_type,
            shot_zone_basic: self.shot_zone_basic.into(),
            player_name: self.player_name,
        })
    }
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn players(
        &self,
        ctx: &Context<'_>,
        page: Option<u32>,
        per_page: Option<u32>,
        search: Option<String>,
    ) -> async_graphql::Result<GqlPlayerPage> {
        let services = ctx.data::<Arc<Services>>()?;
        let result = services
            .players
            .list(page, per_page, search.as_deref())
            .map_err(|e| e.extend())?;
        Ok(GqlPlayerPage {
            players: result.players.into_iter().map(GqlPlayer::from).collect(),
            total: result.total as u64,
            page: result.page,
            per_page: result.per_page,
        })
    }

    async fn player(
        &self,
        ctx: &Context<'_>,
        name: String,
    ) -> async_graphql::Result<Option<GqlPlayer>> {
        let services = ctx.data::<Arc<Services>>()?;
        Ok(services
            .players
            .find_by_name(&name)
            .ok()
            .cloned()
            .map(GqlPlayer::from))
    }

    async fn predict(
        &self,
        ctx: &Context<'_>,
        input: ShotInput,
    ) -> async_graphql::Result<GqlShotPrediction> {
        let services = ctx.data::<Arc<Services>>()?;
        let req = input.into_request()?;
        let prediction = services.prediction.predict(req).await.map_err(|e| e.extend())?;
        Ok(prediction.into())
    }

    async fn analytics(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlAnalytics> {
        let services = ctx.data::<Arc<Services>>()?;
        let report = services.analytics().map_err(|e| e.extend())?;
        let counts = |m: std::collections::BTreeMap<String, u64>| {
            m.into_iter()
                .map(|(key, count)| GqlCount { key, count })
                .collect()
        };
        Ok(GqlAnalytics {
            uptime_seconds: report.system.uptime_seconds,
            total_requests: report.system.total_requests,
            successful_requests: report.system.successful_requests,
            failed_requests: report.system.failed_requests,
            total_predictions: report.predictions.total_predictions,
            average_response_time: report.predictions.average_response_time,
            cache_hits: report.cache.cache_hits,
            cache_misses: report.cache.cache_misses,
            cache_hit_rate: report.cache.hit_rate,
            cache_size: report.cache.cache_size as u64,
            db_size_bytes: report.db_size_bytes,
            predictions_by_player: counts(report.predictions.predictions_by_player),
            predictions_by_zone: counts(report.predictions.predictions_by_zone),
        })
    }

    async fn health(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlHealth> {
        let services = ctx.data::<Arc<Services>>()?;
        let h = services.health();
        Ok(GqlHealth {
            status: h.status.to_string(),
            timestamp: h.timestamp,
            version: h.version.to_string(),
            model_loaded: h.model_loaded,
            uptime_seconds: h.uptime_seconds,
        })
    }
}

// Mutation root

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn clear_cache(&self, ctx: &Context<'_>) -> async_graphql::Result<bool> {
        let services = ctx.data::<Arc<Services>>()?;
        services.prediction.clear_cache().map_err(|e| e.extend())?;
        Ok(true)
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

pub fn build_schema(services: Arc<Services>) -> Schema {
    async_graphql::Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(services)
        .finish()
}
