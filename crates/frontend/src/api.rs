use courtside_shared::models::{ShotRequest, ZoneBasic};
use serde::{Deserialize, Serialize};

/// Roster page size requested by the player selector.
pub const ROSTER_PAGE_SIZE: u32 = 100;

/// GraphQL enum value for a zone label.
pub fn zone_enum_name(zone: ZoneBasic) -> &'static str {
    match zone {
        ZoneBasic::RestrictedArea => "RESTRICTED_AREA",
        ZoneBasic::InThePaint => "IN_THE_PAINT",
        ZoneBasic::MidRange => "MID_RANGE",
        ZoneBasic::LeftCorner3 => "LEFT_CORNER_3",
        ZoneBasic::RightCorner3 => "RIGHT_CORNER_3",
        ZoneBasic::AboveTheBreak3 => "ABOVE_THE_BREAK_3",
    }
}

/// Build the variables JSON for a predict query.
pub fn build_predict_variables(req: &ShotRequest) -> serde_json::Value {
    serde_json::json!({
        "input": {
            "locX": req.loc_x,
            "locY": req.loc_y,
            "shotDistance": req.shot_distance,
            "shotType": req.shot_type.points(),
            "shotZoneBasic": zone_enum_name(req.shot_zone_basic),
            "playerName": req.player_name,
        }
    })
}

/// Build the variables JSON for the roster query. Blank searches are dropped.
pub fn build_players_variables(search: Option<&str>) -> serde_json::Value {
    let search = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| serde_json::Value::String(s.to_string()))
        .unwrap_or(serde_json::Value::Null);
    serde_json::json!({ "perPage": ROSTER_PAGE_SIZE, "search": search })
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

fn api_url() -> Result<String, String> {
    let origin = web_sys::window()
        .ok_or("no window")?
        .location()
        .origin()
        .map_err(|_| "no origin".to_string())?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;

    if let Some(errors) = gql_resp.errors {
        if let Some(first) = errors.into_iter().next() {
            return Err(first.message);
        }
    }

    gql_resp.data.ok_or_else(|| "No data returned".to_string())
}

// Types mirroring the GraphQL schema

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub id: u32,
    pub name: String,
    pub team: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<u32>,
}

impl PlayerData {
    /// "Name (TEAM)" when the team is known.
    pub fn display_name(&self) -> String {
        match &self.team {
            Some(team) => format!("{} ({})", self.name, team),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPageData {
    pub players: Vec<PlayerData>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparableShotsData {
    pub league_avg: f64,
    pub attempts: u32,
    pub makes: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotInfoData {
    pub distance: f64,
    pub shot_type: String,
    pub zone: String,
    pub difficulty: String,
    pub comparable_shots: ComparableShotsData,
    pub league_average: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsData {
    pub fg_percentage: f64,
    pub three_point_percentage: f64,
    pub effective_fg_percentage: f64,
    pub games_played: u32,
    pub minutes_per_game: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionData {
    pub shot_made: bool,
    pub probability: f64,
    pub confidence: String,
    pub shot_info: ShotInfoData,
    pub player_stats: Option<PlayerStatsData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub model_loaded: bool,
}

// API functions

#[derive(Deserialize)]
pub struct PlayersResponse {
    pub players: PlayerPageData,
}

pub async fn fetch_players(search: Option<&str>) -> Result<Vec<PlayerData>, String> {
    let resp: PlayersResponse = query(
        r#"query Players($perPage: Int, $search: String) {
            players(perPage: $perPage, search: $search) {
                players { id name team position jerseyNumber }
                total
            }
        }"#,
        Some(build_players_variables(search)),
    )
    .await?;
    Ok(resp.players.players)
}

#[derive(Deserialize)]
pub struct PredictResponse {
    pub predict: PredictionData,
}

pub async fn predict(req: &ShotRequest) -> Result<PredictionData, String> {
    let resp: PredictResponse = query(
        r#"query Predict($input: ShotInput!) {
            predict(input: $input) {
                shotMade probability confidence
                shotInfo {
                    distance shotType zone difficulty leagueAverage
                    comparableShots { leagueAvg attempts makes }
                }
                playerStats {
                    fgPercentage threePointPercentage effectiveFgPercentage
                    gamesPlayed minutesPerGame
                }
            }
        }"#,
        Some(build_predict_variables(req)),
    )
    .await?;
    Ok(resp.predict)
}

#[derive(Deserialize)]
pub struct HealthResponse {
    pub health: HealthData,
}

pub async fn fetch_health() -> Result<HealthData, String> {
    let resp: HealthResponse = query(r#"query { health { status modelLoaded } }"#, None).await?;
    Ok(resp.health)
}
