use serde::{Deserialize, Serialize};

/// Pixel offsets inside a drawing surface, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPosition {
    pub x: f64,
    pub y: f64,
}

/// Real-world court coordinates in feet.
/// `x` is the distance from the baseline, `y` the distance from the sideline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtPosition {
    pub x: f64,
    pub y: f64,
}

/// Shot-chart coordinates used by the prediction model: tenths of a foot,
/// `x` centered on the basket (negative = left), `y` measured up from the
/// baseline origin. Never interchangeable with [`CourtPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsPosition {
    pub x: i32,
    pub y: i32,
}

/// Pixel box of a drawing surface paired with the court extents it shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtDimensions {
    pub width: f64,
    pub height: f64,
    pub court_length_feet: f64,
    pub court_width_feet: f64,
}

pub const FULL_COURT_LENGTH_FT: f64 = 94.0;
pub const HALF_COURT_LENGTH_FT: f64 = 47.0;
pub const COURT_WIDTH_FT: f64 = 50.0;

impl CourtDimensions {
    /// Full court (94 x 50 ft) drawn into a `width` x `height` pixel box.
    pub fn full_court(width: f64, height: f64) -> Self {
        CourtDimensions {
            width,
            height,
            court_length_feet: FULL_COURT_LENGTH_FT,
            court_width_feet: COURT_WIDTH_FT,
        }
    }

    /// Half court (47 x 50 ft), the convention used by the click handler.
    pub fn half_court(width: f64, height: f64) -> Self {
        CourtDimensions {
            width,
            height,
            court_length_feet: HALF_COURT_LENGTH_FT,
            court_width_feet: COURT_WIDTH_FT,
        }
    }

    /// Same court extents, different pixel box.
    pub fn with_pixel_size(self, width: f64, height: f64) -> Self {
        CourtDimensions {
            width,
            height,
            ..self
        }
    }
}

/// One weighted heatmap sample. A missing weight means "league average".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub years_pro: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ShotTypeRepr", into = "String")]
pub enum ShotType {
    TwoPoint,
    ThreePoint,
}

/// Wire form of [`ShotType`]: either the numeric point value or the label.
#[derive(Deserialize)]
#[serde(untagged)]
enum ShotTypeRepr {
    Points(i64),
    Label(String),
}

impl TryFrom<ShotTypeRepr> for ShotType {
    type Error = String;

    fn try_from(repr: ShotTypeRepr) -> Result<Self, Self::Error> {
        match repr {
            ShotTypeRepr::Points(2) => Ok(ShotType::TwoPoint),
            ShotTypeRepr::Points(3) => Ok(ShotType::ThreePoint),
            ShotTypeRepr::Points(_) => Err("Shot type must be 2 or 3".to_string()),
            ShotTypeRepr::Label(label) => ShotType::from_label(&label).ok_or_else(|| {
                "Shot type must be '2PT Field Goal' or '3PT Field Goal'".to_string()
            }),
        }
    }
}

impl From<ShotType> for String {
    fn from(t: ShotType) -> Self {
        t.label().to_string()
    }
}

impl ShotType {
    pub fn label(self) -> &'static str {
        match self {
            ShotType::TwoPoint => "2PT Field Goal",
            ShotType::ThreePoint => "3PT Field Goal",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "2PT Field Goal" => Some(ShotType::TwoPoint),
            "3PT Field Goal" => Some(ShotType::ThreePoint),
            _ => None,
        }
    }

    pub fn points(self) -> u8 {
        match self {
            ShotType::TwoPoint => 2,
            ShotType::ThreePoint => 3,
        }
    }
}

impl std::fmt::Display for ShotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Zone labels of the shot-chart schema the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneBasic {
    #[serde(rename = "Restricted Area")]
    RestrictedArea,
    #[serde(rename = "In The Paint (Non-RA)")]
    InThePaint,
    #[serde(rename = "Mid-Range")]
    MidRange,
    #[serde(rename = "Left Corner 3")]
    LeftCorner3,
    #[serde(rename = "Right Corner 3")]
    RightCorner3,
    #[serde(rename = "Above the Break 3")]
    AboveTheBreak3,
}

impl ZoneBasic {
    pub fn label(self) -> &'static str {
        match self {
            ZoneBasic::RestrictedArea => "Restricted Area",
            ZoneBasic::InThePaint => "In The Paint (Non-RA)",
            ZoneBasic::MidRange => "Mid-Range",
            ZoneBasic::LeftCorner3 => "Left Corner 3",
            ZoneBasic::RightCorner3 => "Right Corner 3",
            ZoneBasic::AboveTheBreak3 => "Above the Break 3",
        }
    }

    /// Coarse grouping the model's one-hot encoder was fitted on.
    pub fn group(self) -> &'static str {
        match self {
            ZoneBasic::RestrictedArea | ZoneBasic::InThePaint => "Paint",
            ZoneBasic::MidRange => "Mid",
            ZoneBasic::LeftCorner3 | ZoneBasic::RightCorner3 => "Corner",
            ZoneBasic::AboveTheBreak3 => "Arc",
        }
    }

    pub fn is_three(self) -> bool {
        matches!(
            self,
            ZoneBasic::LeftCorner3 | ZoneBasic::RightCorner3 | ZoneBasic::AboveTheBreak3
        )
    }

    pub fn is_paint(self) -> bool {
        matches!(self, ZoneBasic::RestrictedArea | ZoneBasic::InThePaint)
    }
}

impl std::fmt::Display for ZoneBasic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Payload sent to the prediction service. Field names match the model schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRequest {
    #[serde(rename = "LOC_X")]
    pub loc_x: f64,
    #[serde(rename = "LOC_Y")]
    pub loc_y: f64,
    #[serde(rename = "SHOT_DISTANCE")]
    pub shot_distance: f64,
    #[serde(rename = "SHOT_TYPE")]
    pub shot_type: ShotType,
    #[serde(rename = "SHOT_ZONE_BASIC")]
    pub shot_zone_basic: ZoneBasic,
    #[serde(rename = "PLAYER_NAME")]
    pub player_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_probability(p: f64) -> Self {
        if p >= 0.7 || p <= 0.3 {
            Confidence::High
        } else if p >= 0.6 || p <= 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableShots {
    pub league_avg: f64,
    pub attempts: u32,
    pub makes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotInfo {
    pub distance: f64,
    pub shot_type: String,
    pub zone: String,
    pub difficulty: String,
    pub comparable_shots: ComparableShots,
    pub league_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotPrediction {
    pub shot_made: bool,
    pub probability: f64,
    pub confidence: Confidence,
    pub shot_info: ShotInfo,
    pub player_stats: Option<PlayerStats>,
}
