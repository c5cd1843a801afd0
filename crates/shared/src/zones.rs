//! Zone classification in shot-chart analytics units, used when a click is
//! turned into a prediction request.
//!
//! This ladder is independent of [`crate::court::shot_zone`]: the thresholds
//! differ and it works on [`AnalyticsPosition`], not court feet.

use crate::court::screen_to_court;
use crate::models::{
    AnalyticsPosition, CourtDimensions, ScreenPosition, ShotRequest, ShotType, ZoneBasic,
};

/// Analytics units per foot.
pub const UNITS_PER_FOOT: f64 = 10.0;

const RESTRICTED_AREA_FT: f64 = 4.0;
const PAINT_FT: f64 = 8.0;
const THREE_POINT_FT: f64 = 23.75;

// Corner-three box in analytics units.
const CORNER_MIN_ABS_X: i32 = 200;
const CORNER_MAX_Y: i32 = 150;

fn raw_distance_feet(pos: AnalyticsPosition) -> f64 {
    (pos.x as f64).hypot(pos.y as f64) / UNITS_PER_FOOT
}

/// Distance from the basket (analytics origin) in feet, one decimal.
pub fn shot_distance_feet(pos: AnalyticsPosition) -> f64 {
    (raw_distance_feet(pos) * 10.0).round() / 10.0
}

/// Zone ladder on the unrounded distance, so a spot just past a boundary
/// never rounds back inside it.
pub fn classify_analytics(pos: AnalyticsPosition) -> ZoneBasic {
    let distance = raw_distance_feet(pos);
    if distance <= RESTRICTED_AREA_FT {
        ZoneBasic::RestrictedArea
    } else if distance <= PAINT_FT {
        ZoneBasic::InThePaint
    } else if distance > THREE_POINT_FT {
        if pos.x.abs() > CORNER_MIN_ABS_X && pos.y < CORNER_MAX_Y {
            if pos.x < 0 {
                ZoneBasic::LeftCorner3
            } else {
                ZoneBasic::RightCorner3
            }
        } else {
            ZoneBasic::AboveTheBreak3
        }
    } else {
        ZoneBasic::MidRange
    }
}

impl ShotType {
    pub fn for_zone(zone: ZoneBasic) -> Self {
        if zone.is_three() {
            ShotType::ThreePoint
        } else {
            ShotType::TwoPoint
        }
    }
}

impl ShotRequest {
    /// Build the prediction payload for a click on the court surface.
    pub fn from_click(screen: ScreenPosition, dims: &CourtDimensions, player_name: &str) -> Self {
        let pos = screen_to_court(screen, dims);
        Self::from_analytics(pos, player_name)
    }

    pub fn from_analytics(pos: AnalyticsPosition, player_name: &str) -> Self {
        let zone = classify_analytics(pos);
        ShotRequest {
            loc_x: pos.x as f64,
            loc_y: pos.y as f64,
            shot_distance: shot_distance_feet(pos),
            shot_type: ShotType::for_zone(zone),
            shot_zone_basic: zone,
            player_name: player_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32) -> AnalyticsPosition {
        AnalyticsPosition { x, y }
    }

    #[test]
    fn test_shot_distance_rounds_to_tenth() {
        assert_eq!(shot_distance_feet(at(30, 40)), 5.0);
        assert_eq!(shot_distance_feet(at(0, 0)), 0.0);
        assert_eq!(shot_distance_feet(at(10, 10)), 1.4);
    }

    #[test]
    fn test_classify_ladder() {
        assert_eq!(classify_analytics(at(0, 40)), ZoneBasic::RestrictedArea);
        assert_eq!(classify_analytics(at(0, 41)), ZoneBasic::InThePaint);
        assert_eq!(classify_analytics(at(0, 80)), ZoneBasic::InThePaint);
        assert_eq!(classify_analytics(at(0, 81)), ZoneBasic::MidRange);
        assert_eq!(classify_analytics(at(0, 237)), ZoneBasic::MidRange);
        assert_eq!(classify_analytics(at(0, 240)), ZoneBasic::AboveTheBreak3);
    }

    #[test]
    fn test_classify_uses_unrounded_distance() {
        // 4.0199 ft reports as 4.0 but sits outside the restricted area.
        assert_eq!(shot_distance_feet(at(4, 40)), 4.0);
        assert_eq!(classify_analytics(at(4, 40)), ZoneBasic::InThePaint);
        // 8.0156 ft reports as 8.0 but is already mid-range.
        assert_eq!(shot_distance_feet(at(5, 80)), 8.0);
        assert_eq!(classify_analytics(at(5, 80)), ZoneBasic::MidRange);
    }

    #[test]
    fn test_classify_corners() {
        assert_eq!(classify_analytics(at(-240, 50)), ZoneBasic::LeftCorner3);
        assert_eq!(classify_analytics(at(240, 50)), ZoneBasic::RightCorner3);
        // Deep enough but above the corner box.
        assert_eq!(classify_analytics(at(240, 150)), ZoneBasic::AboveTheBreak3);
    }

    #[test]
    fn test_corner_box_alone_is_not_a_three() {
        // |x| > 200 and y < 150 but within 23.75 ft stays mid-range.
        assert_eq!(classify_analytics(at(210, 60)), ZoneBasic::MidRange);
    }

    #[test]
    fn test_shot_type_follows_zone() {
        assert_eq!(ShotType::for_zone(ZoneBasic::LeftCorner3), ShotType::ThreePoint);
        assert_eq!(ShotType::for_zone(ZoneBasic::AboveTheBreak3), ShotType::ThreePoint);
        assert_eq!(ShotType::for_zone(ZoneBasic::MidRange), ShotType::TwoPoint);
        assert_eq!(ShotType::for_zone(ZoneBasic::RestrictedArea), ShotType::TwoPoint);
    }

    #[test]
    fn test_request_from_center_click() {
        let dims = CourtDimensions::half_court(500.0, 470.0);
        let click = ScreenPosition { x: 250.0, y: 235.0 };
        let req = ShotRequest::from_click(click, &dims, "LeBron James");
        assert_eq!(req.loc_x, 0.0);
        assert_eq!(req.loc_y, 225.0);
        assert_eq!(req.shot_distance, 22.5);
        assert_eq!(req.shot_zone_basic, ZoneBasic::MidRange);
        assert_eq!(req.shot_type, ShotType::TwoPoint);
        assert_eq!(req.player_name, "LeBron James");
    }

    #[test]
    fn test_request_from_deep_click_is_three() {
        let dims = CourtDimensions::half_court(500.0, 470.0);
        // Right edge, vertical center: analytics (0, 400) = 40 ft.
        let click = ScreenPosition { x: 500.0, y: 235.0 };
        let req = ShotRequest::from_click(click, &dims, "Stephen Curry");
        assert_eq!(req.shot_zone_basic, ZoneBasic::AboveTheBreak3);
        assert_eq!(req.shot_type, ShotType::ThreePoint);
    }
}
