//! Court coordinate mapping.
//!
//! Three spaces meet here: screen pixels (origin top-left), court feet
//! (origin at the baseline/sideline corner) and shot-chart analytics units
//! (tenths of a foot, centered on the basket).
//!
//! The court SVG is drawn with the baseline on the left edge, while the
//! model's shot charts put the baseline at the bottom. `screen_to_court`
//! therefore swaps axes: the vertical screen input becomes the horizontal
//! analytics axis and vice versa.

use crate::models::{AnalyticsPosition, CourtDimensions, CourtPosition, ScreenPosition};

/// Half-width of the analytics x axis (sideline to sideline is 500 units).
pub const ANALYTICS_HALF_SPAN_X: f64 = 250.0;
/// Analytics y value at the left screen edge.
pub const ANALYTICS_BASELINE_Y: f64 = 50.0;
/// Analytics y units covered by the full screen width.
pub const ANALYTICS_SPAN_Y: f64 = 350.0;

// Basket anchors in the full-court (94 x 50 ft) convention.
pub const LEFT_BASKET: CourtPosition = CourtPosition { x: 10.0, y: 25.0 };
pub const RIGHT_BASKET: CourtPosition = CourtPosition { x: 84.0, y: 25.0 };

// Zone thresholds in feet, measured from the right basket.
const RESTRICTED_AREA_FT: f64 = 8.0;
const PAINT_FT: f64 = 16.0;
const THREE_POINT_FT: f64 = 23.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasketSide {
    Left,
    Right,
}

impl BasketSide {
    pub fn anchor(self) -> CourtPosition {
        match self {
            BasketSide::Left => LEFT_BASKET,
            BasketSide::Right => RIGHT_BASKET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotZone {
    RestrictedArea,
    Paint,
    MidRange,
    ThreePoint,
}

impl ShotZone {
    pub fn label(self) -> &'static str {
        match self {
            ShotZone::RestrictedArea => "Restricted Area",
            ShotZone::Paint => "Paint",
            ShotZone::MidRange => "Mid-range",
            ShotZone::ThreePoint => "Three-point",
        }
    }
}

impl std::fmt::Display for ShotZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Convert a pixel position into shot-chart analytics units.
///
/// Defined for any finite input; callers only pass in-canvas positions.
/// This is not the inverse of [`court_to_screen`].
pub fn screen_to_court(screen: ScreenPosition, dims: &CourtDimensions) -> AnalyticsPosition {
    let nx = screen.x / dims.width;
    let ny = screen.y / dims.height;

    let x = (ny - 0.5) * 2.0 * ANALYTICS_HALF_SPAN_X;
    let y = ANALYTICS_BASELINE_Y + nx * ANALYTICS_SPAN_Y;

    AnalyticsPosition {
        x: x.round() as i32,
        y: y.round() as i32,
    }
}

/// Scale court feet to pixels, each axis independently.
pub fn court_to_screen(court: CourtPosition, dims: &CourtDimensions) -> ScreenPosition {
    ScreenPosition {
        x: court.x * (dims.width / dims.court_length_feet),
        y: court.y * (dims.height / dims.court_width_feet),
    }
}

/// True when both axes lie within the court extents (inclusive).
pub fn is_within_court_bounds(court: CourtPosition, dims: &CourtDimensions) -> bool {
    (0.0..=dims.court_length_feet).contains(&court.x)
        && (0.0..=dims.court_width_feet).contains(&court.y)
}

/// Euclidean distance in feet from the chosen basket.
pub fn distance_from_basket(court: CourtPosition, side: BasketSide) -> f64 {
    let basket = side.anchor();
    let dx = court.x - basket.x;
    let dy = court.y - basket.y;
    (dx * dx + dy * dy).sqrt()
}

/// Direction from `court` to the basket in degrees, range (-180, 180].
pub fn angle_to_basket(court: CourtPosition, side: BasketSide) -> f64 {
    let basket = side.anchor();
    let deg = (basket.y - court.y).atan2(basket.x - court.x).to_degrees();
    if deg <= -180.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// Zone from the distance to the right basket.
pub fn shot_zone(court: CourtPosition) -> ShotZone {
    zone_for_distance(distance_from_basket(court, BasketSide::Right))
}

fn zone_for_distance(distance: f64) -> ShotZone {
    if distance <= RESTRICTED_AREA_FT {
        ShotZone::RestrictedArea
    } else if distance <= PAINT_FT {
        ShotZone::Paint
    } else if distance <= THREE_POINT_FT {
        ShotZone::MidRange
    } else {
        ShotZone::ThreePoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_court() -> CourtDimensions {
        CourtDimensions::full_court(940.0, 500.0)
    }

    #[test]
    fn test_court_to_screen_origin() {
        let p = court_to_screen(CourtPosition { x: 0.0, y: 0.0 }, &full_court());
        assert!((p.x - 0.0).abs() < 1e-9);
        assert!((p.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_court_to_screen_far_corner() {
        let dims = full_court();
        let p = court_to_screen(CourtPosition { x: 94.0, y: 50.0 }, &dims);
        assert!((p.x - dims.width).abs() < 1e-9);
        assert!((p.y - dims.height).abs() < 1e-9);
    }

    #[test]
    fn test_court_to_screen_is_linear_per_axis() {
        let dims = CourtDimensions::half_court(500.0, 470.0);
        let base = CourtPosition { x: 7.5, y: 12.0 };
        let p = court_to_screen(base, &dims);
        for k in [0.5, 2.0, 3.25] {
            let scaled = court_to_screen(
                CourtPosition {
                    x: base.x * k,
                    y: base.y * k,
                },
                &dims,
            );
            assert!((scaled.x - p.x * k).abs() < 1e-9);
            assert!((scaled.y - p.y * k).abs() < 1e-9);
        }
    }

    #[test]
    fn test_screen_to_court_center() {
        let dims = CourtDimensions::half_court(500.0, 470.0);
        let a = screen_to_court(ScreenPosition { x: 250.0, y: 235.0 }, &dims);
        assert_eq!(a, AnalyticsPosition { x: 0, y: 225 });
    }

    #[test]
    fn test_screen_to_court_swaps_axes() {
        let dims = CourtDimensions::half_court(500.0, 470.0);
        // Top-left pixel: far left sideline in analytics x, baseline origin in y.
        let top_left = screen_to_court(ScreenPosition { x: 0.0, y: 0.0 }, &dims);
        assert_eq!(top_left, AnalyticsPosition { x: -250, y: 50 });
        // Bottom-right pixel.
        let bottom_right = screen_to_court(ScreenPosition { x: 500.0, y: 470.0 }, &dims);
        assert_eq!(bottom_right, AnalyticsPosition { x: 250, y: 400 });
    }

    #[test]
    fn test_screen_to_court_outside_canvas_is_still_defined() {
        let dims = CourtDimensions::half_court(500.0, 470.0);
        let a = screen_to_court(ScreenPosition { x: -100.0, y: 940.0 }, &dims);
        assert_eq!(a, AnalyticsPosition { x: 750, y: -20 });
    }

    #[test]
    fn test_screen_to_court_then_court_to_screen_does_not_round_trip() {
        let dims = CourtDimensions::half_court(500.0, 470.0);
        let click = ScreenPosition { x: 250.0, y: 235.0 };
        let analytics = screen_to_court(click, &dims);
        // Feed the analytics values back as if they were feet.
        let back = court_to_screen(
            CourtPosition {
                x: analytics.x as f64,
                y: analytics.y as f64,
            },
            &dims,
        );
        assert_ne!(back, click);
    }

    #[test]
    fn test_bounds_inclusive_corners() {
        let dims = full_court();
        assert!(is_within_court_bounds(CourtPosition { x: 0.0, y: 0.0 }, &dims));
        assert!(is_within_court_bounds(CourtPosition { x: 94.0, y: 50.0 }, &dims));
    }

    #[test]
    fn test_bounds_rejects_outside() {
        let dims = full_court();
        assert!(!is_within_court_bounds(CourtPosition { x: -0.1, y: 10.0 }, &dims));
        assert!(!is_within_court_bounds(CourtPosition { x: 10.0, y: -0.1 }, &dims));
        assert!(!is_within_court_bounds(CourtPosition { x: 94.1, y: 10.0 }, &dims));
        assert!(!is_within_court_bounds(CourtPosition { x: 10.0, y: 50.1 }, &dims));
    }

    #[test]
    fn test_distance_at_basket_is_zero() {
        assert_eq!(distance_from_basket(RIGHT_BASKET, BasketSide::Right), 0.0);
        assert_eq!(distance_from_basket(LEFT_BASKET, BasketSide::Left), 0.0);
    }

    #[test]
    fn test_distance_pythagorean() {
        let p = CourtPosition { x: 81.0, y: 21.0 };
        assert!((distance_from_basket(p, BasketSide::Right) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_cardinal_directions() {
        let right = BasketSide::Right;
        // Basket straight ahead along +x.
        assert!((angle_to_basket(CourtPosition { x: 74.0, y: 25.0 }, right) - 0.0).abs() < 1e-9);
        // Basket along +y.
        assert!((angle_to_basket(CourtPosition { x: 84.0, y: 15.0 }, right) - 90.0).abs() < 1e-9);
        // Basket along -y.
        assert!((angle_to_basket(CourtPosition { x: 84.0, y: 35.0 }, right) + 90.0).abs() < 1e-9);
        // Basket behind along -x: exactly 180, never -180.
        assert!((angle_to_basket(CourtPosition { x: 90.0, y: 25.0 }, right) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_zone_thresholds() {
        let at = |d: f64| CourtPosition {
            x: RIGHT_BASKET.x - d,
            y: RIGHT_BASKET.y,
        };
        assert_eq!(shot_zone(at(8.0)), ShotZone::RestrictedArea);
        assert_eq!(shot_zone(at(8.01)), ShotZone::Paint);
        assert_eq!(shot_zone(at(16.0)), ShotZone::Paint);
        assert_eq!(shot_zone(at(23.75)), ShotZone::MidRange);
        assert_eq!(shot_zone(at(23.76)), ShotZone::ThreePoint);
    }

    #[test]
    fn test_zone_labels() {
        assert_eq!(ShotZone::RestrictedArea.to_string(), "Restricted Area");
        assert_eq!(ShotZone::MidRange.to_string(), "Mid-range");
        assert_eq!(ShotZone::ThreePoint.to_string(), "Three-point");
    }
}
