use courtside_shared::heatmap::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use courtside_shared::models::{CourtDimensions, ScreenPosition, ShotRequest};

/// Rendered half court in CSS pixels, 47 ft across by 50 ft tall.
pub fn half_court() -> CourtDimensions {
    CourtDimensions::half_court(DEFAULT_WIDTH, DEFAULT_HEIGHT)
}

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Rescale a container-relative position onto the nominal court size, so a
/// CSS-scaled court still maps like the 500x470 drawing. `None` when the
/// click lands outside the container or the container has no size.
pub fn container_to_court_px(
    container_x: f64,
    container_y: f64,
    container_w: f64,
    container_h: f64,
    court: &CourtDimensions,
) -> Option<ScreenPosition> {
    if container_w <= 0.0 || container_h <= 0.0 {
        return None;
    }
    if !(0.0..=container_w).contains(&container_x) || !(0.0..=container_h).contains(&container_y) {
        return None;
    }
    Some(ScreenPosition {
        x: container_x * court.width / container_w,
        y: container_y * court.height / container_h,
    })
}

/// Turn a viewport click on the element `container_id` into a prediction request.
pub fn click_to_shot_request(
    client_x: f64,
    client_y: f64,
    container_id: &str,
    player_name: &str,
) -> Option<(ScreenPosition, ShotRequest)> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(container_id)?;
    let rect = element.get_bounding_client_rect();

    let (x, y) = client_to_container(client_x, client_y, rect.left(), rect.top());
    let court = half_court();
    let screen = container_to_court_px(x, y, rect.width(), rect.height(), &court)?;
    Some((screen, ShotRequest::from_click(screen, &court, player_name)))
}
