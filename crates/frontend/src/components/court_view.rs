use std::fmt::Write;

use courtside_shared::court::{court_to_screen, LEFT_BASKET};
use courtside_shared::heatmap::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use courtside_shared::models::{CourtPosition, HeatmapPoint, ScreenPosition, ShotRequest};
use dioxus::prelude::*;

use crate::components::heatmap_canvas::HeatmapCanvas;
use crate::coords;

pub const COURT_CONTAINER_ID: &str = "court-container";

// Court markings in feet, baseline on the left.
const PAINT_LENGTH_FT: f64 = 19.0;
const PAINT_HALF_WIDTH_FT: f64 = 8.0;
const FREE_THROW_RADIUS_FT: f64 = 6.0;
const RESTRICTED_RADIUS_FT: f64 = 4.0;
const RIM_RADIUS_FT: f64 = 0.75;
const BACKBOARD_OFFSET_FT: f64 = 1.25;
const BACKBOARD_HALF_WIDTH_FT: f64 = 3.0;
const THREE_POINT_RADIUS_FT: f64 = 23.75;
const CORNER_THREE_INSET_FT: f64 = 3.0;
const CENTER_CIRCLE_RADIUS_FT: f64 = 6.0;

const MARKER_RADIUS_PX: f64 = 7.0;

/// Last clicked spot. `made` is `None` until the prediction arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotMarker {
    pub position: ScreenPosition,
    pub made: Option<bool>,
}

impl ShotMarker {
    fn class(&self) -> &'static str {
        match self.made {
            None => "shot-marker pending",
            Some(true) => "shot-marker made",
            Some(false) => "shot-marker missed",
        }
    }
}

/// Feet to drawing pixels on the nominal 500x470 half court.
fn px(x_ft: f64, y_ft: f64) -> (f64, f64) {
    let p = court_to_screen(CourtPosition { x: x_ft, y: y_ft }, &coords::half_court());
    (p.x, p.y)
}

/// Pixel radii of a circle of `r_ft` feet. The axes scale differently.
fn radii(r_ft: f64) -> (f64, f64) {
    px(r_ft, r_ft)
}

fn build_ellipse(svg: &mut String, center: (f64, f64), r_ft: f64, class: &str) {
    let (cx, cy) = px(center.0, center.1);
    let (rx, ry) = radii(r_ft);
    let _ = write!(
        svg,
        r#"<ellipse class="{class}" cx="{cx:.1}" cy="{cy:.1}" rx="{rx:.1}" ry="{ry:.1}"/>"#
    );
}

/// Arc around the left basket between two points on the same circle,
/// bulging toward the half-court line.
fn build_basket_arc(svg: &mut String, r_ft: f64, half_chord_ft: f64, lead_in: bool) {
    let dy = half_chord_ft;
    let dx = (r_ft * r_ft - dy * dy).max(0.0).sqrt();
    let (x0, y0) = px(LEFT_BASKET.x + dx, LEFT_BASKET.y - dy);
    let (x1, y1) = px(LEFT_BASKET.x + dx, LEFT_BASKET.y + dy);
    let (rx, ry) = radii(r_ft);

    if lead_in {
        let (bx0, by0) = px(0.0, LEFT_BASKET.y - dy);
        let (bx1, by1) = px(0.0, LEFT_BASKET.y + dy);
        let _ = write!(
            svg,
            r#"<path class="court-line" d="M {bx0:.1} {by0:.1} L {x0:.1} {y0:.1} A {rx:.1} {ry:.1} 0 0 1 {x1:.1} {y1:.1} L {bx1:.1} {by1:.1}"/>"#
        );
    } else {
        let _ = write!(
            svg,
            r#"<path class="court-line" d="M {x0:.1} {y0:.1} A {rx:.1} {ry:.1} 0 0 1 {x1:.1} {y1:.1}"/>"#
        );
    }
}

/// Static half-court markings.
pub fn build_court_lines(svg: &mut String) {
    let (_, h) = px(47.0, 50.0);

    // Paint
    let (px0, py0) = px(0.0, LEFT_BASKET.y - PAINT_HALF_WIDTH_FT);
    let (pw, ph) = px(PAINT_LENGTH_FT, PAINT_HALF_WIDTH_FT * 2.0);
    let _ = write!(
        svg,
        r#"<rect class="court-paint" x="{px0:.1}" y="{py0:.1}" width="{pw:.1}" height="{ph:.1}"/>"#
    );
    build_ellipse(svg, (PAINT_LENGTH_FT, LEFT_BASKET.y), FREE_THROW_RADIUS_FT, "court-line");

    // Three-point line: straight corners, then the arc
    build_basket_arc(
        svg,
        THREE_POINT_RADIUS_FT,
        LEFT_BASKET.y - CORNER_THREE_INSET_FT,
        true,
    );
    build_basket_arc(svg, RESTRICTED_RADIUS_FT, RESTRICTED_RADIUS_FT, false);

    // Backboard and rim
    let backboard_x = LEFT_BASKET.x - BACKBOARD_OFFSET_FT;
    let (bbx, bby0) = px(backboard_x, LEFT_BASKET.y - BACKBOARD_HALF_WIDTH_FT);
    let (_, bby1) = px(backboard_x, LEFT_BASKET.y + BACKBOARD_HALF_WIDTH_FT);
    let _ = write!(
        svg,
        r#"<line class="court-line backboard" x1="{bbx:.1}" y1="{bby0:.1}" x2="{bbx:.1}" y2="{bby1:.1}"/>"#
    );
    build_ellipse(svg, (LEFT_BASKET.x, LEFT_BASKET.y), RIM_RADIUS_FT, "court-rim");

    // Half-court line and the near half of the center circle
    let (mx, my0) = px(47.0, LEFT_BASKET.y - CENTER_CIRCLE_RADIUS_FT);
    let (_, my1) = px(47.0, LEFT_BASKET.y + CENTER_CIRCLE_RADIUS_FT);
    let (rx, ry) = radii(CENTER_CIRCLE_RADIUS_FT);
    let _ = write!(
        svg,
        r#"<line class="court-line" x1="{mx:.1}" y1="0" x2="{mx:.1}" y2="{h:.1}"/><path class="court-line" d="M {mx:.1} {my0:.1} A {rx:.1} {ry:.1} 0 0 0 {mx:.1} {my1:.1}"/>"#
    );
}

fn build_marker(svg: &mut String, marker: &ShotMarker) {
    let _ = write!(
        svg,
        r#"<circle class="{}" cx="{:.1}" cy="{:.1}" r="{MARKER_RADIUS_PX}"/>"#,
        marker.class(),
        marker.position.x,
        marker.position.y,
    );
}

pub fn build_court_svg(marker: Option<&ShotMarker>) -> String {
    let mut content = String::new();
    build_court_lines(&mut content);
    if let Some(m) = marker {
        build_marker(&mut content, m);
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {DEFAULT_WIDTH} {DEFAULT_HEIGHT}" preserveAspectRatio="none" style="position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;">{content}</svg>"#
    )
}

#[component]
pub fn CourtView(
    player_name: String,
    marker: ReadSignal<Option<ShotMarker>>,
    heatmap: ReadSignal<Vec<HeatmapPoint>>,
    show_heatmap: bool,
    on_shot: EventHandler<(ScreenPosition, ShotRequest)>,
) -> Element {
    let svg_html = use_memo(move || build_court_svg(marker.read().as_ref()));
    let mut layout_epoch = use_signal(|| 0u32);

    rsx! {
        div {
            id: COURT_CONTAINER_ID,
            class: "court",
            style: "aspect-ratio: {DEFAULT_WIDTH} / {DEFAULT_HEIGHT};",
            onresize: move |_: Event<ResizeData>| {
                layout_epoch.with_mut(|n| *n = n.wrapping_add(1));
            },
            onclick: move |evt: Event<MouseData>| {
                if player_name.is_empty() {
                    return;
                }
                let client = evt.client_coordinates();
                if let Some(shot) = coords::click_to_shot_request(
                    client.x,
                    client.y,
                    COURT_CONTAINER_ID,
                    &player_name,
                ) {
                    on_shot.call(shot);
                }
            },

            if show_heatmap {
                HeatmapCanvas { points: heatmap, layout_epoch: layout_epoch }
            }

            div {
                dangerous_inner_html: "{svg_html}",
                style: "position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:3;",
            }
        }
    }
}
