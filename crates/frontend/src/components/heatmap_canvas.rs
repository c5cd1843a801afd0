//! Canvas-backed heatmap overlay.
//!
//! Splats are painted additively onto a detached canvas and then blitted onto
//! the visible one through a small blur. All sizing and colour decisions come
//! from `courtside_shared::heatmap`; this module only talks to the DOM.

use courtside_shared::heatmap::{
    render_heatmap, HeatmapConfig, HeatmapSurface, PointSpace, Splat, SplatLayer, SurfaceSize,
};
use courtside_shared::models::HeatmapPoint;
use dioxus::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::coords;

pub const HEATMAP_CANVAS_ID: &str = "shot-heatmap-canvas";

/// Court-space overlay that tracks the size of the court container.
pub fn overlay_config() -> HeatmapConfig {
    HeatmapConfig {
        space: PointSpace::Court(coords::half_court()),
        auto_resize: true,
        ..HeatmapConfig::default()
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// CSS filter for a blur of `blur_px` CSS pixels, applied in backing pixels.
pub fn blur_filter(blur_px: f64, pixel_ratio: f64) -> String {
    format!("blur({}px)", blur_px * pixel_ratio)
}

/// Offscreen accumulation layer, sized in backing pixels.
pub struct CanvasLayer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pixel_ratio: f64,
}

impl SplatLayer for CanvasLayer {
    fn add_splat(&mut self, splat: &Splat) {
        if !splat.radius.is_finite() || splat.radius <= 0.0 {
            return;
        }
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(splat.x, splat.y, 0.0, splat.x, splat.y, splat.radius)
        else {
            return;
        };
        gradient.add_color_stop(0.0, &splat.color.css(splat.alpha)).ok();
        gradient.add_color_stop(1.0, &splat.color.css(0.0)).ok();

        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(splat.x, splat.y, splat.radius, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }
}

/// The visible overlay canvas.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_element_id(id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let ctx = context_2d(&canvas)?;
        Some(CanvasSurface { canvas, ctx })
    }
}

impl HeatmapSurface for CanvasSurface {
    type Layer = CanvasLayer;

    fn container_box(&self) -> Option<(f64, f64)> {
        let parent = self.canvas.parent_element()?;
        let rect = parent.get_bounding_client_rect();
        Some((rect.width(), rect.height()))
    }

    fn pixel_ratio(&self) -> f64 {
        web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.canvas.set_width(size.backing_width() as u32);
        self.canvas.set_height(size.backing_height() as u32);
        let style = format!("width:{}px;height:{}px;", size.css_width, size.css_height);
        self.canvas.set_attribute("style", &style).ok();
    }

    fn clear(&mut self) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn create_layer(&mut self, size: SurfaceSize) -> Option<CanvasLayer> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .create_element("canvas")
            .ok()?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        canvas.set_width(size.backing_width() as u32);
        canvas.set_height(size.backing_height() as u32);

        let ctx = context_2d(&canvas)?;
        // Splats are given in CSS pixels.
        ctx.set_transform(size.pixel_ratio, 0.0, 0.0, size.pixel_ratio, 0.0, 0.0)
            .ok()?;
        ctx.set_global_composite_operation("lighter").ok()?;
        Some(CanvasLayer {
            canvas,
            ctx,
            pixel_ratio: size.pixel_ratio,
        })
    }

    fn composite(&mut self, layer: CanvasLayer, blur_px: f64) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
        self.ctx.set_global_composite_operation("source-over").ok();
        // The blit runs under an identity transform, so scale the radius.
        self.ctx.set_filter(&blur_filter(blur_px, layer.pixel_ratio));
        self.ctx
            .draw_image_with_html_canvas_element(&layer.canvas, 0.0, 0.0)
            .ok();
        self.ctx.set_filter("none");
    }
}

/// `layout_epoch` is bumped by the parent whenever its box changes size.
#[component]
pub fn HeatmapCanvas(
    points: ReadSignal<Vec<HeatmapPoint>>,
    layout_epoch: ReadSignal<u32>,
) -> Element {
    // Full redraw whenever the point set or the container size changes.
    use_effect(move || {
        let _epoch = layout_epoch.read();
        let points = points.read();
        let config = overlay_config();
        if let Some(mut surface) = CanvasSurface::from_element_id(HEATMAP_CANVAS_ID) {
            render_heatmap(&mut surface, &points, &config);
        }
    });

    rsx! {
        canvas {
            id: HEATMAP_CANVAS_ID,
            class: "heatmap-layer",
        }
    }
}
