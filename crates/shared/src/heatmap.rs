//! Probability heatmap rendering.
//!
//! Each point becomes a radial "splat" whose color, opacity and size encode
//! how far its make probability sits from the league-average baseline.
//! Splats accumulate additively on an offscreen layer, which is then
//! composited onto the visible surface with a light blur. Every pass
//! redraws from scratch; nothing is cached between passes.

use crate::court::court_to_screen;
use crate::models::{CourtDimensions, CourtPosition, HeatmapPoint};

pub const DEFAULT_BASE_RADIUS: f64 = 24.0;
pub const DEFAULT_MAX_OPACITY: f64 = 0.85;
pub const DEFAULT_LEAGUE_AVERAGE: f64 = 0.45;
pub const DEFAULT_BAND: f64 = 0.2;
pub const DEFAULT_WIDTH: f64 = 500.0;
pub const DEFAULT_HEIGHT: f64 = 470.0;

const MIN_BAND: f64 = 0.05;
const MAX_BAND: f64 = 0.4;
const MIN_ALPHA: f64 = 0.18;
const MIN_RADIUS: f64 = 8.0;

/// Standard deviation of the composite blur, in CSS pixels.
pub const COMPOSITE_BLUR_PX: f64 = 1.0;

/// Coordinate space of incoming points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointSpace {
    /// Already in surface pixels.
    Screen,
    /// Court feet; converted against the surface's current size.
    Court(CourtDimensions),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapConfig {
    pub base_radius: f64,
    pub max_opacity: f64,
    pub league_average: f64,
    pub band: f64,
    pub space: PointSpace,
    pub auto_resize: bool,
    /// Fixed surface size in CSS pixels, used unless `auto_resize` is set.
    pub width: f64,
    pub height: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        HeatmapConfig {
            base_radius: DEFAULT_BASE_RADIUS,
            max_opacity: DEFAULT_MAX_OPACITY,
            league_average: DEFAULT_LEAGUE_AVERAGE,
            band: DEFAULT_BAND,
            space: PointSpace::Screen,
            auto_resize: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl HeatmapConfig {
    /// Tolerance band half-width, clamped to [0.05, 0.4].
    pub fn effective_band(&self) -> f64 {
        self.band.clamp(MIN_BAND, MAX_BAND)
    }

    /// Deviation of `weight` from the baseline as a fraction of the band.
    /// Not clamped: radius keeps growing past the band edge.
    fn deviation(&self, weight: f64) -> f64 {
        (weight - self.league_average).abs() / self.effective_band()
    }

    pub fn alpha_for(&self, weight: f64) -> f64 {
        let t = self.deviation(weight).clamp(0.0, 1.0);
        MIN_ALPHA + t * (self.max_opacity - MIN_ALPHA)
    }

    pub fn radius_for(&self, weight: f64) -> f64 {
        (self.base_radius * (0.9 + 1.2 * self.deviation(weight))).max(MIN_RADIUS)
    }

    pub fn color_scale(&self) -> ColorScale {
        ColorScale::new(self.league_average, self.effective_band())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Rgb {
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
        }
    }

    pub fn css(&self, alpha: f64) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }

    fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgb {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
        }
    }
}

/// Red-yellow-green diverging ramp, red at the low end.
const RD_YL_GN: [Rgb; 11] = [
    Rgb::hex(0xa50026),
    Rgb::hex(0xd73027),
    Rgb::hex(0xf46d43),
    Rgb::hex(0xfdae61),
    Rgb::hex(0xfee08b),
    Rgb::hex(0xffffbf),
    Rgb::hex(0xd9ef8b),
    Rgb::hex(0xa6d96a),
    Rgb::hex(0x66bd63),
    Rgb::hex(0x1a9850),
    Rgb::hex(0x006837),
];

/// Maps a probability onto the diverging ramp over `[avg - band, avg + band]`.
/// Values outside the domain saturate to the end colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    low: f64,
    high: f64,
}

impl ColorScale {
    pub fn new(average: f64, band: f64) -> Self {
        ColorScale {
            low: average - band,
            high: average + band,
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    pub fn color(&self, value: f64) -> Rgb {
        let span = self.high - self.low;
        let t = if span > 0.0 {
            ((value - self.low) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let scaled = t * (RD_YL_GN.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(RD_YL_GN.len() - 2);
        Rgb::lerp(RD_YL_GN[i], RD_YL_GN[i + 1], scaled - i as f64)
    }
}

/// Resolved drawing-surface size. Splats are positioned in CSS pixels; the
/// backing store is `css * pixel_ratio` so strokes stay crisp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn resolve(
        config: &HeatmapConfig,
        container: Option<(f64, f64)>,
        pixel_ratio: f64,
    ) -> Self {
        let (css_width, css_height) = if config.auto_resize {
            container.unwrap_or((0.0, 0.0))
        } else {
            (config.width, config.height)
        };
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        SurfaceSize {
            css_width,
            css_height,
            pixel_ratio,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.css_width > 0.0 && self.css_height > 0.0)
    }

    pub fn backing_width(&self) -> usize {
        (self.css_width * self.pixel_ratio).round().max(0.0) as usize
    }

    pub fn backing_height(&self) -> usize {
        (self.css_height * self.pixel_ratio).round().max(0.0) as usize
    }
}

/// One radial paint operation in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splat {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
    pub alpha: f64,
}

/// Resolve every point into a splat against the surface's current size.
pub fn plan_splats(
    points: &[HeatmapPoint],
    config: &HeatmapConfig,
    size: SurfaceSize,
) -> Vec<Splat> {
    let scale = config.color_scale();
    points
        .iter()
        .map(|p| {
            let weight = p.weight.unwrap_or(config.league_average);
            let (x, y) = match config.space {
                PointSpace::Screen => (p.x, p.y),
                PointSpace::Court(dims) => {
                    let live = dims.with_pixel_size(size.css_width, size.css_height);
                    let s = court_to_screen(CourtPosition { x: p.x, y: p.y }, &live);
                    (s.x, s.y)
                }
            };
            Splat {
                x,
                y,
                radius: config.radius_for(weight),
                color: scale.color(weight),
                alpha: config.alpha_for(weight),
            }
        })
        .collect()
}

/// Offscreen layer that accumulates splats additively.
pub trait SplatLayer {
    fn add_splat(&mut self, splat: &Splat);
}

/// A visible drawing surface the heatmap can be rendered onto.
pub trait HeatmapSurface {
    type Layer: SplatLayer;

    /// Current CSS box of the surrounding container, if known.
    fn container_box(&self) -> Option<(f64, f64)>;
    fn pixel_ratio(&self) -> f64;
    fn resize(&mut self, size: SurfaceSize);
    fn clear(&mut self);
    /// `None` when no drawing context is available.
    fn create_layer(&mut self, size: SurfaceSize) -> Option<Self::Layer>;
    /// Draw `layer` over the surface with a gaussian blur, consuming it.
    /// `blur_px` is in CSS pixels.
    fn composite(&mut self, layer: Self::Layer, blur_px: f64);
}

/// Run one full render pass. Never fails: a zero-sized surface or a missing
/// context skips drawing.
pub fn render_heatmap<S: HeatmapSurface>(
    surface: &mut S,
    points: &[HeatmapPoint],
    config: &HeatmapConfig,
) {
    let size = SurfaceSize::resolve(config, surface.container_box(), surface.pixel_ratio());
    if size.is_empty() {
        return;
    }
    surface.resize(size);
    surface.clear();
    if points.is_empty() {
        return;
    }

    let Some(mut layer) = surface.create_layer(size) else {
        return;
    };
    for splat in plan_splats(points, config, size) {
        layer.add_splat(&splat);
    }
    surface.composite(layer, COMPOSITE_BLUR_PX);
}
