pub mod court_view;
pub mod heatmap_canvas;
pub mod player_selector;
pub mod prediction_display;
