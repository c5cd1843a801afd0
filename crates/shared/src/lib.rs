pub mod court;
pub mod heatmap;
pub mod models;
pub mod shots;
pub mod zones;
