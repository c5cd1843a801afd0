use dioxus::prelude::*;

use crate::api::PredictionData;

/// Percentage with one decimal, e.g. `45.7%`.
pub fn format_pct(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Signed gap to league average in percentage points.
pub fn format_vs_league(probability: f64, league: f64) -> String {
    let diff = (probability - league) * 100.0;
    if diff >= 0.0 {
        format!("+{:.1} pts vs league", diff)
    } else {
        format!("{:.1} pts vs league", diff)
    }
}

/// Colour class for a probability relative to league average.
pub fn probability_class(probability: f64, league: f64) -> &'static str {
    let diff = probability - league;
    if diff > 0.05 {
        "prob-hot"
    } else if diff < -0.05 {
        "prob-cold"
    } else {
        "prob-neutral"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionStats {
    pub shots: u32,
    pub probability_sum: f64,
}

impl SessionStats {
    pub fn record(&mut self, probability: f64) {
        self.shots += 1;
        self.probability_sum += probability;
    }

    pub fn average(&self) -> Option<f64> {
        (self.shots > 0).then(|| self.probability_sum / self.shots as f64)
    }
}

#[component]
pub fn PredictionDisplay(
    prediction: Option<PredictionData>,
    pending: bool,
    error: Option<String>,
    session: SessionStats,
) -> Element {
    let session_line = match session.average() {
        Some(avg) => format!("{} shots, avg {}", session.shots, format_pct(avg)),
        None => "No shots yet".to_string(),
    };

    rsx! {
        div { class: "panel",
            h3 { "Prediction" }

            if pending {
                p { class: "hint", "Predicting..." }
            } else if let Some(ref msg) = error {
                p { class: "error", "{msg}" }
            } else if let Some(ref p) = prediction {
                {
                    let info = &p.shot_info;
                    let class = probability_class(p.probability, info.league_average);
                    rsx! {
                        div { class: "probability {class}", "{format_pct(p.probability)}" }
                        p { class: "verdict",
                            if p.shot_made { "Likely make" } else { "Likely miss" }
                            " · {p.confidence} confidence"
                        }
                        table { class: "shot-info",
                            tr { td { "Distance" } td { "{info.distance:.1} ft" } }
                            tr { td { "Zone" } td { "{info.zone}" } }
                            tr { td { "Shot type" } td { "{info.shot_type}" } }
                            tr { td { "Difficulty" } td { "{info.difficulty}" } }
                            tr {
                                td { "League average" }
                                td { "{format_pct(info.league_average)} ({format_vs_league(p.probability, info.league_average)})" }
                            }
                            tr {
                                td { "Comparable shots" }
                                td { "{info.comparable_shots.makes}/{info.comparable_shots.attempts}" }
                            }
                        }
                        if let Some(ref stats) = p.player_stats {
                            table { class: "player-stats",
                                tr { td { "FG%" } td { "{format_pct(stats.fg_percentage)}" } }
                                tr { td { "3P%" } td { "{format_pct(stats.three_point_percentage)}" } }
                                tr { td { "eFG%" } td { "{format_pct(stats.effective_fg_percentage)}" } }
                                tr { td { "Games" } td { "{stats.games_played}" } }
                                tr { td { "MPG" } td { "{stats.minutes_per_game:.1}" } }
                            }
                        }
                    }
                }
            } else {
                p { class: "hint", "Pick a player, then click the court." }
            }

            p { class: "session", "{session_line}" }
        }
    }
}
