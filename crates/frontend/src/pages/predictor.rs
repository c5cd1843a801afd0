use courtside_shared::models::{HeatmapPoint, ScreenPosition, ShotRequest};
use courtside_shared::shots::synthetic_shot_cloud;
use dioxus::prelude::*;

use crate::api::{self, PlayerData, PredictionData};
use crate::components::court_view::{CourtView, ShotMarker};
use crate::components::player_selector::PlayerSelector;
use crate::components::prediction_display::{PredictionDisplay, SessionStats};

/// Points in the per-player heatmap cloud.
const HEATMAP_SHOTS: usize = 400;

const PREDICTION_FAILED: &str = "Prediction failed. Please try again.";

/// Quiet period before a search keystroke hits the backend.
const SEARCH_DEBOUNCE_MS: u32 = 250;

#[component]
pub fn Predictor() -> Element {
    let mut search = use_signal(String::new);
    let mut selected_player = use_signal(String::new);
    let mut show_heatmap = use_signal(|| true);
    let mut marker = use_signal(|| None::<ShotMarker>);
    let mut prediction = use_signal(|| None::<PredictionData>);
    let mut pending = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);
    let mut session = use_signal(SessionStats::default);

    let players_resource = use_resource(move || {
        let query = search.read().clone();
        async move {
            // A newer keystroke restarts the resource and drops this future.
            if !query.is_empty() {
                gloo_timers::future::TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
            }
            api::fetch_players(Some(&query)).await
        }
    });
    let health_resource = use_resource(|| api::fetch_health());

    let heatmap = use_memo(move || {
        let name = selected_player.read();
        if name.is_empty() {
            Vec::<HeatmapPoint>::new()
        } else {
            synthetic_shot_cloud(&name, HEATMAP_SHOTS)
        }
    });

    // A new player starts from a clean court.
    use_effect(move || {
        let _player = selected_player.read();
        marker.set(None);
        prediction.set(None);
        error.set(None);
    });

    let (players, loading): (Vec<PlayerData>, bool) = match &*players_resource.read() {
        Some(Ok(p)) => (p.clone(), false),
        Some(Err(_)) => (vec![], false),
        None => (vec![], true),
    };

    let (status_class, status_label) = match &*health_resource.read() {
        Some(Ok(h)) if h.model_loaded => ("status-ok", "Model ready"),
        Some(Ok(_)) => ("status-degraded", "Model unavailable"),
        Some(Err(_)) => ("status-down", "Backend unreachable"),
        None => ("status-pending", "Connecting..."),
    };

    let on_shot = move |(position, req): (ScreenPosition, ShotRequest)| {
        marker.set(Some(ShotMarker { position, made: None }));
        pending.set(true);
        error.set(None);
        // No cancellation: whichever response lands last is shown.
        spawn(async move {
            match api::predict(&req).await {
                Ok(p) => {
                    marker.set(Some(ShotMarker {
                        position,
                        made: Some(p.shot_made),
                    }));
                    session.with_mut(|s| s.record(p.probability));
                    prediction.set(Some(p));
                }
                Err(_) => {
                    prediction.set(None);
                    error.set(Some(PREDICTION_FAILED.to_string()));
                }
            }
            pending.set(false);
        });
    };

    let player_name = selected_player.read().clone();

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Courtside Shot Predictor" }
                span { class: "status {status_class}", "{status_label}" }
                label { class: "heatmap-toggle",
                    input {
                        r#type: "checkbox",
                        checked: *show_heatmap.read(),
                        onchange: move |evt: Event<FormData>| {
                            show_heatmap.set(evt.checked());
                        },
                    }
                    "Heatmap"
                }
            }

            div { class: "sidebar",
                PlayerSelector {
                    players: players,
                    loading: loading,
                    selected_player: selected_player,
                    search: search,
                }

                PredictionDisplay {
                    prediction: prediction.read().clone(),
                    pending: *pending.read(),
                    error: error.read().clone(),
                    session: *session.read(),
                }
            }

            div { class: "court-area",
                CourtView {
                    player_name: player_name,
                    marker: marker,
                    heatmap: heatmap,
                    show_heatmap: *show_heatmap.read(),
                    on_shot: on_shot,
                }
                p { class: "hint",
                    "Baseline on the left. Green beats league average, red trails it."
                }
            }
        }
    }
}
