use dioxus::prelude::*;

use crate::api::PlayerData;

/// Option label: "#30 Stephen Curry (GSW, PG)", skipping unknown parts.
pub fn option_label(p: &PlayerData) -> String {
    let mut label = match p.jersey_number {
        Some(n) => format!("#{} {}", n, p.name),
        None => p.name.clone(),
    };
    let extra: Vec<&str> = [p.team.as_deref(), p.position.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !extra.is_empty() {
        label.push_str(&format!(" ({})", extra.join(", ")));
    }
    label
}

#[component]
pub fn PlayerSelector(
    players: Vec<PlayerData>,
    loading: bool,
    selected_player: Signal<String>,
    search: Signal<String>,
) -> Element {
    rsx! {
        div { class: "panel",
            h3 { "Player" }
            input {
                r#type: "search",
                placeholder: "Search players...",
                "aria-label": "Search players",
                value: "{search}",
                oninput: move |evt: Event<FormData>| {
                    search.set(evt.value());
                },
            }
            select {
                "aria-label": "Select player",
                value: "{selected_player}",
                onchange: move |evt: Event<FormData>| {
                    selected_player.set(evt.value().to_string());
                },
                option { value: "", "-- Select Player --" }
                for p in &players {
                    option {
                        value: "{p.name}",
                        selected: *selected_player.read() == p.name,
                        "{option_label(p)}"
                    }
                }
            }
            if loading {
                p { class: "hint", "Loading roster..." }
            } else if players.is_empty() {
                p { class: "hint", "No players match." }
            }
        }
    }
}
