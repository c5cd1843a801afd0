use std::collections::HashMap;
use std::path::Path;

use courtside_shared::models::Player;

use crate::error::PredictorError;

pub const DEFAULT_PER_PAGE: u32 = 50;
pub const MAX_PER_PAGE: u32 = 100;

/// One page of the roster. `total` counts every match, not just this page.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlayerPage {
    pub players: Vec<Player>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}

pub struct PlayerService {
    players: Vec<Player>,
    by_name: HashMap<String, usize>,
}

impl PlayerService {
    /// Read `players.json` from the assets directory, falling back to the
    /// built-in roster when it is missing or unreadable.
    pub fn load(assets_dir: &Path) -> Self {
        let path = assets_dir.join("players.json");
        let players = match read_roster(&path) {
            Ok(players) => players,
            Err(e) => {
                tracing::warn!(error = %e, "using built-in roster");
                fallback_roster()
            }
        };
        tracing::info!(players = players.len(), "Loaded player roster");
        Self::from_players(players)
    }

    pub fn from_players(players: Vec<Player>) -> Self {
        let by_name = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        PlayerService { players, by_name }
    }

    pub fn total(&self) -> usize {
        self.players.len()
    }

    pub fn find_by_name(&self, name: &str) -> Result<&Player, PredictorError> {
        self.by_name
            .get(name)
            .map(|&i| &self.players[i])
            .ok_or_else(|| PredictorError::PlayerNotFound(name.to_string()))
    }

    /// Case-insensitive substring match on the player name.
    pub fn search(&self, query: &str) -> Vec<&Player> {
        let needle = query.to_lowercase();
        self.players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn list(
        &self,
        page: Option<u32>,
        per_page: Option<u32>,
        search: Option<&str>,
    ) -> Result<PlayerPage, PredictorError> {
        let page = page.unwrap_or(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
        if page < 1 {
            return Err(PredictorError::validation("page must be at least 1"));
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(PredictorError::validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }

        let matches: Vec<&Player> = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(q) => self.search(q),
            None => self.players.iter().collect(),
        };
        let start = ((page - 1) as usize).saturating_mul(per_page as usize);
        let players = matches
            .iter()
            .skip(start)
            .take(per_page as usize)
            .map(|p| (*p).clone())
            .collect();

        Ok(PlayerPage {
            players,
            total: matches.len(),
            page,
            per_page,
        })
    }
}

fn read_roster(path: &Path) -> Result<Vec<Player>, String> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let players: Vec<Player> = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    if players.is_empty() {
        return Err(format!("{} has no players", path.display()));
    }
    Ok(players)
}

pub fn fallback_roster() -> Vec<Player> {
    const ROSTER: [(&str, &str, &str, u32, &str, u32, u32); 12] = [
        ("LeBron James", "Los Angeles Lakers", "SF", 23, "6-9", 250, 21),
        ("Stephen Curry", "Golden State Warriors", "PG", 30, "6-2", 185, 15),
        ("Kevin Durant", "Phoenix Suns", "SF", 35, "6-10", 240, 16),
        ("Jayson Tatum", "Boston Celtics", "SF", 0, "6-8", 210, 7),
        ("Luka Doncic", "Dallas Mavericks", "PG", 77, "6-7", 230, 6),
        ("Klay Thompson", "Golden State Warriors", "SG", 11, "6-6", 220, 11),
        ("Joel Embiid", "Philadelphia 76ers", "C", 21, "7-0", 280, 8),
        ("Giannis Antetokounmpo", "Milwaukee Bucks", "PF", 34, "6-11", 243, 11),
        ("Damian Lillard", "Milwaukee Bucks", "PG", 0, "6-2", 195, 12),
        ("Ja Morant", "Memphis Grizzlies", "PG", 12, "6-2", 174, 5),
        ("Jimmy Butler", "Miami Heat", "SF", 22, "6-7", 230, 13),
        ("Kawhi Leonard", "LA Clippers", "SF", 2, "6-7", 225, 12),
    ];
    ROSTER
        .iter()
        .zip(1u32..)
        .map(|(&(name, team, position, jersey, height, weight, years), id)| Player {
            id,
            name: name.to_string(),
            team: Some(team.to_string()),
            position: Some(position.to_string()),
            jersey_number: Some(jersey),
            height: Some(height.to_string()),
            weight: Some(weight),
            years_pro: Some(years),
        })
        .collect()
}
