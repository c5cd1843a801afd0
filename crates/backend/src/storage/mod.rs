use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");
const PLAYER_COUNTS_TABLE: TableDefinition<&str, u64> =
    TableDefinition::new("predictions_by_player");
const ZONE_COUNTS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("predictions_by_zone");

const TOTAL_PREDICTIONS: &str = "total_predictions";
const CACHE_HITS: &str = "cache_hits";
const CACHE_MISSES: &str = "cache_misses";
const RESPONSE_MICROS: &str = "response_time_micros";

/// Persisted prediction counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsSnapshot {
    pub total_predictions: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub response_time_micros: u64,
    pub by_player: BTreeMap<String, u64>,
    pub by_zone: BTreeMap<String, u64>,
}

impl AnalyticsSnapshot {
    /// Mean response time in seconds over every recorded prediction.
    pub fn average_response_secs(&self) -> f64 {
        if self.total_predictions == 0 {
            0.0
        } else {
            self.response_time_micros as f64 / self.total_predictions as f64 / 1_000_000.0
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            self.cache_hits as f64 / lookups as f64
        }
    }
}

pub struct Storage {
    db: Database,
    path: PathBuf,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, String> {
        let db = Database::create(path)
            .map_err(|e| format!("Failed to open database at {}: {}", path.display(), e))?;

        // Ensure tables exist so reads never hit a missing table.
        let write_txn = db.begin_write().map_err(|e| e.to_string())?;
        {
            write_txn.open_table(COUNTERS_TABLE).map_err(|e| e.to_string())?;
            write_txn.open_table(PLAYER_COUNTS_TABLE).map_err(|e| e.to_string())?;
            write_txn.open_table(ZONE_COUNTS_TABLE).map_err(|e| e.to_string())?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;

        Ok(Arc::new(Storage {
            db,
            path: path.to_path_buf(),
        }))
    }

    /// Record one served prediction in a single transaction.
    pub fn record_prediction(
        &self,
        player: &str,
        zone: &str,
        elapsed_micros: u64,
        cache_hit: bool,
    ) -> Result<(), String> {
        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        {
            let mut counters = write_txn.open_table(COUNTERS_TABLE).map_err(|e| e.to_string())?;
            add(&mut counters, TOTAL_PREDICTIONS, 1)?;
            add(&mut counters, RESPONSE_MICROS, elapsed_micros)?;
            add(
                &mut counters,
                if cache_hit { CACHE_HITS } else { CACHE_MISSES },
                1,
            )?;

            let mut players = write_txn
                .open_table(PLAYER_COUNTS_TABLE)
                .map_err(|e| e.to_string())?;
            add(&mut players, player, 1)?;

            let mut zones = write_txn.open_table(ZONE_COUNTS_TABLE).map_err(|e| e.to_string())?;
            add(&mut zones, zone, 1)?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn snapshot(&self) -> Result<AnalyticsSnapshot, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let counters = read_txn.open_table(COUNTERS_TABLE).map_err(|e| e.to_string())?;
        let get = |key: &str| -> Result<u64, String> {
            Ok(counters
                .get(key)
                .map_err(|e| e.to_string())?
                .map(|v| v.value())
                .unwrap_or(0))
        };

        let players = read_txn
            .open_table(PLAYER_COUNTS_TABLE)
            .map_err(|e| e.to_string())?;
        let zones = read_txn.open_table(ZONE_COUNTS_TABLE).map_err(|e| e.to_string())?;

        Ok(AnalyticsSnapshot {
            total_predictions: get(TOTAL_PREDICTIONS)?,
            cache_hits: get(CACHE_HITS)?,
            cache_misses: get(CACHE_MISSES)?,
            response_time_micros: get(RESPONSE_MICROS)?,
            by_player: collect_counts(&players)?,
            by_zone: collect_counts(&zones)?,
        })
    }

    pub fn db_size_bytes(&self) -> Result<u64, String> {
        std::fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| e.to_string())
    }
}

fn add(
    table: &mut redb::Table<'_, &'static str, u64>,
    key: &str,
    delta: u64,
) -> Result<(), String> {
    let current = table
        .get(key)
        .map_err(|e| e.to_string())?
        .map(|v| v.value())
        .unwrap_or(0);
    table
        .insert(key, current.saturating_add(delta))
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn collect_counts(
    table: &redb::ReadOnlyTable<&'static str, u64>,
) -> Result<BTreeMap<String, u64>, String> {
    let mut out = BTreeMap::new();
    for entry in table.iter().map_err(|e| e.to_string())? {
        let (k, v) = entry.map_err(|e| e.to_string())?;
        out.insert(k.value().to_string(), v.value());
    }
    Ok(out)
}
