use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::MessageStat;

const TOP_INTENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub total_messages: usize,
    pub average_response_time_ms: u64,
    pub unique_users: usize,
    pub top_intents: TopIntents,
    pub user_last_intents: Vec<UserIntent>,
}

/// Intent summaries with their counts, most frequent first. Serialized as a
/// JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TopIntents(pub Vec<(String, usize)>);

impl Serialize for TopIntents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (summary, count) in &self.0 {
            map.serialize_entry(summary, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIntent {
    pub user_cedula: String,
    pub intent_summary: String,
}

/// Aggregates usage over every stored message. `None` when there is nothing
/// to aggregate.
pub fn aggregate(rows: &[MessageStat]) -> Option<Aggregates> {
    if rows.is_empty() {
        return None;
    }

    let total_ms: u128 = rows.iter().map(|r| r.response_time_ms as u128).sum();
    let average_response_time_ms = (total_ms / rows.len() as u128) as u64;

    // latest row per user by timestamp; later rows win ties
    let mut latest: BTreeMap<&str, &MessageStat> = BTreeMap::new();
    for row in rows {
        latest
            .entry(row.user_cedula.as_str())
            .and_modify(|current| {
                if row.created_at >= current.created_at {
                    *current = row;
                }
            })
            .or_insert(row);
    }

    let user_last_intents = latest
        .into_iter()
        .map(|(cedula, row)| UserIntent {
            user_cedula: cedula.to_string(),
            intent_summary: row.intent_summary.clone(),
        })
        .collect::<Vec<_>>();

    Some(Aggregates {
        total_messages: rows.len(),
        average_response_time_ms,
        unique_users: user_last_intents.len(),
        top_intents: top_intents(rows),
        user_last_intents,
    })
}

fn top_intents(rows: &[MessageStat]) -> TopIntents {
    // summary -> (first seen at, count)
    let mut counts: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
    for (i, row) in rows.iter().enumerate() {
        counts.entry(row.intent_summary.as_str()).or_insert((i, 0)).1 += 1;
    }

    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.1.cmp(&a.1.1).then(a.1.0.cmp(&b.1.0)));
    ranked.truncate(TOP_INTENTS);
    TopIntents(
        ranked
            .into_iter()
            .map(|(summary, (_, count))| (summary.to_string(), count))
            .collect(),
    )
}
