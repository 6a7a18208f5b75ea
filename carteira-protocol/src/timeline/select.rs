use std::collections::HashMap;

use super::record::TimelineRecord;

/// Reduces raw timeline rows to at most one per distinct `client_id`.
///
/// Selection policy, highest priority first:
/// 1. an active row beats an inactive one regardless of timestamps;
/// 2. among rows of equal activity, the strictly later effective
///    timestamp wins;
/// 3. on an exact timestamp tie the row seen earlier in the input is
///    kept, so repeated runs over the same input are stable.
///
/// Rows without any parseable timestamp never displace a timestamped row.
/// Output order follows the first appearance of each client in the input.
pub fn group_timelines_by_client(
    records: impl IntoIterator<Item = TimelineRecord>,
) -> Vec<TimelineRecord> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut winners: Vec<TimelineRecord> = Vec::new();

    for record in records {
        match slots.get(&record.client_id) {
            Some(&slot) => {
                if replaces(&record, &winners[slot]) {
                    winners[slot] = record;
                }
            }
            None => {
                slots.insert(record.client_id.clone(), winners.len());
                winners.push(record);
            }
        }
    }

    winners
}

fn replaces(challenger: &TimelineRecord, incumbent: &TimelineRecord) -> bool {
    if challenger.is_active != incumbent.is_active {
        return challenger.is_active;
    }

    match (
        challenger.effective_timestamp(),
        incumbent.effective_timestamp(),
    ) {
        // Strict comparison: an exact tie keeps the incumbent.
        (Some(challenger_ts), Some(incumbent_ts)) => challenger_ts > incumbent_ts,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{DateTime, Utc};

    use super::*;

    fn record(id: &str, client_id: &str, is_active: bool, created_at: Option<&str>) -> TimelineRecord {
        TimelineRecord {
            id: id.to_string(),
            client_id: client_id.to_string(),
            client_name: format!("Cliente {client_id}"),
            is_active,
            created_at: created_at.map(|raw| raw.parse::<DateTime<Utc>>().unwrap()),
            updated_at: None,
            extra: Default::default(),
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(group_timelines_by_client(Vec::new()).is_empty());
    }

    #[test]
    fn single_record_per_client_passes_through() {
        let input = vec![
            record("r1", "c1", true, Some("2024-01-01T00:00:00Z")),
            record("r2", "c2", false, Some("2024-02-01T00:00:00Z")),
        ];
        let output = group_timelines_by_client(input.clone());
        assert_eq!(output, input);
    }

    #[test]
    fn output_has_one_record_per_client_and_covers_all_clients() {
        let input = vec![
            record("r1", "c1", false, Some("2024-01-01T00:00:00Z")),
            record("r2", "c2", true, Some("2024-01-02T00:00:00Z")),
            record("r3", "c1", true, Some("2024-01-03T00:00:00Z")),
            record("r4", "c3", false, Some("2024-01-04T00:00:00Z")),
            record("r5", "c2", false, Some("2024-01-05T00:00:00Z")),
        ];

        let input_clients: HashSet<_> = input.iter().map(|r| r.client_id.clone()).collect();
        let output = group_timelines_by_client(input);
        let output_clients: HashSet<_> = output.iter().map(|r| r.client_id.clone()).collect();

        assert_eq!(output.len(), output_clients.len(), "no duplicated client");
        assert_eq!(output_clients, input_clients, "every client appears once");
    }

    #[test]
    fn active_beats_inactive_even_when_older() {
        let input = vec![
            record("newer-inactive", "c1", false, Some("2024-06-01T00:00:00Z")),
            record("older-active", "c1", true, Some("2024-01-01T00:00:00Z")),
        ];
        let output = group_timelines_by_client(input);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].id, "older-active");
    }

    #[test]
    fn later_effective_timestamp_wins_among_equals() {
        let mut older = record("older", "c1", true, Some("2024-01-01T00:00:00Z"));
        older.updated_at = Some("2024-03-01T00:00:00Z".parse().unwrap());
        let newer = record("newer", "c1", true, Some("2024-02-01T00:00:00Z"));

        // `older` has the later updated_at, which is the effective marker.
        let output = group_timelines_by_client(vec![newer, older]);
        assert_eq!(output[0].id, "older");
    }

    #[test]
    fn exact_tie_keeps_first_seen() {
        let first = record("first", "c1", true, Some("2024-01-01T00:00:00Z"));
        let second = record("second", "c1", true, Some("2024-01-01T00:00:00Z"));

        let output = group_timelines_by_client(vec![first, second]);
        assert_eq!(output[0].id, "first");

        // Reversed input retains the other record: tie-breaking is
        // order-dependent on purpose.
        let first = record("first", "c1", true, Some("2024-01-01T00:00:00Z"));
        let second = record("second", "c1", true, Some("2024-01-01T00:00:00Z"));
        let output = group_timelines_by_client(vec![second, first]);
        assert_eq!(output[0].id, "second");
    }

    #[test]
    fn winner_is_independent_of_input_order() {
        let a = record("a", "c1", false, Some("2024-01-01T00:00:00Z"));
        let b = record("b", "c1", true, Some("2023-01-01T00:00:00Z"));
        let c = record("c", "c1", true, Some("2023-06-01T00:00:00Z"));

        let forward = group_timelines_by_client(vec![a.clone(), b.clone(), c.clone()]);
        let backward = group_timelines_by_client(vec![c, b, a]);

        assert_eq!(forward[0].id, "c");
        assert_eq!(backward[0].id, "c");
    }

    #[test]
    fn timestampless_record_always_loses() {
        let input = vec![
            record("no-ts", "c1", true, None),
            record("dated", "c1", true, Some("2024-01-01T00:00:00Z")),
        ];
        let output = group_timelines_by_client(input);
        assert_eq!(output[0].id, "dated");

        // Two timestampless rows: the first seen stays.
        let input = vec![record("no-ts-1", "c1", true, None), record("no-ts-2", "c1", true, None)];
        let output = group_timelines_by_client(input);
        assert_eq!(output[0].id, "no-ts-1");
    }

    #[test]
    fn applying_twice_is_a_no_op() {
        let input = vec![
            record("r1", "c1", false, Some("2024-01-01T00:00:00Z")),
            record("r2", "c1", true, Some("2024-01-02T00:00:00Z")),
            record("r3", "c2", true, Some("2024-01-03T00:00:00Z")),
        ];

        let once = group_timelines_by_client(input);
        let twice = group_timelines_by_client(once.clone());
        assert_eq!(once, twice);
    }
}
