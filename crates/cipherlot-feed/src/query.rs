use cipherlot_types::{FeedEntry, Timestamp};

/// Parse a raw log, skipping blank lines and lines that do not parse.
pub fn parse_log(author: &str, text: &str) -> Vec<FeedEntry> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match FeedEntry::from_line(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(author, line = index + 1, error = %e, "skipping unreadable feed line");
                None
            }
        })
        .collect()
}

/// Keep entries strictly after `since` and order them for readers.
///
/// Ordering is ascending by timestamp; entries with equal timestamps are
/// ordered by identifier string so every reader sees the same sequence.
pub fn select(entries: impl IntoIterator<Item = FeedEntry>, since: Option<Timestamp>) -> Vec<FeedEntry> {
    let mut selected: Vec<FeedEntry> = entries
        .into_iter()
        .filter(|entry| since.map_or(true, |since| entry.ts.is_after(&since)))
        .collect();
    selected.sort_by_cached_key(|entry| (entry.ts, entry.cid.to_string()));
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlot_types::{Cid, Digest};

    fn cid(seed: u8) -> Cid {
        Cid::raw(Digest::from_hash([seed; 32]))
    }

    fn line(seed: u8, ts: i64) -> String {
        FeedEntry::new(cid(seed), ts).to_line().unwrap()
    }

    #[test]
    fn parse_skips_garbage_lines() {
        let text = format!(
            "{}\nnot json\n\n{{\"cid\":\"bogus\",\"ts\":1}}\n{}\n",
            line(1, 10),
            line(2, 20)
        );
        let entries = parse_log("bob", &text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].cid, cid(1));
        assert_eq!(entries[1].cid, cid(2));
    }

    #[test]
    fn parse_empty_log() {
        assert!(parse_log("bob", "").is_empty());
    }

    #[test]
    fn select_sorts_by_timestamp() {
        let entries = vec![
            FeedEntry::new(cid(1), 100),
            FeedEntry::new(cid(2), 200),
            FeedEntry::new(cid(3), 50),
        ];
        let ts: Vec<i64> = select(entries, None).iter().map(|e| e.ts.as_secs()).collect();
        assert_eq!(ts, vec![50, 100, 200]);
    }

    #[test]
    fn select_filters_strictly_after_since() {
        let entries = vec![
            FeedEntry::new(cid(1), 100),
            FeedEntry::new(cid(2), 200),
            FeedEntry::new(cid(3), 50),
        ];
        let ts: Vec<i64> = select(entries, Some(Timestamp::new(100)))
            .iter()
            .map(|e| e.ts.as_secs())
            .collect();
        assert_eq!(ts, vec![200]);
    }

    #[test]
    fn since_zero_keeps_positive_timestamps_only() {
        let entries = vec![FeedEntry::new(cid(1), 0), FeedEntry::new(cid(2), 1)];
        assert_eq!(select(entries, Some(Timestamp::zero())).len(), 1);
    }

    #[test]
    fn equal_timestamps_order_by_identifier() {
        let a = cid(1);
        let b = cid(200);
        let (low, high) = if a.to_string() < b.to_string() { (a, b) } else { (b, a) };
        let entries = vec![FeedEntry::new(high, 5), FeedEntry::new(low, 5)];
        let sorted = select(entries, None);
        assert_eq!(sorted[0].cid, low);
        assert_eq!(sorted[1].cid, high);
    }
}
