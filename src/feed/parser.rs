use csv::ReaderBuilder;

use crate::config::ParseMode;
use crate::error::Result;

/// One parsed poll of the feed: rows oldest-first, exactly as published.
/// Partial rows (in-progress submissions, stray commas) are retained here
/// and weeded out later by the validity check.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    /// Header labels, present only in labeled mode.
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

/// Parse the raw export text into a snapshot.
///
/// The reader is flexible: the sheet grows columns over time, so row
/// lengths are not uniform. Blank lines never produce a row.
pub fn parse_feed(text: &str, mode: ParseMode) -> Result<FeedSnapshot> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    match mode {
        ParseMode::Labeled => {
            let headers = if rows.is_empty() {
                Vec::new()
            } else {
                rows.remove(0)
            };
            Ok(FeedSnapshot {
                headers: Some(headers),
                rows,
            })
        }
        ParseMode::Positional => Ok(FeedSnapshot {
            headers: None,
            rows,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_splits_off_header_row() {
        let text = "חותמת זמן,איפה אנחנו\nt1,Bangkok\n";
        let snapshot = parse_feed(text, ParseMode::Labeled).unwrap();

        assert_eq!(snapshot.headers.unwrap(), vec!["חותמת זמן", "איפה אנחנו"]);
        assert_eq!(snapshot.rows, vec![vec!["t1", "Bangkok"]]);
    }

    #[test]
    fn positional_keeps_every_row() {
        let text = "a,b\nc,d\n";
        let snapshot = parse_feed(text, ParseMode::Positional).unwrap();

        assert!(snapshot.headers.is_none());
        assert_eq!(snapshot.rows.len(), 2);
    }

    #[test]
    fn blank_lines_produce_no_rows() {
        let text = "a,b\n\n\nc,d\n\n";
        let snapshot = parse_feed(text, ParseMode::Positional).unwrap();

        assert_eq!(snapshot.rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn partial_rows_are_retained() {
        let text = "t1,Bangkok,8\n,,\n";
        let snapshot = parse_feed(text, ParseMode::Positional).unwrap();

        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.rows[1], vec!["", "", ""]);
    }

    #[test]
    fn quoted_commas_stay_in_one_cell() {
        let text = "t1,\"Bangkok, Thailand\",8\n";
        let snapshot = parse_feed(text, ParseMode::Positional).unwrap();

        assert_eq!(snapshot.rows[0][1], "Bangkok, Thailand");
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let text = "t1,Bangkok,8,3\nt2,Phuket\n";
        let snapshot = parse_feed(text, ParseMode::Positional).unwrap();

        assert_eq!(snapshot.rows[0].len(), 4);
        assert_eq!(snapshot.rows[1].len(), 2);
    }

    #[test]
    fn labeled_mode_survives_empty_feed() {
        let snapshot = parse_feed("", ParseMode::Labeled).unwrap();

        assert_eq!(snapshot.headers.unwrap().len(), 0);
        assert!(snapshot.rows.is_empty());
    }

    #[test]
    fn rtl_text_passes_through_unmodified() {
        let text = "t1,קופיקו ביץ',5\n";
        let snapshot = parse_feed(text, ParseMode::Positional).unwrap();

        assert_eq!(snapshot.rows[0][1], "קופיקו ביץ'");
    }
}
