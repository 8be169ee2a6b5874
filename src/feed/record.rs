use serde::Serialize;

use crate::config::{BoardConfig, FieldSpec, ParseMode, RowValidity};
use crate::error::{PollError, Result};

use super::media::normalize_drive_link;
use super::parser::FeedSnapshot;
use super::resolver::resolve;

/// The fully-typed, default-filled record the rendering side consumes.
/// Every field has a value; nothing is ever left unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub location: String,
    pub fun_index: i64,
    pub moan_index: i64,
    pub shake_count: i64,
    pub massage_note: String,
    pub funny_note: String,
    pub weird_note: String,
    pub image_url: Option<String>,
}

/// Running totals folded over every valid row, recomputed in full on
/// each poll so it never drifts from the snapshot it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateState {
    pub shake_total: i64,
}

/// Rows that qualify as real observations under the configured predicate.
pub fn valid_rows<'a>(snapshot: &'a FeedSnapshot, config: &BoardConfig) -> Vec<&'a [String]> {
    let headers = snapshot.headers.as_deref();
    snapshot
        .rows
        .iter()
        .map(Vec::as_slice)
        .filter(|row| is_valid_row(headers, row, config))
        .collect()
}

fn is_valid_row(headers: Option<&[String]>, row: &[String], config: &BoardConfig) -> bool {
    let identity = resolve(headers, row, &config.fields.timestamp, config.parse_mode);
    let location = resolve(headers, row, &config.fields.location, config.parse_mode);

    // A header row that slips into the data must never count as an
    // observation: its identity cell is the header label itself.
    if config.parse_mode == ParseMode::Labeled
        && config
            .fields
            .timestamp
            .exact
            .iter()
            .any(|label| identity == label)
    {
        return false;
    }

    match config.row_validity {
        RowValidity::TimestampAndLocation => {
            !identity.trim().is_empty() && !location.trim().is_empty()
        }
        RowValidity::LocationOnly => !location.trim().is_empty(),
        RowValidity::AnyCell => row.iter().any(|cell| !cell.trim().is_empty()),
    }
}

/// Leading-integer coercion: "8" -> 8, "8.5" -> 8, "n/a" -> 0, "" -> 0.
/// Out-of-range values pass through untouched; we only guard against
/// non-numeric text, not against what the editors choose to report.
pub fn score_value(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let prefix: String = digits.chars().take_while(char::is_ascii_digit).collect();
    prefix.parse::<i64>().map(|value| sign * value).unwrap_or(0)
}

/// Fold the running aggregate over the valid rows.
pub fn fold_aggregate(
    rows: &[&[String]],
    headers: Option<&[String]>,
    config: &BoardConfig,
) -> AggregateState {
    let shake_total = rows
        .iter()
        .map(|row| score_value(resolve(headers, row, &config.fields.shakes, config.parse_mode)))
        .sum();

    AggregateState { shake_total }
}

/// Normalize one valid row into the published record.
pub fn normalize_row(
    row: &[String],
    headers: Option<&[String]>,
    config: &BoardConfig,
) -> NormalizedRecord {
    let mode = config.parse_mode;
    let field = |spec: &FieldSpec| resolve(headers, row, spec, mode);

    let raw_location = field(&config.fields.location);
    let location = if raw_location.is_empty() {
        config.location_placeholder.clone()
    } else {
        raw_location.to_string()
    };

    let raw_image = field(&config.fields.image).trim();
    let image_url = if raw_image.is_empty() {
        None
    } else {
        Some(normalize_drive_link(raw_image))
    };

    NormalizedRecord {
        location,
        fun_index: score_value(field(&config.fields.fun)),
        moan_index: score_value(field(&config.fields.moan)),
        shake_count: score_value(field(&config.fields.shakes)),
        massage_note: field(&config.fields.massage).to_string(),
        funny_note: field(&config.fields.funny).to_string(),
        weird_note: field(&config.fields.weird).to_string(),
        image_url,
    }
}

/// Selection + normalization + aggregation over one parsed snapshot.
/// The latest valid row is the last one; the feed is append-only.
pub fn derive_board(
    snapshot: &FeedSnapshot,
    config: &BoardConfig,
) -> Result<(NormalizedRecord, AggregateState)> {
    let headers = snapshot.headers.as_deref();
    let rows = valid_rows(snapshot, config);
    let latest = rows.last().copied().ok_or(PollError::NoValidRecord)?;

    let record = normalize_row(latest, headers, config);
    let aggregate = fold_aggregate(&rows, headers, config);
    Ok((record, aggregate))
}
