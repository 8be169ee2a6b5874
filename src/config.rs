use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// How rows are interpreted: by header text or by fixed column index.
///
/// Positional is the default because the deployed sheet's headers are
/// free-form Hebrew text that the editors reword now and then; column
/// order is the only thing that has stayed stable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ParseMode {
    Labeled,
    Positional,
}

impl Default for ParseMode {
    fn default() -> Self {
        ParseMode::Positional
    }
}

/// Minimum-completeness check that separates real observations from
/// blank lines and in-progress submissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RowValidity {
    /// Timestamp cell and location cell both non-empty.
    TimestampAndLocation,
    /// Location cell non-empty.
    LocationOnly,
    /// Any cell non-empty.
    AnyCell,
}

impl Default for RowValidity {
    fn default() -> Self {
        RowValidity::TimestampAndLocation
    }
}

/// Where to find one business field in a row, tried in order:
/// exact header labels, then a keyword scan, then the fixed column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Exact header labels (labeled mode), first present wins.
    #[serde(default)]
    pub exact: Vec<String>,
    /// Substring matched against every header when no exact label hits.
    #[serde(default)]
    pub keyword: Option<String>,
    /// Fixed column index, the positional fallback.
    pub column: usize,
}

impl FieldSpec {
    fn new(exact: &[&str], keyword: Option<&str>, column: usize) -> Self {
        Self {
            exact: exact.iter().map(|label| label.to_string()).collect(),
            keyword: keyword.map(str::to_string),
            column,
        }
    }
}

/// Per-field lookup specs for the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub timestamp: FieldSpec,
    pub location: FieldSpec,
    pub fun: FieldSpec,
    pub moan: FieldSpec,
    pub shakes: FieldSpec,
    pub massage: FieldSpec,
    pub funny: FieldSpec,
    pub weird: FieldSpec,
    pub image: FieldSpec,
}

impl Default for FieldMap {
    fn default() -> Self {
        // Column order and header labels of the deployed sheet.
        Self {
            timestamp: FieldSpec::new(&["חותמת זמן"], Some("זמן"), 0),
            location: FieldSpec::new(&["איפה אנחנו"], Some("איפה"), 1),
            fun: FieldSpec::new(&["מדד ה-FUN"], Some("FUN"), 2),
            moan: FieldSpec::new(&["מדד הקיטורים"], Some("קיטורים"), 3),
            shakes: FieldSpec::new(&["שייקים"], Some("שייקים"), 4),
            massage: FieldSpec::new(&["מסאז' יומי"], Some("מסאז"), 5),
            funny: FieldSpec::new(&["ציטוט מצחיק"], Some("מצחיק"), 6),
            weird: FieldSpec::new(&["משהו מוזר"], Some("מוזר"), 7),
            image: FieldSpec::new(&["תמונה יומית"], Some("תמונה"), 8),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Published CSV export endpoint. The one mandatory setting.
    pub feed_url: String,
    #[serde(default)]
    pub parse_mode: ParseMode,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub row_validity: RowValidity,
    #[serde(default)]
    pub fields: FieldMap,
    /// Shown for the location when the latest row left it blank.
    #[serde(default)]
    pub location_placeholder: String,
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

impl BoardConfig {
    /// Config with every tunable at its default.
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            parse_mode: ParseMode::default(),
            poll_interval_secs: default_poll_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            row_validity: RowValidity::default(),
            fields: FieldMap::default(),
            location_placeholder: String::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: BoardConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.poll_interval_secs = self.poll_interval_secs.max(1);
        self
    }
}
