use crate::config::{FieldSpec, ParseMode};

/// Look up one business field in a row.
///
/// Labeled mode walks the spec's strategy list in order: exact header
/// labels, then the first header containing the keyword, then the fixed
/// column. Positional mode indexes directly. A miss is always the empty
/// string; header drift must degrade a field, never the whole record.
pub fn resolve<'a>(
    headers: Option<&[String]>,
    row: &'a [String],
    spec: &FieldSpec,
    mode: ParseMode,
) -> &'a str {
    if mode == ParseMode::Labeled {
        if let Some(headers) = headers {
            if let Some(idx) = match_header(headers, spec) {
                return row.get(idx).map(String::as_str).unwrap_or("");
            }
        }
    }

    row.get(spec.column).map(String::as_str).unwrap_or("")
}

/// Header index for a spec. Headers are user-edited sheet text, so exact
/// labels compare with surrounding whitespace trimmed, and the keyword
/// scan takes the first header in sheet order that contains it.
fn match_header(headers: &[String], spec: &FieldSpec) -> Option<usize> {
    for label in &spec.exact {
        if let Some(idx) = headers.iter().position(|header| header.trim() == label.trim()) {
            return Some(idx);
        }
    }

    if let Some(keyword) = &spec.keyword {
        return headers.iter().position(|header| header.contains(keyword.as_str()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(exact: &[&str], keyword: Option<&str>, column: usize) -> FieldSpec {
        FieldSpec {
            exact: exact.iter().map(|label| label.to_string()).collect(),
            keyword: keyword.map(str::to_string),
            column,
        }
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn exact_label_wins() {
        let headers = strings(&["חותמת זמן", "איפה אנחנו"]);
        let row = strings(&["t1", "Bangkok"]);
        let spec = spec(&["איפה אנחנו"], Some("איפה"), 0);

        assert_eq!(resolve(Some(&headers), &row, &spec, ParseMode::Labeled), "Bangkok");
    }

    #[test]
    fn exact_match_ignores_stray_whitespace() {
        let headers = strings(&[" מדד ה-FUN  ", "אחר"]);
        let row = strings(&["8", "x"]);
        let spec = spec(&["מדד ה-FUN"], None, 1);

        assert_eq!(resolve(Some(&headers), &row, &spec, ParseMode::Labeled), "8");
    }

    #[test]
    fn keyword_scan_handles_header_drift() {
        let headers = strings(&["זמן", "מדד ה-FUN (1-10)"]);
        let row = strings(&["t1", "9"]);
        let spec = spec(&["מדד ה-FUN"], Some("FUN"), 0);

        assert_eq!(resolve(Some(&headers), &row, &spec, ParseMode::Labeled), "9");
    }

    #[test]
    fn first_keyword_hit_wins() {
        let headers = strings(&["מדד FUN בוקר", "מדד FUN ערב"]);
        let row = strings(&["7", "3"]);
        let spec = spec(&[], Some("FUN"), 9);

        assert_eq!(resolve(Some(&headers), &row, &spec, ParseMode::Labeled), "7");
    }

    #[test]
    fn labeled_falls_back_to_column() {
        let headers = strings(&["a", "b", "c"]);
        let row = strings(&["t1", "Phuket", "5"]);
        let spec = spec(&["איפה אנחנו"], Some("איפה"), 1);

        assert_eq!(resolve(Some(&headers), &row, &spec, ParseMode::Labeled), "Phuket");
    }

    #[test]
    fn missing_everything_resolves_empty() {
        let headers = strings(&["a"]);
        let row = strings(&["x"]);
        let spec = spec(&["לא קיים"], Some("גם לא"), 7);

        assert_eq!(resolve(Some(&headers), &row, &spec, ParseMode::Labeled), "");
    }

    #[test]
    fn positional_indexes_directly() {
        let row = strings(&["t1", "Phuket", "5"]);
        let spec = spec(&["איפה אנחנו"], Some("איפה"), 2);

        assert_eq!(resolve(None, &row, &spec, ParseMode::Positional), "5");
    }

    #[test]
    fn positional_out_of_range_resolves_empty() {
        let row = strings(&["t1"]);
        let spec = spec(&[], None, 8);

        assert_eq!(resolve(None, &row, &spec, ParseMode::Positional), "");
    }

    #[test]
    fn matched_header_with_short_row_resolves_empty() {
        let headers = strings(&["זמן", "איפה", "תמונה"]);
        let row = strings(&["t1", "Krabi"]);
        let spec = spec(&["תמונה"], None, 2);

        assert_eq!(resolve(Some(&headers), &row, &spec, ParseMode::Labeled), "");
    }
}
