use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Label of the bucket for records without a usable year.
pub const UNKNOWN_YEAR: &str = "Unknown";

/// Link text for records without a title.
pub const UNTITLED: &str = "(untitled)";

/// One bibliographic entry as found in the publications payload.
///
/// Every field is optional. Values of the wrong JSON type are dropped here, at the parse
/// boundary, so the renderer only ever sees text or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PublicationRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub authors: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub venue: Option<String>,
    #[serde(deserialize_with = "lenient_year")]
    pub year: YearKey,
    #[serde(deserialize_with = "lenient_text")]
    pub external_url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub scholar_url: Option<String>,
}

impl PublicationRecord {
    /// Build a record from an arbitrary JSON value. Anything that isn't an object yields a record
    /// with every field absent.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Where the title links to: the external URL, then the Scholar URL, then nowhere.
    pub fn link_target(&self) -> &str {
        self.external_url
            .as_deref()
            .or(self.scholar_url.as_deref())
            .unwrap_or("#")
    }

    /// Authors and venue, whichever are present, joined by `separator`.
    pub fn meta_line(&self, separator: &str) -> String {
        [self.authors.as_deref(), self.venue.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// The grouping key of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum YearKey {
    Year(String),
    #[default]
    Unknown,
}

impl YearKey {
    /// Normalise a label. Empty labels and the literal `"Unknown"` both mean no year.
    pub fn from_label(label: &str) -> Self {
        if label.is_empty() || label == UNKNOWN_YEAR {
            YearKey::Unknown
        } else {
            YearKey::Year(label.to_string())
        }
    }

    /// Numeric value of the key, if it reads as a number.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            YearKey::Year(y) => y.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            YearKey::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, YearKey::Unknown)
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearKey::Year(y) => f.write_str(y),
            YearKey::Unknown => f.write_str(UNKNOWN_YEAR),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_year<'de, D>(deserializer: D) -> Result<YearKey, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => YearKey::from_label(&s),
        // Zero is falsy, so it lands in the unknown bucket too.
        Value::Number(n) if n.as_f64() != Some(0.0) => YearKey::Year(number_label(&n)),
        _ => YearKey::Unknown,
    })
}

/// Text of a numeric year as the page shows it: whole numbers without a fractional part, so
/// `2022`, `2022.0` and `2.022e3` all read `2022`.
fn number_label(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_textual_years_share_a_key() {
        let a = PublicationRecord::from_value(json!({ "year": 2022 }));
        let b = PublicationRecord::from_value(json!({ "year": "2022" }));
        assert_eq!(a.year, YearKey::Year("2022".into()));
        assert_eq!(a.year, b.year);
        assert_eq!(a.year.numeric(), Some(2022.0));
    }

    #[test]
    fn whole_float_years_use_integer_text() {
        let payload: Value = serde_json::from_str(
            r#"[{ "year": 2022.0 }, { "year": 2022 }, { "year": "2022" }, { "year": 1e3 }]"#,
        )
        .unwrap();
        let years: Vec<YearKey> = payload
            .as_array()
            .unwrap()
            .iter()
            .cloned()
            .map(|v| PublicationRecord::from_value(v).year)
            .collect();
        assert_eq!(years[0], YearKey::Year("2022".into()));
        assert_eq!(years[0], years[1]);
        assert_eq!(years[1], years[2]);
        assert_eq!(years[3].to_string(), "1000");

        let half = PublicationRecord::from_value(json!({ "year": 2021.5 }));
        assert_eq!(half.year.to_string(), "2021.5");
    }

    #[test]
    fn missing_and_falsy_years_are_unknown() {
        for v in [
            json!({}),
            json!({ "year": null }),
            json!({ "year": "" }),
            json!({ "year": 0 }),
            json!({ "year": false }),
            json!({ "year": "Unknown" }),
        ] {
            let r = PublicationRecord::from_value(v.clone());
            assert_eq!(r.year, YearKey::Unknown, "input: {v}");
            assert_eq!(r.year.to_string(), "Unknown");
        }
    }

    #[test]
    fn wrong_types_and_non_objects_degrade_to_absent_fields() {
        let r = PublicationRecord::from_value(json!({
            "title": 12,
            "authors": ["X"],
            "venue": "V",
        }));
        assert_eq!(r.title, None);
        assert_eq!(r.authors, None);
        assert_eq!(r.venue.as_deref(), Some("V"));

        assert_eq!(PublicationRecord::from_value(json!(42)), PublicationRecord::default());
        assert_eq!(PublicationRecord::from_value(json!(null)), PublicationRecord::default());
    }

    #[test]
    fn title_falls_back_to_untitled() {
        assert_eq!(PublicationRecord::default().display_title(), "(untitled)");
        let r = PublicationRecord::from_value(json!({ "title": "" }));
        assert_eq!(r.display_title(), "(untitled)");
        let r = PublicationRecord::from_value(json!({ "title": "Attention" }));
        assert_eq!(r.display_title(), "Attention");
    }

    #[test]
    fn link_target_prefers_external_then_scholar() {
        let both = PublicationRecord::from_value(json!({
            "external_url": "https://doi.org/10.1000/182",
            "scholar_url": "https://scholar.google.com/x",
        }));
        assert_eq!(both.link_target(), "https://doi.org/10.1000/182");

        let scholar =
            PublicationRecord::from_value(json!({ "scholar_url": "https://scholar.google.com/x" }));
        assert_eq!(scholar.link_target(), "https://scholar.google.com/x");

        assert_eq!(PublicationRecord::default().link_target(), "#");
    }

    #[test]
    fn meta_line_joins_present_parts() {
        let sep = " · ";
        let r =
            PublicationRecord::from_value(json!({ "authors": "A. Author", "venue": "NeurIPS" }));
        assert_eq!(r.meta_line(sep), "A. Author · NeurIPS");
        let r = PublicationRecord::from_value(json!({ "venue": "NeurIPS" }));
        assert_eq!(r.meta_line(sep), "NeurIPS");
        assert_eq!(PublicationRecord::default().meta_line(sep), "");
    }

    #[test]
    fn non_numeric_labels_have_no_numeric_value() {
        assert_eq!(YearKey::from_label("in press").numeric(), None);
        assert_eq!(YearKey::Unknown.numeric(), None);
        assert_eq!(YearKey::from_label("2019").numeric(), Some(2019.0));
    }
}
