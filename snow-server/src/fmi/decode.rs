//! Decoding of WFS simple-feature payloads.
//!
//! The feed answers every stored query with a flat list of
//! `BsWfs:BsWfsElement` entries, one per (time, parameter) pair:
//!
//! ```xml
//! <BsWfs:BsWfsElement gml:id="BsWfsElement.1.1.1">
//!   <BsWfs:Location>...</BsWfs:Location>
//!   <BsWfs:Time>2024-01-15T00:00:00Z</BsWfs:Time>
//!   <BsWfs:ParameterName>snow</BsWfs:ParameterName>
//!   <BsWfs:ParameterValue>34.0</BsWfs:ParameterValue>
//! </BsWfs:BsWfsElement>
//! ```
//!
//! Parameters are interleaved in the order they were requested, so a run of
//! `window_size` consecutive elements describes one time point. Children
//! are looked up by name rather than by position.

use tracing::trace;
use xmltree::{Element, XMLNode};

use crate::domain::{
    DailyRecord, HourlyRecord, LatestRecord, format_display_date, parse_feed_time,
    validate_date_format,
};

use super::error::FmiError;
use super::query::Variant;

const ELEMENT_NAME: &str = "BsWfsElement";
const TIME_NAME: &str = "Time";
const PARAMETER_NAME: &str = "ParameterName";
const VALUE_NAME: &str = "ParameterValue";

/// One (time, parameter) observation from the feed.
///
/// Any child that is missing or has no text is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureElement {
    pub time: Option<String>,
    pub parameter: Option<String>,
    pub value: Option<String>,
}

impl FeatureElement {
    /// The measured value, or `sentinel` if the feed left it empty.
    pub fn value_or(&self, sentinel: &str) -> String {
        self.value.clone().unwrap_or_else(|| sentinel.to_string())
    }

    fn from_xml(element: &Element) -> Self {
        Self {
            time: child_text(element, TIME_NAME),
            parameter: child_text(element, PARAMETER_NAME),
            value: child_text(element, VALUE_NAME),
        }
    }
}

/// Parse a feed document into its observation elements, in document order.
pub fn parse_elements(xml: &str) -> Result<Vec<FeatureElement>, FmiError> {
    let root = Element::parse(xml.as_bytes())
        .map_err(|e| FmiError::malformed(format!("invalid XML: {e}")))?;

    let mut elements = Vec::new();
    collect_elements(&root, &mut elements);
    Ok(elements)
}

fn collect_elements(element: &Element, out: &mut Vec<FeatureElement>) {
    if element.name == ELEMENT_NAME {
        out.push(FeatureElement::from_xml(element));
        return;
    }
    for child in &element.children {
        if let XMLNode::Element(ce) = child {
            collect_elements(ce, out);
        }
    }
}

fn child_text(element: &Element, name: &str) -> Option<String> {
    let text = element.get_child(name)?.get_text()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Group `elements` into windows of `window_size` and decode each one.
///
/// The timestamp is read from the first element of each window; windows
/// without one are skipped. `decode` receives that timestamp and the whole
/// window, and may return `None` to skip the window as well.
///
/// Fails if `elements` cannot be split into whole windows.
pub fn decode_windows<R, F>(
    elements: &[FeatureElement],
    window_size: usize,
    mut decode: F,
) -> Result<Vec<R>, FmiError>
where
    F: FnMut(&str, &[FeatureElement]) -> Option<R>,
{
    if window_size == 0 {
        return Err(FmiError::malformed("window size must be positive"));
    }

    if elements.len() % window_size != 0 {
        return Err(FmiError::malformed(format!(
            "{} elements do not divide into windows of {}",
            elements.len(),
            window_size
        )));
    }

    let records = elements
        .chunks_exact(window_size)
        .filter_map(|window| {
            let Some(time) = window[0].time.as_deref() else {
                trace!("skipping window without timestamp");
                return None;
            };
            decode(time, window)
        })
        .collect();

    Ok(records)
}

/// Decode the daily snow depth / mean temperature series.
///
/// An unusable `date_format` is an [`FmiError::InvalidConfig`].
pub fn decode_daily(
    elements: &[FeatureElement],
    sentinel: &str,
    date_format: &str,
) -> Result<Vec<DailyRecord>, FmiError> {
    validate_date_format(date_format).map_err(|e| FmiError::InvalidConfig(e.to_string()))?;

    decode_windows(elements, Variant::Daily.window_size(), |time, window| {
        let parsed = parse_timestamp(time)?;
        Some(DailyRecord {
            time: time.to_string(),
            date: format_display_date(parsed, date_format).ok()?,
            snow: window[0].value_or(sentinel),
            temperature: window[1].value_or(sentinel),
        })
    })
}

/// Decode the latest snapshot.
///
/// The query asks for a single time slot, but the feed may return more; the
/// last complete window is the most recent one. Always yields exactly one
/// record.
pub fn decode_latest(
    elements: &[FeatureElement],
    sentinel: &str,
) -> Result<Vec<LatestRecord>, FmiError> {
    let size = Variant::Latest.window_size();
    let complete = elements.len() - elements.len() % size;
    if complete == 0 {
        return Err(FmiError::malformed(format!(
            "expected at least {} elements for latest observation, got {}",
            size,
            elements.len()
        )));
    }

    let window = &elements[complete - size..complete];
    Ok(vec![LatestRecord {
        snow: window[0].value_or(sentinel),
        temperature: window[1].value_or(sentinel),
    }])
}

/// Decode the hourly temperature and wind series.
pub fn decode_hourly(
    elements: &[FeatureElement],
    sentinel: &str,
) -> Result<Vec<HourlyRecord>, FmiError> {
    decode_windows(elements, Variant::Hourly.window_size(), |time, window| {
        let time_value = parse_timestamp(time)?;
        Some(HourlyRecord {
            time: time.to_string(),
            time_value,
            temperature: window[0].value_or(sentinel),
            wind_gust: window[1].value_or(sentinel),
            wind_speed: window[2].value_or(sentinel),
            wind_direction: window[3].value_or(sentinel),
        })
    })
}

fn parse_timestamp(time: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    match parse_feed_time(time) {
        Ok(t) => Some(t),
        Err(e) => {
            trace!(error = %e, "skipping window with unparsable timestamp");
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{document, element};
    use super::*;

    fn el(time: Option<&str>, value: Option<&str>) -> FeatureElement {
        FeatureElement {
            time: time.map(str::to_string),
            parameter: None,
            value: value.map(str::to_string),
        }
    }

    const T1: &str = "2024-01-14T00:00:00Z";
    const T2: &str = "2024-01-15T00:00:00Z";

    #[test]
    fn parse_elements_by_name() {
        let xml = document(&[
            element(Some(T1), "snow", Some("34.0")),
            element(Some(T1), "tday", Some("-7.5")),
        ]);

        let elements = parse_elements(&xml).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].time.as_deref(), Some(T1));
        assert_eq!(elements[0].parameter.as_deref(), Some("snow"));
        assert_eq!(elements[0].value.as_deref(), Some("34.0"));
        assert_eq!(elements[1].parameter.as_deref(), Some("tday"));
        assert_eq!(elements[1].value.as_deref(), Some("-7.5"));
    }

    #[test]
    fn parse_empty_children_as_none() {
        let xml = document(&[element(None, "snow", None)]);
        let elements = parse_elements(&xml).unwrap();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].time, None);
        assert_eq!(elements[0].value, None);
    }

    #[test]
    fn parse_missing_children_as_none() {
        let xml = document(&[
            "<wfs:member><BsWfs:BsWfsElement><BsWfs:ParameterName>snow</BsWfs:ParameterName>\
             </BsWfs:BsWfsElement></wfs:member>"
                .to_string(),
        ]);
        let elements = parse_elements(&xml).unwrap();
        assert_eq!(elements[0].time, None);
        assert_eq!(elements[0].value, None);
        assert_eq!(elements[0].parameter.as_deref(), Some("snow"));
    }

    #[test]
    fn parse_empty_collection() {
        let elements = parse_elements(&document(&[])).unwrap();
        assert!(elements.is_empty());
    }

    #[test]
    fn parse_rejects_invalid_xml() {
        let err = parse_elements("<wfs:FeatureCollection>").unwrap_err();
        assert!(matches!(err, FmiError::MalformedPayload { .. }));
    }

    #[test]
    fn decode_windows_groups_in_order() {
        let elements = vec![
            el(Some(T1), Some("1")),
            el(Some(T1), Some("2")),
            el(Some(T2), Some("3")),
            el(Some(T2), Some("4")),
        ];

        let out = decode_windows(&elements, 2, |time, w| {
            Some((time.to_string(), w[0].value_or("-"), w[1].value_or("-")))
        })
        .unwrap();

        assert_eq!(
            out,
            vec![
                (T1.to_string(), "1".to_string(), "2".to_string()),
                (T2.to_string(), "3".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn decode_windows_skips_missing_timestamp() {
        let elements = vec![
            el(None, Some("1")),
            el(Some(T1), Some("2")),
            el(Some(T2), Some("3")),
            el(Some(T2), Some("4")),
        ];

        let out = decode_windows(&elements, 2, |time, _| Some(time.to_string())).unwrap();
        assert_eq!(out, vec![T2.to_string()]);
    }

    #[test]
    fn decode_windows_rejects_partial_window() {
        let elements = vec![el(Some(T1), None), el(Some(T1), None), el(Some(T2), None)];
        let err = decode_windows(&elements, 2, |_, _| Some(())).unwrap_err();
        assert!(matches!(err, FmiError::MalformedPayload { .. }));
    }

    #[test]
    fn decode_windows_rejects_zero_size() {
        let err = decode_windows(&[], 0, |_, _| Some(())).unwrap_err();
        assert!(matches!(err, FmiError::MalformedPayload { .. }));
    }

    #[test]
    fn daily_decodes_records() {
        let elements = vec![
            el(Some(T1), Some("30.0")),
            el(Some(T1), Some("-4.1")),
            el(Some(T2), Some("34.0")),
            el(Some(T2), Some("-7.5")),
        ];

        let records = decode_daily(&elements, "NaN", "%-d.%-m.%Y").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1],
            DailyRecord {
                time: T2.to_string(),
                date: "15.1.2024".to_string(),
                snow: "34.0".to_string(),
                temperature: "-7.5".to_string(),
            }
        );
    }

    #[test]
    fn daily_substitutes_sentinel_per_field() {
        let elements = vec![el(Some(T1), Some("30.0")), el(Some(T1), None)];

        let records = decode_daily(&elements, "NaN", "%-d.%-m.%Y").unwrap();
        assert_eq!(records[0].snow, "30.0");
        assert_eq!(records[0].temperature, "NaN");
    }

    #[test]
    fn daily_rejects_unknown_date_specifier() {
        let elements = vec![el(Some(T1), Some("30.0")), el(Some(T1), Some("-4.1"))];

        let err = decode_daily(&elements, "NaN", "%Q").unwrap_err();
        assert!(matches!(err, FmiError::InvalidConfig(_)));
    }

    #[test]
    fn daily_skips_unparsable_timestamp() {
        let elements = vec![
            el(Some("not-a-time"), Some("30.0")),
            el(Some("not-a-time"), Some("-4.1")),
            el(Some(T2), Some("34.0")),
            el(Some(T2), Some("-7.5")),
        ];

        let records = decode_daily(&elements, "NaN", "%-d.%-m.%Y").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].time, T2);
    }

    #[test]
    fn latest_decodes_single_window() {
        let elements = vec![el(Some(T1), Some("41.0")), el(Some(T1), Some("-12.3"))];

        let records = decode_latest(&elements, "NaN").unwrap();
        assert_eq!(
            records,
            vec![LatestRecord {
                snow: "41.0".to_string(),
                temperature: "-12.3".to_string(),
            }]
        );
    }

    #[test]
    fn latest_uses_most_recent_window() {
        let elements = vec![
            el(Some(T1), Some("40.0")),
            el(Some(T1), Some("-10.0")),
            el(Some(T2), Some("41.0")),
            el(Some(T2), None),
        ];

        let records = decode_latest(&elements, "NaN").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].snow, "41.0");
        assert_eq!(records[0].temperature, "NaN");
    }

    #[test]
    fn latest_requires_a_full_window() {
        assert!(decode_latest(&[], "NaN").is_err());
        assert!(decode_latest(&[el(Some(T1), Some("1"))], "NaN").is_err());
    }

    #[test]
    fn hourly_maps_parameters_in_request_order() {
        let t3 = "2024-01-15T01:00:00Z";
        let elements = vec![
            el(Some(T2), Some("-5.0")),
            el(Some(T2), Some("8.1")),
            el(Some(T2), Some("4.2")),
            el(Some(T2), Some("270.0")),
            el(Some(t3), Some("-5.5")),
            el(Some(t3), None),
            el(Some(t3), Some("3.9")),
            el(Some(t3), Some("265.0")),
        ];

        let records = decode_hourly(&elements, "").unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].time, T2);
        assert_eq!(records[0].temperature, "-5.0");
        assert_eq!(records[0].wind_gust, "8.1");
        assert_eq!(records[0].wind_speed, "4.2");
        assert_eq!(records[0].wind_direction, "270.0");

        assert_eq!(records[1].time, t3);
        assert_eq!(records[1].time_value, parse_feed_time(t3).unwrap());
        assert_eq!(records[1].temperature, "-5.5");
        assert_eq!(records[1].wind_gust, "");
        assert_eq!(records[1].wind_speed, "3.9");
    }
}
