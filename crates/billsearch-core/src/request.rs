//! Typed search requests and the loose-parameter boundary that builds them

use crate::error::{SearchError, SearchResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_NUMBER_TO_RETURN: usize = 5;

const HOUSE: &str = "U.S. House of Representatives";
const SENATE: &str = "U.S. Senate";

/// Publishing chamber filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Chamber {
    #[default]
    Any,
    House,
    Senate,
}

impl Chamber {
    /// Value stored in the `publisher` column, `None` for no restriction
    pub fn publisher(&self) -> Option<&'static str> {
        match self {
            Chamber::Any => None,
            Chamber::House => Some(HOUSE),
            Chamber::Senate => Some(SENATE),
        }
    }
}

impl FromStr for Chamber {
    type Err = SearchError;

    fn from_str(s: &str) -> SearchResult<Self> {
        match s {
            "any" => Ok(Chamber::Any),
            HOUSE => Ok(Chamber::House),
            SENATE => Ok(Chamber::Senate),
            other if other.eq_ignore_ascii_case("house") => Ok(Chamber::House),
            other if other.eq_ignore_ascii_case("senate") => Ok(Chamber::Senate),
            other => Err(SearchError::invalid(format!(
                "unrecognized chamber {other:?}; expected \"any\", \"{HOUSE}\" or \"{SENATE}\""
            ))),
        }
    }
}

impl TryFrom<String> for Chamber {
    type Error = SearchError;

    fn try_from(value: String) -> SearchResult<Self> {
        value.parse()
    }
}

impl From<Chamber> for String {
    fn from(chamber: Chamber) -> Self {
        chamber.to_string()
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.publisher().unwrap_or("any"))
    }
}

/// Inclusive publication date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SearchResult<Self> {
        if start > end {
            return Err(SearchError::invalid(format!(
                "date range starts after it ends ({start} > {end})"
            )));
        }
        Ok(Self { start, end })
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2050, 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// Search across all bills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub query: String,
    pub number_to_return: usize,
    pub date_range: DateRange,
    pub get_sponsors: bool,
    pub chamber: Chamber,
    /// `None` means every legislative type
    pub legislative_types: Option<Vec<String>>,
    pub require_bipartisan: bool,
    pub exact_match_strings: Vec<String>,
}

impl SummaryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            number_to_return: DEFAULT_NUMBER_TO_RETURN,
            date_range: DateRange::default(),
            get_sponsors: false,
            chamber: Chamber::Any,
            legislative_types: None,
            require_bipartisan: false,
            exact_match_strings: Vec::new(),
        }
    }

    /// Merge a loose parameter object over the defaults.
    ///
    /// Accepts the shape produced by the chat layer's function calls, including
    /// the `{start_year, start_month, ...}` date range and `"any"` for
    /// legislative types.
    pub fn from_params(params: &serde_json::Value) -> SearchResult<Self> {
        let raw: RawSummaryParams = serde_json::from_value(params.clone())
            .map_err(|e| SearchError::invalid(format!("bad search parameters: {e}")))?;

        let chamber = match raw.chamber {
            Some(c) => c.parse()?,
            None => Chamber::Any,
        };

        let date_range = match raw.date_range {
            Some(d) => d.into_range()?,
            None => DateRange::default(),
        };

        let legislative_types = match raw.legislative_types {
            None => None,
            Some(RawLegislativeTypes::One(t)) if t == "any" => None,
            Some(RawLegislativeTypes::One(t)) => Some(vec![t]),
            Some(RawLegislativeTypes::Many(ts)) if ts.is_empty() => None,
            Some(RawLegislativeTypes::Many(ts)) => Some(ts),
        };

        Ok(Self {
            query: raw.query,
            number_to_return: raw.number_to_return.unwrap_or(DEFAULT_NUMBER_TO_RETURN),
            date_range,
            get_sponsors: raw.get_sponsors,
            chamber,
            legislative_types,
            require_bipartisan: raw.require_bipartisan,
            exact_match_strings: raw.exact_match_strings,
        })
    }
}

/// Search for passages inside one bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageRequest {
    pub query: String,
    pub number_to_return: usize,
}

impl PassageRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            number_to_return: DEFAULT_NUMBER_TO_RETURN,
        }
    }

    pub fn from_params(params: &serde_json::Value) -> SearchResult<Self> {
        let raw: RawPassageParams = serde_json::from_value(params.clone())
            .map_err(|e| SearchError::invalid(format!("bad passage parameters: {e}")))?;
        Ok(Self {
            query: raw.query,
            number_to_return: raw.number_to_return.unwrap_or(DEFAULT_NUMBER_TO_RETURN),
        })
    }
}

#[derive(Deserialize)]
struct RawSummaryParams {
    #[serde(default)]
    query: String,
    number_to_return: Option<usize>,
    #[serde(default)]
    exact_match_strings: Vec<String>,
    date_range: Option<RawDateRange>,
    #[serde(default)]
    get_sponsors: bool,
    chamber: Option<String>,
    legislative_types: Option<RawLegislativeTypes>,
    #[serde(default)]
    require_bipartisan: bool,
}

#[derive(Deserialize)]
struct RawPassageParams {
    #[serde(default)]
    query: String,
    number_to_return: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLegislativeTypes {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct RawDateRange {
    #[serde(default = "default_start_year")]
    start_year: i32,
    #[serde(default = "first")]
    start_month: u32,
    #[serde(default = "first")]
    start_day: u32,
    #[serde(default = "default_end_year")]
    end_year: i32,
    #[serde(default = "default_end_month")]
    end_month: u32,
    #[serde(default = "default_end_day")]
    end_day: u32,
}

impl RawDateRange {
    fn into_range(self) -> SearchResult<DateRange> {
        let start = NaiveDate::from_ymd_opt(self.start_year, self.start_month, self.start_day)
            .ok_or_else(|| {
                SearchError::invalid(format!(
                    "invalid start date {}-{}-{}",
                    self.start_year, self.start_month, self.start_day
                ))
            })?;
        let end = NaiveDate::from_ymd_opt(self.end_year, self.end_month, self.end_day)
            .ok_or_else(|| {
                SearchError::invalid(format!(
                    "invalid end date {}-{}-{}",
                    self.end_year, self.end_month, self.end_day
                ))
            })?;
        DateRange::new(start, end)
    }
}

fn default_start_year() -> i32 {
    1970
}

fn default_end_year() -> i32 {
    2050
}

fn first() -> u32 {
    1
}

fn default_end_month() -> u32 {
    12
}

fn default_end_day() -> u32 {
    31
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chamber_parse() {
        assert_eq!("any".parse::<Chamber>().unwrap(), Chamber::Any);
        assert_eq!(
            "U.S. House of Representatives".parse::<Chamber>().unwrap(),
            Chamber::House
        );
        assert_eq!("U.S. Senate".parse::<Chamber>().unwrap(), Chamber::Senate);
        assert_eq!("Senate".parse::<Chamber>().unwrap(), Chamber::Senate);
    }

    #[test]
    fn test_unrecognized_chamber_is_invalid_parameter() {
        let err = "House of Lords".parse::<Chamber>().unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_defaults_merged() {
        let request = SummaryRequest::from_params(&json!({"query": "farm subsidies"})).unwrap();
        assert_eq!(request.query, "farm subsidies");
        assert_eq!(request.number_to_return, 5);
        assert_eq!(request.chamber, Chamber::Any);
        assert_eq!(request.date_range, DateRange::default());
        assert!(!request.get_sponsors);
        assert!(!request.require_bipartisan);
        assert!(request.legislative_types.is_none());
        assert!(request.exact_match_strings.is_empty());
    }

    #[test]
    fn test_legacy_date_range_shape() {
        let request = SummaryRequest::from_params(&json!({
            "query": "x",
            "date_range": {
                "start_year": 2019, "start_month": 1, "start_day": 3,
                "end_year": 2021, "end_month": 1, "end_day": 3
            }
        }))
        .unwrap();
        assert_eq!(
            request.date_range.start,
            NaiveDate::from_ymd_opt(2019, 1, 3).unwrap()
        );
        assert_eq!(
            request.date_range.end,
            NaiveDate::from_ymd_opt(2021, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_bad_parameters_are_invalid() {
        let cases = [
            json!({"query": "x", "number_to_return": "five"}),
            json!({"query": "x", "number_to_return": 2.5}),
            json!({"query": "x", "chamber": "Moon"}),
            json!({"query": "x", "date_range": {"start_month": 13}}),
            json!({"query": "x", "date_range": {"start_year": 2030, "end_year": 2020}}),
        ];
        for params in cases {
            let err = SummaryRequest::from_params(&params).unwrap_err();
            assert!(err.is_invalid_parameter(), "expected invalid for {params}");
        }
    }

    #[test]
    fn test_legislative_types_any() {
        let any = SummaryRequest::from_params(&json!({"legislative_types": "any"})).unwrap();
        assert!(any.legislative_types.is_none());

        let some =
            SummaryRequest::from_params(&json!({"legislative_types": ["bill", "resolution"]}))
                .unwrap();
        assert_eq!(
            some.legislative_types,
            Some(vec!["bill".to_string(), "resolution".to_string()])
        );
    }

    #[test]
    fn test_chamber_serde_roundtrip() {
        let json = serde_json::to_string(&Chamber::Senate).unwrap();
        assert_eq!(json, "\"U.S. Senate\"");
        let parsed: Chamber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Chamber::Senate);
        assert!(serde_json::from_str::<Chamber>("\"Moon\"").is_err());
    }

    #[test]
    fn test_passage_request_params() {
        let request =
            PassageRequest::from_params(&json!({"query": "tax credit", "number_to_return": 3}))
                .unwrap();
        assert_eq!(request.number_to_return, 3);
        assert!(PassageRequest::from_params(&json!({"number_to_return": -1})).is_err());
    }
}
