//! Corpus records and search results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A sponsor or cosponsor of a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub loc_id: String,
    pub name: String,
    pub full_name: String,
    pub chamber: String,
    pub party: String,
}

/// Full bill record as ingested into the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub official_title: String,
    pub text: String,
    pub date: NaiveDate,
    /// Publishing chamber, e.g. "U.S. House of Representatives"
    pub publisher: String,
    #[serde(default)]
    pub legis_type: String,
    pub congress: i64,
    #[serde(default)]
    pub session: String,
    /// Short bill type, e.g. "hr" or "s"
    pub bill_type: String,
    pub bill_number: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub multiple_parties: bool,
    #[serde(default)]
    pub generated_url: String,
    #[serde(default)]
    pub committee_name: Option<String>,
    #[serde(default)]
    pub current_chamber: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sponsors: Vec<Sponsor>,
}

/// Search result for one bill, hydrated after ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillSummary {
    pub id: i64,
    /// Stored summary, or the head of the full text when there is none
    pub summary_text: String,
    pub title: String,
    pub official_title: String,
    pub available_chunks: i64,
    pub multiple_parties: bool,
    pub generated_url: String,
    pub stage_in_process: String,
    pub bill_number: String,
    pub bill_type: String,
    pub congress: i64,
    pub date: String,
    pub legis_type: String,
    pub committee_name: Option<String>,
    pub publisher: String,
    pub current_chamber: Option<String>,
    pub session: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsors: Option<Vec<Sponsor>>,
}

/// A passage from one bill and its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassageMatch {
    pub passage: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_minimal_json() {
        let json = r#"{
            "id": 7,
            "title": "Clean Air Act",
            "text": "An act to clean the air.",
            "date": "2021-03-04",
            "publisher": "U.S. Senate",
            "congress": 117,
            "bill_type": "s",
            "bill_number": "101"
        }"#;
        let bill: Bill = serde_json::from_str(json).unwrap();
        assert_eq!(bill.id, 7);
        assert_eq!(bill.date, NaiveDate::from_ymd_opt(2021, 3, 4).unwrap());
        assert!(bill.summary.is_none());
        assert!(bill.sponsors.is_empty());
        assert!(!bill.multiple_parties);
    }

    #[test]
    fn test_summary_omits_unrequested_sponsors() {
        let summary = BillSummary {
            id: 1,
            summary_text: "text".to_string(),
            title: "t".to_string(),
            official_title: String::new(),
            available_chunks: 0,
            multiple_parties: false,
            generated_url: String::new(),
            stage_in_process: String::new(),
            bill_number: "1".to_string(),
            bill_type: "hr".to_string(),
            congress: 118,
            date: "2023-01-01".to_string(),
            legis_type: String::new(),
            committee_name: None,
            publisher: "U.S. House of Representatives".to_string(),
            current_chamber: None,
            session: String::new(),
            sponsors: None,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("sponsors").is_none());
    }
}
