use billsearch_core::Bill;
use chrono::NaiveDate;

pub(crate) fn sample_bill(id: i64, title: &str, text: &str) -> Bill {
    Bill {
        id,
        title: title.to_string(),
        official_title: String::new(),
        text: text.to_string(),
        date: NaiveDate::from_ymd_opt(2022, 5, 1).unwrap(),
        publisher: "U.S. House of Representatives".to_string(),
        legis_type: "bill".to_string(),
        congress: 117,
        session: "2".to_string(),
        bill_type: "hr".to_string(),
        bill_number: id.to_string(),
        stage: "ih".to_string(),
        multiple_parties: false,
        generated_url: format!("https://example.org/bills/{id}"),
        committee_name: None,
        current_chamber: None,
        summary: None,
        sponsors: Vec::new(),
    }
}
