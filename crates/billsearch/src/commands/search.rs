use crate::cli::SearchArgs;
use billsearch_core::{Chamber, DateRange, SearchConfig, SummaryRequest};
use billsearch_index::SearchEngine;

pub fn run(args: SearchArgs, config: SearchConfig) -> anyhow::Result<()> {
    let request = build_request(&args)?;
    let engine = SearchEngine::new(&args.db, config)?;
    let summaries = engine.retrieve_summary(&request)?;
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

fn build_request(args: &SearchArgs) -> anyhow::Result<SummaryRequest> {
    let mut request = SummaryRequest::new(args.query.as_str());
    if let Some(n) = args.count {
        request.number_to_return = n;
    }
    request.chamber = args.chamber.parse::<Chamber>()?;

    let defaults = DateRange::default();
    request.date_range = DateRange::new(
        args.from.unwrap_or(defaults.start),
        args.to.unwrap_or(defaults.end),
    )?;

    request.require_bipartisan = args.bipartisan;
    request.get_sponsors = args.sponsors;
    if !args.types.is_empty() && !args.types.iter().any(|t| t == "any") {
        request.legislative_types = Some(args.types.clone());
    }
    request.exact_match_strings = args.exact.clone();
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn args(query: &str) -> SearchArgs {
        SearchArgs {
            db: PathBuf::from("bills.db"),
            query: query.to_string(),
            count: None,
            chamber: "any".to_string(),
            from: None,
            to: None,
            bipartisan: false,
            sponsors: false,
            types: Vec::new(),
            exact: Vec::new(),
        }
    }

    #[test]
    fn test_defaults_carry_over() {
        let request = build_request(&args("water")).unwrap();
        assert_eq!(request, SummaryRequest::new("water"));
    }

    #[test]
    fn test_flags_map_to_request() {
        let mut a = args("water");
        a.count = Some(2);
        a.chamber = "House".to_string();
        a.from = NaiveDate::from_ymd_opt(2019, 1, 1);
        a.types = vec!["bill".to_string()];
        a.sponsors = true;

        let request = build_request(&a).unwrap();
        assert_eq!(request.number_to_return, 2);
        assert_eq!(request.chamber, Chamber::House);
        assert_eq!(request.date_range.start, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(request.date_range.end, DateRange::default().end);
        assert_eq!(request.legislative_types, Some(vec!["bill".to_string()]));
        assert!(request.get_sponsors);
    }

    #[test]
    fn test_any_type_means_unrestricted() {
        let mut a = args("water");
        a.types = vec!["any".to_string()];
        assert!(build_request(&a).unwrap().legislative_types.is_none());
    }

    #[test]
    fn test_bad_chamber_and_inverted_dates() {
        let mut a = args("water");
        a.chamber = "parliament".to_string();
        assert!(build_request(&a).is_err());

        let mut b = args("water");
        b.from = NaiveDate::from_ymd_opt(2020, 1, 1);
        b.to = NaiveDate::from_ymd_opt(2019, 1, 1);
        assert!(build_request(&b).is_err());
    }
}
