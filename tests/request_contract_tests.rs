use chrono::NaiveDate;
use coviscope::api::{
    AggregationFunc, CountrySelection, Metric, REQUEST_JSON_SCHEMA_V1, ScopeRequest,
};
use coviscope::error::ScopeError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn request() -> ScopeRequest {
    ScopeRequest::new(date(2020, 3, 1), date(2020, 3, 31), Metric::NewConfirmed)
        .expect("valid request")
}

#[test]
fn request_serializes_with_endpoint_field_names() {
    let request = request()
        .with_aggregation(AggregationFunc::Max)
        .with_countries(["us", "IN"]);
    let json: serde_json::Value =
        serde_json::from_str(&request.to_json().expect("to json")).expect("parse back");

    assert_eq!(json["startDate"], "2020-03-01");
    assert_eq!(json["endDate"], "2020-03-31");
    assert_eq!(json["matrix"], "new_confirmed");
    assert_eq!(json["aggregationFunc"], "max");
    assert_eq!(json["countries"], serde_json::json!(["US", "IN"]));
}

#[test]
fn inverted_date_range_is_rejected() {
    let err = ScopeRequest::new(date(2020, 4, 1), date(2020, 3, 1), Metric::NewDeceased)
        .expect_err("range must be rejected");
    assert!(matches!(err, ScopeError::InvalidDateRange { .. }));
}

#[test]
fn single_day_range_is_allowed() {
    assert!(ScopeRequest::new(date(2020, 4, 1), date(2020, 4, 1), Metric::NewDeceased).is_ok());
}

#[test]
fn empty_country_list_means_all_countries() {
    let request = request();
    assert_eq!(request.country_selection(), CountrySelection::All);

    let request = request.with_countries(["nl"]);
    assert_eq!(
        request.country_selection(),
        CountrySelection::Only(&["NL".to_owned()])
    );
}

#[test]
fn aggregation_is_optional_on_the_wire() {
    let request = ScopeRequest::from_json_str(
        r#"{"startDate":"2020-01-01","endDate":"2020-02-01","matrix":"cumulative_confirmed","countries":[" cn","CN"]}"#,
    )
    .expect("parse request");

    assert_eq!(request.aggregation, AggregationFunc::Sum);
    assert_eq!(request.metric, Metric::CumulativeConfirmed);
    assert_eq!(request.countries, vec!["CN".to_owned()]);
}

#[test]
fn unknown_metric_and_bad_dates_are_rejected() {
    let unknown_metric = ScopeRequest::from_json_str(
        r#"{"startDate":"2020-01-01","endDate":"2020-02-01","matrix":"recovered"}"#,
    );
    assert!(matches!(unknown_metric, Err(ScopeError::InvalidRequest(_))));

    let bad_date = ScopeRequest::from_json_str(
        r#"{"startDate":"01/01/2020","endDate":"2020-02-01","matrix":"new_confirmed"}"#,
    );
    assert!(matches!(bad_date, Err(ScopeError::InvalidRequest(_))));
}

#[test]
fn metric_and_aggregation_parse_from_control_values() {
    assert_eq!("new_deceased".parse::<Metric>().expect("metric"), Metric::NewDeceased);
    assert_eq!("avg".parse::<AggregationFunc>().expect("agg"), AggregationFunc::Avg);

    let err = "median".parse::<AggregationFunc>().expect_err("unknown aggregation");
    assert!(err.to_string().contains("sum, avg, max, min"));
    assert!("deaths".parse::<Metric>().is_err());
}

#[test]
fn metric_display_names_match_selector_options() {
    assert_eq!(Metric::NewConfirmed.display_name(), "New Cases");
    assert_eq!(Metric::NewDeceased.display_name(), "Deaths");
    assert_eq!(Metric::CumulativeConfirmed.display_name(), "Total Cases");
    assert_eq!(Metric::default(), Metric::CumulativeConfirmed);
}

#[test]
fn json_contract_v1_is_accepted_alongside_bare_request() {
    let request = request().with_countries(["US"]);
    let envelope = request.to_json_contract_v1_pretty().expect("envelope");
    let parsed: serde_json::Value = serde_json::from_str(&envelope).expect("json");
    assert_eq!(parsed["schema_version"], REQUEST_JSON_SCHEMA_V1);

    let from_envelope = ScopeRequest::from_json_compat_str(&envelope).expect("envelope parse");
    let from_bare =
        ScopeRequest::from_json_compat_str(&request.to_json().expect("bare")).expect("bare parse");

    assert_eq!(from_envelope, request);
    assert_eq!(from_bare, request);
}

#[test]
fn json_contract_rejects_unknown_schema_version() {
    let input = r#"{"schema_version":2,"request":{"startDate":"2020-01-01","endDate":"2020-01-02","matrix":"new_confirmed"}}"#;
    let err = ScopeRequest::from_json_compat_str(input).expect_err("version 2 unsupported");
    assert!(err.to_string().contains("unsupported request schema version"));
}

#[test]
fn missing_date_bounds_report_the_missing_parameter() {
    let no_start = r#"{"endDate":"2020-01-02","matrix":"new_confirmed"}"#;
    assert!(matches!(
        ScopeRequest::from_json_str(no_start),
        Err(ScopeError::MissingParameter("startDate"))
    ));

    let no_end = r#"{"startDate":"2020-01-01","matrix":"new_confirmed"}"#;
    assert!(matches!(
        ScopeRequest::from_json_compat_str(no_end),
        Err(ScopeError::MissingParameter("endDate"))
    ));

    let envelope = r#"{"schema_version":1,"request":{"endDate":"2020-01-02","matrix":"new_confirmed"}}"#;
    assert!(matches!(
        ScopeRequest::from_json_compat_str(envelope),
        Err(ScopeError::MissingParameter("startDate"))
    ));
}

#[test]
fn direct_deserialization_normalizes_and_validates() {
    let parsed: ScopeRequest = serde_json::from_str(
        r#"{"startDate":"2020-01-01","endDate":"2020-01-02","matrix":"new_confirmed","countries":["us"," us"]}"#,
    )
    .expect("valid body");
    assert_eq!(parsed.countries, vec!["US".to_owned()]);

    let inverted = serde_json::from_str::<ScopeRequest>(
        r#"{"startDate":"2020-02-01","endDate":"2020-01-02","matrix":"new_confirmed"}"#,
    );
    assert!(inverted.is_err());
}
