use candela_core::{
    Bar, BarSeries, Calendar, CandelaError, ENRICH_COLUMNS, FillPolicy, SessionWindow, Timeframe,
    Value, enrich, resample_one,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

fn at(s: &str) -> Bar {
    let ts: DateTime<Utc> = DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc);
    let px = Decimal::ONE;
    Bar::new(ts, px, px, px, px, Decimal::TEN)
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn rth_tracks_new_york_across_dst() {
    // 14:30Z is 09:30 EST in winter but 10:30 EDT in summer; 13:30Z is 08:30 EST / 09:30 EDT.
    let series = BarSeries::new(vec![
        at("2024-01-03T13:30:00Z"),
        at("2024-01-03T14:30:00Z"),
        at("2024-07-03T13:30:00Z"),
        at("2024-07-03T20:00:00Z"),
    ]);
    let out = enrich(&series, &Calendar::us_equities()).unwrap();
    let sessions: Vec<_> = (0..out.len()).map(|i| out.value(i, "session").cloned()).collect();
    assert_eq!(
        sessions,
        [Some(text("ETH")), Some(text("RTH")), Some(text("RTH")), Some(text("ETH"))]
    );
    assert_eq!(out.bars().len(), series.len());
    for (a, b) in out.bars().iter().zip(series.bars()) {
        assert_eq!((a.ts, a.open, a.close, a.volume), (b.ts, b.open, b.close, b.volume));
    }
}

#[test]
fn extended_sessions_and_custom_windows() {
    let series = BarSeries::new(vec![
        at("2024-03-12T09:00:00Z"),
        at("2024-03-12T21:00:00Z"),
        at("2024-03-13T02:00:00Z"),
    ]);
    let out = enrich(&series, &Calendar::us_equities_extended()).unwrap();
    assert_eq!(out.value(0, "session"), Some(&text("PRE")));
    assert_eq!(out.value(1, "session"), Some(&text("POST")));
    assert_eq!(out.value(2, "session"), Some(&text("ETH")));

    let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    let overnight = Calendar::utc()
        .with_session(SessionWindow::new("ASIA", hm(23, 0), hm(8, 0)))
        .with_default_session("OTHER");
    let out = enrich(&series, &overnight).unwrap();
    assert_eq!(out.value(0, "session"), Some(&text("OTHER")));
    assert_eq!(out.value(2, "session"), Some(&text("ASIA")));
}

#[test]
fn calendar_fields_use_local_date() {
    // 2024-03-01T02:00Z is still Thursday 2024-02-29 in New York.
    let fomc = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let cal = Calendar::us_equities().with_event_dates([fomc]);
    let series = BarSeries::new(vec![at("2024-03-01T02:00:00Z"), at("2024-03-15T15:00:00Z")]);
    let out = enrich(&series, &cal).unwrap();

    assert_eq!(out.value(0, "day_of_week"), Some(&Value::Int(3)));
    assert_eq!(out.value(0, "weekday_name"), Some(&text("Thursday")));
    assert_eq!(out.value(0, "week_of_month"), Some(&Value::Int(5)));
    assert_eq!(out.value(0, "month"), Some(&Value::Int(2)));
    assert_eq!(out.value(0, "is_event_day"), Some(&Value::Bool(true)));

    assert_eq!(out.value(1, "day_of_week"), Some(&Value::Int(4)));
    assert_eq!(out.value(1, "weekday_name"), Some(&text("Friday")));
    assert_eq!(out.value(1, "week_of_month"), Some(&Value::Int(3)));
    assert_eq!(out.value(1, "month"), Some(&Value::Int(3)));
    assert_eq!(out.value(1, "is_event_day"), Some(&Value::Bool(false)));
}

#[test]
fn existing_columns_are_kept_in_front() {
    let series = BarSeries::with_columns(
        vec!["vwap".to_string()],
        vec![at("2024-01-03T15:00:00Z").with_extra(vec![Some(Value::Int(7))])],
    )
    .unwrap();
    let out = enrich(&series, &Calendar::default()).unwrap();
    let mut want = vec!["vwap".to_string()];
    want.extend(ENRICH_COLUMNS.iter().map(|c| (*c).to_string()));
    assert_eq!(out.columns(), want.as_slice());
    assert_eq!(out.value(0, "vwap"), Some(&Value::Int(7)));
}

#[test]
fn enriching_twice_is_rejected() {
    let series = BarSeries::new(vec![at("2024-01-03T15:00:00Z")]);
    let once = enrich(&series, &Calendar::default()).unwrap();
    let err = enrich(&once, &Calendar::default()).unwrap_err();
    assert!(matches!(err, CandelaError::Data(msg) if msg.contains("session")));
}

#[test]
fn empty_series_stays_empty() {
    let out = enrich(&BarSeries::default(), &Calendar::utc()).unwrap();
    assert!(out.is_empty());
    assert_eq!(out.columns().len(), ENRICH_COLUMNS.len());
}

#[test]
fn resampled_timeframe_survives_enrichment() {
    let series = BarSeries::new(vec![at("2024-01-03T15:00:00Z"), at("2024-01-03T15:01:00Z")]);
    let hourly = resample_one(&series, Timeframe::H1, FillPolicy::None).unwrap();
    let out = enrich(&hourly, &Calendar::us_equities()).unwrap();
    assert_eq!(out.timeframe(), Some(Timeframe::H1));
    assert_eq!(out.value(0, "weekday_name"), Some(&text("Wednesday")));
    assert_eq!(enrich(&series, &Calendar::utc()).unwrap().timeframe(), None);
}
