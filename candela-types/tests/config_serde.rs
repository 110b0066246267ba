use candela_types::{
    Bar, BarSeries, Calendar, CandelaError, Decimal, FillPolicy, NormalizeOptions,
    PipelineConfig, SessionWindow, Timeframe, Value,
};
use chrono::{DateTime, NaiveDate, NaiveTime};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn pipeline_config_roundtrip_preserves_fields() {
    let cfg = PipelineConfig {
        timeframes: vec![Timeframe::M5, Timeframe::D1],
        fill_policy: FillPolicy::ForwardFill,
        normalize: NormalizeOptions::default()
            .with_column("Px_Open", "open")
            .with_source_timezone(chrono_tz::Europe::London),
        calendar: Some(
            Calendar::us_equities()
                .with_event_dates([NaiveDate::from_ymd_opt(2024, 3, 12).unwrap()]),
        ),
    };
    let json = serde_json::to_string(&cfg).expect("serialize config");
    let de: PipelineConfig = serde_json::from_str(&json).expect("deserialize config");
    assert_eq!(de, cfg);
}

#[test]
fn partial_config_fills_defaults() {
    let de: PipelineConfig =
        serde_json::from_str(r#"{"timeframes":["1h"],"fill_policy":"forward_fill"}"#).unwrap();
    assert_eq!(de.timeframes, vec![Timeframe::H1]);
    assert_eq!(de.fill_policy, FillPolicy::ForwardFill);
    assert_eq!(de.normalize, NormalizeOptions::default());
    assert!(de.normalize.keep_extra_columns);
    assert!(de.calendar.is_none());
}

#[test]
fn session_windows_are_half_open_and_may_wrap() {
    let rth = SessionWindow::new("RTH", t(9, 30), t(16, 0));
    assert!(rth.contains(t(9, 30)));
    assert!(rth.contains(t(15, 59)));
    assert!(!rth.contains(t(16, 0)));
    assert!(!rth.contains(t(9, 29)));

    let overnight = SessionWindow::new("NIGHT", t(20, 0), t(4, 0));
    assert!(overnight.contains(t(23, 0)));
    assert!(overnight.contains(t(0, 0)));
    assert!(!overnight.contains(t(4, 0)));
    assert!(!overnight.contains(t(12, 0)));
}

#[test]
fn extended_calendar_labels_first_match() {
    let cal = Calendar::us_equities_extended();
    assert_eq!(cal.session_label(t(5, 0)), "PRE");
    assert_eq!(cal.session_label(t(10, 0)), "RTH");
    assert_eq!(cal.session_label(t(17, 0)), "POST");
    assert_eq!(cal.session_label(t(22, 0)), "ETH");
}

#[test]
fn series_shape_is_checked_on_construction_and_deserialization() {
    let ts = DateTime::from_timestamp(0, 0).unwrap();
    let one = Decimal::ONE;
    let bar = Bar::new(ts, one, one, one, one, one).with_extra(vec![Some(Value::Int(1))]);

    let ok = BarSeries::with_columns(vec!["x".into()], vec![bar.clone()]).unwrap();
    assert_eq!(ok.value(0, "x"), Some(&Value::Int(1)));

    let bad = BarSeries::with_columns(vec!["x".into(), "y".into()], vec![bar.clone()]);
    assert!(matches!(bad, Err(CandelaError::Data(_))));

    let dup = BarSeries::with_columns(vec!["x".into(), "x".into()], vec![]);
    assert!(matches!(dup, Err(CandelaError::Data(_))));

    let json = serde_json::to_string(&ok).unwrap();
    let back: BarSeries = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ok);

    let broken = json.replace(r#"["x"]"#, r#"["x","y"]"#);
    assert!(serde_json::from_str::<BarSeries>(&broken).is_err());
}

#[test]
fn series_timeframe_is_optional_in_json() {
    let ts = DateTime::from_timestamp(0, 0).unwrap();
    let one = Decimal::ONE;
    let source = BarSeries::new(vec![Bar::new(ts, one, one, one, one, one)]);
    assert_eq!(source.timeframe(), None);
    assert!(!serde_json::to_string(&source).unwrap().contains("timeframe"));

    let daily = source.with_timeframe(Some(Timeframe::D1));
    let json = serde_json::to_string(&daily).unwrap();
    assert!(json.contains(r#""timeframe":"1d""#));
    let back: BarSeries = serde_json::from_str(&json).unwrap();
    assert_eq!(back.timeframe(), Some(Timeframe::D1));
    assert_eq!(back, daily);
}

#[test]
fn error_helpers_sort_schema_columns() {
    let e = CandelaError::schema(["volume", "close", "close"]);
    assert_eq!(
        e,
        CandelaError::Schema {
            missing: vec!["close".into(), "volume".into()]
        }
    );
    assert_eq!(e.to_string(), "missing required columns: close, volume");
    assert!(e.is_data_error());
    assert!(!CandelaError::granularity("1s", 60).is_data_error());
}
