use candela_types::{CandelaError, TimeUnit, Timeframe, TimeframeKind};

fn tf(s: &str) -> Timeframe {
    s.parse().unwrap()
}

#[test]
fn canonical_identifiers_round_trip_through_display() {
    for id in [
        "30s", "1min", "5min", "15min", "90min", "1h", "4h", "1d", "2d", "1w", "1mo", "3mo",
    ] {
        assert_eq!(tf(id).to_string(), id);
    }
}

#[test]
fn aliases_resolve_to_the_same_timeframe() {
    assert_eq!(tf("5m"), Timeframe::M5);
    assert_eq!(tf("5T"), Timeframe::M5);
    assert_eq!(tf("5 minutes"), Timeframe::M5);
    assert_eq!(tf("1H"), Timeframe::H1);
    assert_eq!(tf("h"), Timeframe::H1);
    assert_eq!(tf("1 day"), Timeframe::D1);
    assert_eq!(tf("1W"), Timeframe::W1);
    assert_eq!(tf("1M"), Timeframe::MO1);
    assert_eq!(tf("1MS"), Timeframe::MO1);
    assert_eq!(tf("1 month"), Timeframe::MO1);
}

#[test]
fn lower_m_is_minutes_and_upper_m_is_months() {
    assert_eq!(tf("1m").time_unit(), TimeUnit::Minute);
    assert_eq!(tf("1M").time_unit(), TimeUnit::Month);
}

#[test]
fn equivalent_fixed_identifiers_collapse() {
    assert_eq!(tf("60min"), Timeframe::H1);
    assert_eq!(tf("3600s"), Timeframe::H1);
    assert_eq!(tf("120s"), tf("2min"));
    assert_eq!(tf("90min").to_string(), "90min");
    // Whole days of hours share midnight buckets; weeks start on Monday instead.
    assert_eq!(tf("24h"), Timeframe::D1);
    assert_eq!(tf("1440min"), Timeframe::D1);
    assert_eq!(tf("48h").to_string(), "2d");
    assert_eq!(tf("36h").to_string(), "36h");
    assert_ne!(tf("7d"), Timeframe::W1);
}

#[test]
fn invalid_identifiers_are_rejected() {
    for bad in ["", "5", "0min", "min5", "-5min", "5ms", "5 fortnights", "99999999999min"] {
        let err = bad.parse::<Timeframe>().unwrap_err();
        assert!(
            matches!(err, CandelaError::InvalidTimeframe(_)),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn kinds_and_spans() {
    assert_eq!(Timeframe::M5.kind(), TimeframeKind::Fixed);
    assert_eq!(Timeframe::D1.kind(), TimeframeKind::Calendar);
    assert_eq!(Timeframe::M5.fixed_seconds(), Some(300));
    assert_eq!(Timeframe::W1.fixed_seconds(), None);
    assert_eq!(Timeframe::W1.max_span_seconds(), 7 * 86_400);
    assert_eq!(Timeframe::MO1.max_span_seconds(), 31 * 86_400);
    assert!(Timeframe::H4.is_subdaily());
    assert!(!Timeframe::D1.is_subdaily());
}

#[test]
fn ordering_follows_duration() {
    let mut v = vec![
        Timeframe::MO1,
        tf("90min"),
        Timeframe::D1,
        Timeframe::M1,
        Timeframe::H1,
        Timeframe::W1,
        tf("30s"),
    ];
    v.sort();
    let ids: Vec<String> = v.iter().map(ToString::to_string).collect();
    assert_eq!(ids, ["30s", "1min", "1h", "90min", "1d", "1w", "1mo"]);
}

#[test]
fn serde_uses_canonical_strings() {
    let json = serde_json::to_string(&vec![Timeframe::M5, Timeframe::W1]).unwrap();
    assert_eq!(json, r#"["5min","1w"]"#);
    let back: Vec<Timeframe> = serde_json::from_str(r#"["60m","1M"]"#).unwrap();
    assert_eq!(back, vec![Timeframe::H1, Timeframe::MO1]);
    assert!(serde_json::from_str::<Timeframe>(r#""0d""#).is_err());
}
