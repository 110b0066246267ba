//! Session-hours and event-day tables used by the enricher.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// A labeled wall-clock window, half-open `[start, end)`.
///
/// A window whose `end` is not after `start` wraps past midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    /// Label written to the `session` column.
    pub label: String,
    /// Inclusive start time.
    pub start: NaiveTime,
    /// Exclusive end time.
    pub end: NaiveTime,
}

impl SessionWindow {
    /// Build a window.
    pub fn new(label: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// True when the local wall-clock time `t` falls inside the window.
    #[must_use]
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start < self.end {
            self.start <= t && t < self.end
        } else {
            t >= self.start || t < self.end
        }
    }
}

/// Fixed session and event tables evaluated in one timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calendar {
    /// Timezone in which session windows and calendar dates are evaluated.
    pub timezone: chrono_tz::Tz,
    /// Session windows, first match wins.
    pub sessions: Vec<SessionWindow>,
    /// Label used when no window matches.
    pub default_session: String,
    /// Local dates flagged as macro-event days.
    pub event_dates: BTreeSet<NaiveDate>,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::us_equities()
    }
}

impl Calendar {
    /// US equities: `RTH` 09:30–16:00 New York time, `ETH` otherwise.
    #[must_use]
    pub fn us_equities() -> Self {
        Self {
            timezone: chrono_tz::America::New_York,
            sessions: vec![SessionWindow::new("RTH", hm(9, 30), hm(16, 0))],
            default_session: "ETH".to_string(),
            event_dates: BTreeSet::new(),
        }
    }

    /// US equities split into `PRE` 04:00–09:30, `RTH` 09:30–16:00 and
    /// `POST` 16:00–20:00, with `ETH` for the overnight remainder.
    #[must_use]
    pub fn us_equities_extended() -> Self {
        Self::us_equities()
            .with_session(SessionWindow::new("PRE", hm(4, 0), hm(9, 30)))
            .with_session(SessionWindow::new("POST", hm(16, 0), hm(20, 0)))
    }

    /// A UTC calendar with no session windows; every row gets the default label.
    #[must_use]
    pub fn utc() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            sessions: Vec::new(),
            default_session: "ETH".to_string(),
            event_dates: BTreeSet::new(),
        }
    }

    /// Evaluate rules in another timezone.
    #[must_use]
    pub const fn with_timezone(mut self, tz: chrono_tz::Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Append a session window (lower priority than existing ones).
    #[must_use]
    pub fn with_session(mut self, window: SessionWindow) -> Self {
        self.sessions.push(window);
        self
    }

    /// Set the fallback session label.
    #[must_use]
    pub fn with_default_session(mut self, label: impl Into<String>) -> Self {
        self.default_session = label.into();
        self
    }

    /// Add macro-event dates.
    #[must_use]
    pub fn with_event_dates<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.event_dates.extend(dates);
        self
    }

    /// Session label for a local wall-clock time.
    #[must_use]
    pub fn session_label(&self, t: NaiveTime) -> &str {
        self.sessions
            .iter()
            .find(|w| w.contains(t))
            .map_or(self.default_session.as_str(), |w| w.label.as_str())
    }
}
