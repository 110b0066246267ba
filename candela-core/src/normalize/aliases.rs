use core::fmt;

/// Required canonical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Bar timestamp.
    Timestamp,
    /// Open price.
    Open,
    /// High price.
    High,
    /// Low price.
    Low,
    /// Close price.
    Close,
    /// Volume.
    Volume,
}

impl Field {
    /// Every required field, in canonical column order.
    pub const ALL: [Self; 6] = [
        Self::Timestamp,
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::Volume,
    ];

    /// Canonical column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Lower-case vendor spellings. Checked once per header at normalization time.
const ALIASES: &[(&str, Field)] = &[
    ("timestamp", Field::Timestamp),
    ("time", Field::Timestamp),
    ("date", Field::Timestamp),
    ("datetime", Field::Timestamp),
    ("date_time", Field::Timestamp),
    ("ts", Field::Timestamp),
    ("t", Field::Timestamp),
    ("open_time", Field::Timestamp),
    ("open", Field::Open),
    ("o", Field::Open),
    ("open_price", Field::Open),
    ("high", Field::High),
    ("h", Field::High),
    ("high_price", Field::High),
    ("low", Field::Low),
    ("l", Field::Low),
    ("low_price", Field::Low),
    ("close", Field::Close),
    ("c", Field::Close),
    ("close_price", Field::Close),
    ("last", Field::Close),
    ("price", Field::Close),
    ("volume", Field::Volume),
    ("v", Field::Volume),
    ("vol", Field::Volume),
    ("qty", Field::Volume),
    ("quantity", Field::Volume),
];

/// Resolve a header to a canonical field, case-insensitively.
#[must_use]
pub fn resolve(header: &str) -> Option<Field> {
    let key = header.trim().to_ascii_lowercase();
    ALIASES
        .iter()
        .find_map(|&(alias, field)| (alias == key).then_some(field))
}

/// Column positions of the six required fields.
#[derive(Debug, Default)]
pub(crate) struct FieldSlots([Option<usize>; 6]);

impl FieldSlots {
    /// Record `col` for `field` unless an earlier column already claimed it.
    ///
    /// Returns `false` when the field was already taken.
    pub(crate) fn claim(&mut self, field: Field, col: usize) -> bool {
        let slot = &mut self.0[field.slot()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(col);
        true
    }

    pub(crate) fn get(&self, field: Field) -> Option<usize> {
        self.0[field.slot()]
    }

    pub(crate) fn missing(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| self.get(*f).is_none())
    }
}
