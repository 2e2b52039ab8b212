//! Risk categories and the ordered threshold table.

use avaterrain_core::{Error, Result, Sample};
use std::fmt;
use std::str::FromStr;

/// RGBA color with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black (used for no-data).
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// CSS `rgb(...)` string without the alpha channel
    pub fn css_rgb(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Avalanche terrain risk categories, ordered by increasing slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskCategory {
    /// Below 25°
    Low,
    /// 25° to 30°
    Moderate,
    /// 30° to 45°, where most avalanches release
    High,
    /// 45° to 60°
    VeryHigh,
    /// 60° and steeper
    Extreme,
}

impl RiskCategory {
    /// All categories in table order.
    pub const ALL: &[RiskCategory] = &[
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::VeryHigh,
        Self::Extreme,
    ];

    /// Machine-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
            Self::Extreme => "extreme",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }

    /// Look up a category by its machine-readable name
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == name)
            .ok_or_else(|| Error::UnknownCategory(name.to_string()))
    }

    fn class(&self) -> &'static RiskClass {
        &RISK_TABLE[*self as usize]
    }

    pub fn color(&self) -> Rgba {
        self.class().color
    }

    /// Slope interval in degrees as (lower, upper)
    pub fn interval(&self) -> (f64, f64) {
        let class = self.class();
        (class.lower, class.upper)
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RiskCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// One row of the threshold table: `[lower, upper)` degrees, closed on the
/// last row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskClass {
    pub lower: f64,
    pub upper: f64,
    pub category: RiskCategory,
    pub color: Rgba,
}

impl RiskClass {
    const fn new(lower: f64, upper: f64, category: RiskCategory, color: Rgba) -> Self {
        Self {
            lower,
            upper,
            category,
            color,
        }
    }
}

// ─── Threshold table ───────────────────────────────────────────────────

/// Risk classes sorted by lower bound; index matches `RiskCategory as usize`.
pub static RISK_TABLE: [RiskClass; 5] = [
    RiskClass::new(0.0, 25.0, RiskCategory::Low, Rgba::new(0, 255, 0, 150)),
    RiskClass::new(25.0, 30.0, RiskCategory::Moderate, Rgba::new(255, 255, 0, 150)),
    RiskClass::new(30.0, 45.0, RiskCategory::High, Rgba::new(255, 165, 0, 150)),
    RiskClass::new(45.0, 60.0, RiskCategory::VeryHigh, Rgba::new(255, 0, 0, 150)),
    RiskClass::new(60.0, 90.0, RiskCategory::Extreme, Rgba::new(128, 0, 128, 150)),
];

/// Classify a slope sample. Missing samples have no category.
///
/// Picks the last class whose lower bound is at or below the slope, so the
/// first class is open below and the last class is open above.
pub fn classify(slope: Sample) -> Option<RiskCategory> {
    let value = slope.value()?;
    let idx = RISK_TABLE.partition_point(|class| class.lower <= value);
    Some(RISK_TABLE[idx.saturating_sub(1)].category)
}

/// Classify a raw slope value; NaN has no category.
pub fn classify_value(slope: f64) -> Option<RiskCategory> {
    classify(Sample::new(slope))
}

/// Color of the category called `name`
pub fn risk_color(name: &str) -> Result<Rgba> {
    RiskCategory::from_name(name).map(|c| c.color())
}

/// True if the table is sorted and its intervals tile [0, 90] without gaps.
pub fn table_is_partition() -> bool {
    let first = RISK_TABLE[0].lower == 0.0;
    let last = RISK_TABLE[RISK_TABLE.len() - 1].upper == 90.0;
    let contiguous = RISK_TABLE
        .windows(2)
        .all(|pair| pair[0].upper == pair[1].lower && pair[0].lower < pair[0].upper);
    let ordered = RISK_TABLE
        .iter()
        .enumerate()
        .all(|(i, class)| class.category as usize == i);
    first && last && contiguous && ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_upper_class() {
        let cases = [
            (0.0, RiskCategory::Low),
            (24.99, RiskCategory::Low),
            (25.0, RiskCategory::Moderate),
            (29.99, RiskCategory::Moderate),
            (30.0, RiskCategory::High),
            (44.99, RiskCategory::High),
            (45.0, RiskCategory::VeryHigh),
            (59.99, RiskCategory::VeryHigh),
            (60.0, RiskCategory::Extreme),
            (90.0, RiskCategory::Extreme),
        ];
        for (slope, expected) in cases {
            assert_eq!(classify_value(slope), Some(expected), "slope {}", slope);
        }
    }

    #[test]
    fn open_ends() {
        assert_eq!(classify_value(-0.5), Some(RiskCategory::Low));
        assert_eq!(classify_value(95.0), Some(RiskCategory::Extreme));
    }

    #[test]
    fn missing_is_not_low() {
        assert_eq!(classify(Sample::Missing), None);
        assert_eq!(classify_value(f64::NAN), None);
    }

    #[test]
    fn fixed_colors() {
        assert_eq!(risk_color("low").unwrap(), Rgba::new(0, 255, 0, 150));
        assert_eq!(risk_color("moderate").unwrap(), Rgba::new(255, 255, 0, 150));
        assert_eq!(risk_color("high").unwrap(), Rgba::new(255, 165, 0, 150));
        assert_eq!(risk_color("very_high").unwrap(), Rgba::new(255, 0, 0, 150));
        assert_eq!(risk_color("extreme").unwrap(), Rgba::new(128, 0, 128, 150));
    }

    #[test]
    fn unknown_category() {
        match risk_color("catastrophic") {
            Err(Error::UnknownCategory(name)) => assert_eq!(name, "catastrophic"),
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
        assert!("Very High".parse::<RiskCategory>().is_err());
    }

    #[test]
    fn names_roundtrip() {
        for &category in RiskCategory::ALL {
            assert_eq!(category.name().parse::<RiskCategory>().unwrap(), category);
        }
        assert_eq!(RiskCategory::VeryHigh.label(), "Very High");
        assert_eq!(RiskCategory::High.interval(), (30.0, 45.0));
    }

    #[test]
    fn table_tiles_range() {
        assert!(table_is_partition());
    }

    #[test]
    fn css_color() {
        assert_eq!(RiskCategory::High.color().css_rgb(), "rgb(255, 165, 0)");
    }
}
