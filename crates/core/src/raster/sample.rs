//! Per-cell sample values with explicit no-data

/// A single raster cell value.
///
/// Missing samples are carried as their own variant instead of a reserved
/// float, so they can never be mistaken for a real zero elevation or a flat
/// slope. Converting a NaN float always yields [`Sample::Missing`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Sample {
    /// No valid measurement for this cell
    #[default]
    Missing,
    /// A finite measurement
    Value(f64),
}

impl Sample {
    /// Wrap a float, mapping NaN to `Missing`
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Sample::Missing
        } else {
            Sample::Value(value)
        }
    }

    /// Wrap a raw value, treating anything below `floor` as missing.
    ///
    /// SRTM tiles encode voids as -32768, so a floor of -1000 m catches them
    /// without touching genuine below-sea-level terrain.
    pub fn with_floor(value: f64, floor: f64) -> Self {
        if value < floor {
            Sample::Missing
        } else {
            Sample::new(value)
        }
    }

    /// The wrapped value, if any
    pub fn value(self) -> Option<f64> {
        match self {
            Sample::Missing => None,
            Sample::Value(v) => Some(v),
        }
    }

    /// Whether this sample is missing
    pub fn is_missing(self) -> bool {
        matches!(self, Sample::Missing)
    }

    /// Lossy conversion to a float, with NaN for missing samples
    pub fn to_f64(self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }

    /// Apply `f` to a present value; missing stays missing
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Sample::Missing => Sample::Missing,
            Sample::Value(v) => Sample::new(f(v)),
        }
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::new(value)
    }
}

impl From<Option<f64>> for Sample {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Sample::Missing, Sample::new)
    }
}
