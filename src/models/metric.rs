use serde::{Deserialize, Serialize};

/// Envelope a metric's synthetic values are anchored in before the daily
/// cycle, weekly trend and noise are added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseRange {
    pub min: f64,
    pub max: f64,
}

/// Values may drift this far outside the base range before being clamped.
pub const RANGE_MARGIN: f64 = 10.0;

/// Range used for any metric name not in the catalog.
pub const FALLBACK_RANGE: BaseRange = BaseRange {
    min: 0.0,
    max: 100.0,
};

impl BaseRange {
    pub fn lower_bound(&self) -> f64 {
        self.min - RANGE_MARGIN
    }

    pub fn upper_bound(&self) -> f64 {
        self.max + RANGE_MARGIN
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
    Rainfall,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Pressure,
        Metric::WindSpeed,
        Metric::Rainfall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Pressure => "pressure",
            Metric::WindSpeed => "wind_speed",
            Metric::Rainfall => "rainfall",
        }
    }

    /// Expects an already lowercased name.
    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|metric| metric.name() == name)
    }

    pub fn base_range(&self) -> BaseRange {
        let (min, max) = match self {
            Metric::Temperature => (15.0, 35.0),
            Metric::Humidity => (30.0, 90.0),
            Metric::Pressure => (980.0, 1030.0),
            Metric::WindSpeed => (0.0, 25.0),
            Metric::Rainfall => (0.0, 10.0),
        };
        BaseRange { min, max }
    }
}

/// Resolve the base range for a free-form metric name. Unknown names get
/// [`FALLBACK_RANGE`] rather than an error.
pub fn base_range_for(name: &str) -> BaseRange {
    Metric::from_name(&name.to_lowercase())
        .map(|metric| metric.base_range())
        .unwrap_or(FALLBACK_RANGE)
}

#[derive(Serialize, Debug, PartialEq)]
pub struct MetricsCatalog {
    pub metrics: Vec<Metric>,
}

pub fn list_metrics() -> MetricsCatalog {
    MetricsCatalog {
        metrics: Metric::ALL.to_vec(),
    }
}
