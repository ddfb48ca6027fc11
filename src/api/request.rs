use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::normalize_entity_code;
use crate::error::{ScopeError, ScopeResult};

/// Epidemiological metric plotted on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    CumulativeConfirmed,
    NewConfirmed,
    NewDeceased,
}

impl Metric {
    pub const ALL: [Self; 3] = [
        Self::CumulativeConfirmed,
        Self::NewConfirmed,
        Self::NewDeceased,
    ];

    /// Wire name, also the column name on the data side.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CumulativeConfirmed => "cumulative_confirmed",
            Self::NewConfirmed => "new_confirmed",
            Self::NewDeceased => "new_deceased",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::CumulativeConfirmed => "Total Cases",
            Self::NewConfirmed => "New Cases",
            Self::NewDeceased => "Deaths",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s.trim())
            .ok_or_else(|| {
                ScopeError::InvalidRequest(format!(
                    "invalid metric name `{s}` (expected one of: new_confirmed, new_deceased, cumulative_confirmed)"
                ))
            })
    }
}

/// Per-date aggregation applied across the rows of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationFunc {
    #[default]
    Sum,
    Avg,
    Max,
    Min,
}

impl AggregationFunc {
    pub const ALL: [Self; 4] = [Self::Sum, Self::Avg, Self::Max, Self::Min];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Max => "max",
            Self::Min => "min",
        }
    }
}

impl fmt::Display for AggregationFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregationFunc {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|func| func.as_str() == s.trim())
            .ok_or_else(|| {
                ScopeError::InvalidRequest(format!(
                    "invalid aggregation function name `{s}` (expected one of: sum, avg, max, min)"
                ))
            })
    }
}

/// Which entities a request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountrySelection<'a> {
    /// Empty code list: every country the data source knows.
    All,
    Only(&'a [String]),
}

/// Canonical data request record.
///
/// Wire names follow the data endpoint (`startDate`, `endDate`, `matrix`,
/// `aggregationFunc`, `countries`); dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ScopeRequestWire")]
pub struct ScopeRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(rename = "matrix", alias = "metric")]
    pub metric: Metric,
    #[serde(default, rename = "aggregationFunc")]
    pub aggregation: AggregationFunc,
    #[serde(default)]
    pub countries: Vec<String>,
}

/// Inbound request body before the date bounds are checked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScopeRequestWire {
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(rename = "matrix", alias = "metric")]
    metric: Metric,
    #[serde(default, rename = "aggregationFunc")]
    aggregation: AggregationFunc,
    #[serde(default)]
    countries: Vec<String>,
}

impl TryFrom<ScopeRequestWire> for ScopeRequest {
    type Error = ScopeError;

    fn try_from(wire: ScopeRequestWire) -> ScopeResult<Self> {
        let start_date = wire
            .start_date
            .ok_or(ScopeError::MissingParameter("startDate"))?;
        let end_date = wire.end_date.ok_or(ScopeError::MissingParameter("endDate"))?;
        Self {
            start_date,
            end_date,
            metric: wire.metric,
            aggregation: wire.aggregation,
            countries: wire.countries,
        }
        .into_normalized()
    }
}

impl ScopeRequest {
    /// Creates a validated request covering all countries.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, metric: Metric) -> ScopeResult<Self> {
        let request = Self {
            start_date,
            end_date,
            metric,
            aggregation: AggregationFunc::default(),
            countries: Vec::new(),
        };
        request.validate()?;
        Ok(request)
    }

    #[must_use]
    pub fn with_aggregation(mut self, aggregation: AggregationFunc) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Replaces the country list; codes are trimmed, upper-cased and
    /// deduplicated keeping first occurrence.
    #[must_use]
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.countries = normalize_country_codes(countries);
        self
    }

    pub fn validate(&self) -> ScopeResult<()> {
        if self.start_date > self.end_date {
            return Err(ScopeError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.countries.iter().any(|code| code.trim().is_empty()) {
            return Err(ScopeError::InvalidRequest(
                "country codes must not be blank".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn country_selection(&self) -> CountrySelection<'_> {
        if self.countries.is_empty() {
            CountrySelection::All
        } else {
            CountrySelection::Only(&self.countries)
        }
    }

    /// Parses the wire body, normalizes country codes and validates.
    pub fn from_json_str(input: &str) -> ScopeResult<Self> {
        let wire: ScopeRequestWire = serde_json::from_str(input).map_err(|e| {
            ScopeError::InvalidRequest(format!("failed to parse request json: {e}"))
        })?;
        Self::try_from(wire)
    }

    pub fn to_json(&self) -> ScopeResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ScopeError::InvalidData(format!("failed to serialize request json: {e}"))
        })
    }

    fn into_normalized(mut self) -> ScopeResult<Self> {
        let countries = std::mem::take(&mut self.countries);
        self.countries = normalize_country_codes(countries);
        self.validate()?;
        Ok(self)
    }
}

pub(crate) fn normalize_country_codes<I, S>(countries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for code in countries {
        let code = normalize_entity_code(code.as_ref());
        if code.is_empty() || normalized.contains(&code) {
            continue;
        }
        normalized.push(code);
    }
    normalized
}
