use serde::{Deserialize, Serialize};

/// Numeric fields a chart can plot, brush, or color by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Gdp,
    LifeExpectancy,
    Population,
}

impl Attribute {
    /// All attributes in display order.
    pub const ALL: [Attribute; 3] = [
        Attribute::Gdp,
        Attribute::LifeExpectancy,
        Attribute::Population,
    ];

    /// Short human label, e.g. for dropdowns and legends.
    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Gdp => "GDP per capita",
            Attribute::LifeExpectancy => "Life expectancy",
            Attribute::Population => "Population",
        }
    }

    /// Axis caption including the unit.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Attribute::Gdp => "GDP per Capita (USD)",
            Attribute::LifeExpectancy => "Life Expectancy (Years)",
            Attribute::Population => "Population",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw CSV row as it appears in the merged health/wealth file.
///
/// The upstream export renames columns when merging, so `country` may arrive
/// as `country_x`. Numeric fields are optional: empty cells deserialize to
/// `None` and the row is dropped during coercion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(alias = "country_x", alias = "entity", alias = "Entity")]
    pub country: Option<String>,
    #[serde(alias = "Code")]
    pub code: Option<String>,
    #[serde(alias = "Year")]
    pub year: Option<i32>,
    pub gdp: Option<f64>,
    pub life_expectancy: Option<f64>,
}

impl RawRow {
    /// Coerce into a typed [`Record`], or `None` when a required field is
    /// missing or out of range. Missing values never raise errors here; the
    /// loader counts and skips them.
    pub fn into_record(self) -> Option<Record> {
        let code = self.code?.trim().to_string();
        if code.is_empty() {
            return None;
        }
        let country = self.country.unwrap_or_else(|| code.clone());
        let year = self.year?;
        let gdp = self.gdp.filter(|v| v.is_finite() && *v >= 0.0)?;
        let life_expectancy = self.life_expectancy.filter(|v| v.is_finite() && *v > 0.0)?;
        Some(Record {
            country,
            code,
            year,
            gdp,
            life_expectancy,
            population: None,
        })
    }
}

/// Raw row of the per-country/year population file.
#[derive(Debug, Clone, Deserialize)]
pub struct PopulationRow {
    #[serde(alias = "Code")]
    pub code: Option<String>,
    #[serde(alias = "Year")]
    pub year: Option<i32>,
    #[serde(alias = "Population")]
    pub population: Option<u64>,
}

/// Tidy structure used by this crate (one row = one country/year observation).
///
/// Immutable after load. `population` stays `None` when the population file
/// has no matching row; a missing population is treated as "does not match"
/// by any population brush, never as a wildcard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub country: String,
    /// ISO3 country code; the key linking charts, map features, and brushes.
    pub code: String,
    pub year: i32,
    pub gdp: f64,
    pub life_expectancy: f64,
    pub population: Option<u64>,
}

impl Record {
    /// Value of the given attribute, if present.
    pub fn value(&self, attr: Attribute) -> Option<f64> {
        match attr {
            Attribute::Gdp => Some(self.gdp),
            Attribute::LifeExpectancy => Some(self.life_expectancy),
            Attribute::Population => self.population.map(|p| p as f64),
        }
    }
}
