//! Code for generating and holding the synthetic monthly waste dataset.
use crate::calendar::MonthYear;
use crate::rng::draw_unit;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::slice;
use strum::{Display, EnumIter, EnumString};

/// Baseline population density (people/km²)
pub const BASE_POPULATION: f64 = 8500.0;
/// Baseline household income
pub const BASE_INCOME: f64 = 25000.0;
/// Baseline urban area (km²)
pub const BASE_URBAN_AREA: f64 = 280.0;
/// Baseline monthly rainfall (mm)
pub const BASE_RAINFALL: f64 = 150.0;
/// Baseline temperature (°C)
pub const BASE_TEMPERATURE: f64 = 28.0;
/// Baseline number of collection trucks
pub const BASE_TRUCKS: f64 = 45.0;
/// Baseline recycling rate (%)
pub const BASE_RECYCLING: f64 = 18.0;
/// Baseline waste generated (tons)
const BASE_WASTE: f64 = 785.0;

/// Bounds applied to generated waste values
const WASTE_BOUNDS: (f64, f64) = (620.0, 950.0);
/// Bounds applied to generated truck counts
const TRUCK_BOUNDS: (u32, u32) = (30, 80);
/// Bounds applied to generated recycling rates
const RECYCLING_BOUNDS: (f64, f64) = (10.0, 35.0);

/// An input feature which is correlated against waste
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Population density
    Population,
    /// Household income
    Income,
    /// Monthly rainfall
    Rainfall,
    /// Mean temperature
    Temperature,
    /// Number of collection trucks
    TruckCount,
    /// Recycling rate
    RecyclingRate,
}

/// Everything recorded for one month, apart from its ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationFields {
    /// Month (1-12)
    pub month: u32,
    /// Year
    pub year: u32,
    /// Population density (people/km²)
    pub population: f64,
    /// Household income
    pub income: f64,
    /// Urban area (km²)
    pub urban_area: f64,
    /// Monthly rainfall (mm)
    pub rainfall: f64,
    /// Mean temperature (°C)
    pub temperature: f64,
    /// Number of collection trucks
    pub truck_count: u32,
    /// Recycling rate (%)
    pub recycling_rate: f64,
    /// Waste generated (tons)
    pub waste: f64,
}

/// One monthly record in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// 1-based position in the dataset
    pub id: u32,
    /// Month (1-12)
    pub month: u32,
    /// Year
    pub year: u32,
    /// Population density (people/km²)
    pub population: f64,
    /// Household income
    pub income: f64,
    /// Urban area (km²)
    pub urban_area: f64,
    /// Monthly rainfall (mm)
    pub rainfall: f64,
    /// Mean temperature (°C)
    pub temperature: f64,
    /// Number of collection trucks
    pub truck_count: u32,
    /// Recycling rate (%)
    pub recycling_rate: f64,
    /// Waste generated (tons)
    pub waste: f64,
}

impl Observation {
    /// Create an observation from its fields and ID
    pub fn new(id: u32, fields: ObservationFields) -> Self {
        let ObservationFields {
            month,
            year,
            population,
            income,
            urban_area,
            rainfall,
            temperature,
            truck_count,
            recycling_rate,
            waste,
        } = fields;

        Self {
            id,
            month,
            year,
            population,
            income,
            urban_area,
            rainfall,
            temperature,
            truck_count,
            recycling_rate,
            waste,
        }
    }

    /// The value of the given feature for this observation
    pub fn feature_value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Population => self.population,
            Feature::Income => self.income,
            Feature::Rainfall => self.rainfall,
            Feature::Temperature => self.temperature,
            Feature::TruckCount => self.truck_count as f64,
            Feature::RecyclingRate => self.recycling_rate,
        }
    }

    /// The month and year of this observation
    pub fn month_year(&self) -> MonthYear {
        MonthYear {
            year: self.year,
            month: self.month,
        }
    }
}

/// An append-only, ordered collection of observations.
///
/// IDs always match the 1-based position of each observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset(Vec<Observation>);

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new observation, assigning it the next ID.
    ///
    /// Field values are not range-checked.
    pub fn append(&mut self, fields: ObservationFields) -> &Observation {
        let index = self.0.len();
        let id = u32::try_from(index + 1).expect("Dataset exceeds u32::MAX observations");
        self.0.push(Observation::new(id, fields));
        &self.0[index]
    }

    /// Get the first `limit` observations, or all of them if `limit` is `None`.
    ///
    /// `Some(0)` gives an empty slice rather than the whole dataset.
    pub fn get(&self, limit: Option<usize>) -> &[Observation] {
        match limit {
            Some(limit) => &self.0[..limit.min(self.0.len())],
            None => &self.0,
        }
    }

    /// The most recently added observation
    pub fn latest(&self) -> Option<&Observation> {
        self.0.last()
    }

    /// The number of observations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no observations
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the observations in insertion order
    pub fn iter(&self) -> slice::Iter<'_, Observation> {
        self.0.iter()
    }

    /// All observations as a slice
    pub fn as_slice(&self) -> &[Observation] {
        &self.0
    }

    /// The values of a feature across every observation, in insertion order
    pub fn feature_values(&self, feature: Feature) -> Vec<f64> {
        self.iter().map(|obs| obs.feature_value(feature)).collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Observation;
    type IntoIter = slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Round to one decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Draw the fields for a single month
fn generate_fields<R: Rng + ?Sized>(rng: &mut R, month_year: MonthYear) -> ObservationFields {
    let dry = month_year.is_dry_season();

    let population = BASE_POPULATION + draw_unit(rng) * 2000.0 - 1000.0;
    let income = BASE_INCOME + draw_unit(rng) * 10000.0 - 5000.0;
    let rainfall = if dry {
        50.0 + draw_unit(rng) * 100.0
    } else {
        150.0 + draw_unit(rng) * 200.0
    };
    let temperature = if dry {
        30.0 + draw_unit(rng) * 3.0
    } else {
        27.0 + draw_unit(rng) * 2.0
    };
    let trucks = BASE_TRUCKS + (draw_unit(rng) * 10.0).floor() - 5.0;
    let recycling = BASE_RECYCLING + draw_unit(rng) * 10.0 - 5.0;

    let mut waste = BASE_WASTE;
    waste += (population - BASE_POPULATION) * 0.02;
    waste += (income - BASE_INCOME) * 0.0001;
    waste -= (rainfall - BASE_RAINFALL) * 0.1;
    waste += (temperature - BASE_TEMPERATURE) * 2.0;
    waste += draw_unit(rng) * 50.0 - 25.0;
    let waste = waste.clamp(WASTE_BOUNDS.0, WASTE_BOUNDS.1);

    let urban_area = BASE_URBAN_AREA + draw_unit(rng) * 40.0 - 20.0;

    ObservationFields {
        month: month_year.month,
        year: month_year.year,
        population: population.round(),
        income: income.round(),
        urban_area: urban_area.round(),
        rainfall: rainfall.round(),
        temperature: round1(temperature),
        truck_count: (trucks as u32).clamp(TRUCK_BOUNDS.0, TRUCK_BOUNDS.1),
        recycling_rate: round1(recycling).clamp(RECYCLING_BOUNDS.0, RECYCLING_BOUNDS.1),
        waste: waste.round(),
    }
}

/// Generate `count` consecutive monthly observations, starting in January 2013.
///
/// # Arguments
///
/// * `count` - The number of observations to generate
/// * `rng` - The random source for feature values and noise
pub fn generate_dataset<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Dataset {
    let mut dataset = Dataset::new();
    for month_year in MonthYear::START.iter_from().take(count) {
        dataset.append(generate_fields(rng, month_year));
    }

    if let (Some(first), Some(last)) = (dataset.get(None).first(), dataset.latest()) {
        debug!(
            "Generated {} observations ({} to {})",
            dataset.len(),
            first.month_year(),
            last.month_year()
        );
    }

    dataset
}
