//! The mock prediction models.
//!
//! Each [`ModelVariant`] is a fixed linear formula over the input features plus random noise.
//! "Training" just draws a set of plausible metrics, and the noise on predictions shrinks as more
//! predictions are requested, which is what passes for learning here.
use crate::dataset::{
    BASE_INCOME, BASE_POPULATION, BASE_RAINFALL, BASE_RECYCLING, BASE_TEMPERATURE, BASE_TRUCKS,
    BASE_URBAN_AREA, Feature, Observation,
};
use crate::rng::{draw_between, draw_unit};
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, indexmap};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Factor applied to training metrics for every prediction made so far
pub const IMPROVEMENT_RATE: f64 = 0.95;

/// Fraction of the prediction noise removed for every prediction made so far
const NOISE_DECAY_PER_PREDICTION: f64 = 0.005;

/// Bounds applied to predicted waste
const PREDICTION_BOUNDS: (u32, u32) = (600, 1000);

/// Error of an untrained model, used as the reference for [`PredictionEngine::improvement`]
const INITIAL_ERROR: f64 = 35.0;

/// Error of a freshly trained model, before any predictions have been made
const TRAINED_ERROR: f64 = 25.0;

/// Month predicted when none is given
const DEFAULT_MONTH: u32 = 1;

/// Year predicted when none is given
const DEFAULT_YEAR: u32 = 2024;

/// One of the three mock prediction models
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    /// Behaves like a random forest: low error
    RandomForest,
    /// Behaves like linear regression: highest error
    LinearRegression,
    /// Behaves like gradient-boosted trees: lowest error
    GradientBoosted,
}

/// Range from which a metric is drawn before scaling
type MetricRange = (f64, f64);

/// The fixed parameters of a model variant
#[derive(Debug, PartialEq)]
pub struct VariantParameters {
    /// Human-readable name
    pub display_name: &'static str,
    /// Predicted waste when every input is at its baseline
    pub baseline_waste: f64,
    /// Coefficient for population deviation
    pub population: f64,
    /// Coefficient for income deviation
    pub income: f64,
    /// Coefficient for rainfall deviation
    pub rainfall: f64,
    /// Coefficient for temperature deviation
    pub temperature: f64,
    /// Coefficient for truck count deviation
    pub trucks: f64,
    /// Coefficient for recycling rate deviation
    pub recycling: f64,
    /// Half-width of the noise added to predictions, before decay
    pub noise: f64,
    /// Range of RMSE on training
    pub rmse: MetricRange,
    /// Range of MAE on training
    pub mae: MetricRange,
    /// Range of MAPE on training
    pub mape: MetricRange,
}

const RANDOM_FOREST: VariantParameters = VariantParameters {
    display_name: "Random Forest",
    baseline_waste: 785.0,
    population: 0.025,
    income: 0.00015,
    rainfall: -0.12,
    temperature: 2.5,
    trucks: 0.3,
    recycling: -1.2,
    noise: 15.0,
    rmse: (25.0, 35.0),
    mae: (20.0, 28.0),
    mape: (3.2, 4.0),
};

const LINEAR_REGRESSION: VariantParameters = VariantParameters {
    display_name: "Linear Regression",
    baseline_waste: 750.0,
    population: 0.03,
    income: 0.0002,
    rainfall: -0.15,
    temperature: 3.0,
    trucks: 0.4,
    recycling: -1.5,
    noise: 20.0,
    rmse: (35.0, 50.0),
    mae: (28.0, 40.0),
    mape: (4.5, 6.0),
};

const GRADIENT_BOOSTED: VariantParameters = VariantParameters {
    display_name: "XGBoost",
    baseline_waste: 790.0,
    population: 0.022,
    income: 0.00012,
    rainfall: -0.11,
    temperature: 2.2,
    trucks: 0.25,
    recycling: -1.1,
    noise: 12.5,
    rmse: (22.0, 30.0),
    mae: (18.0, 25.0),
    mape: (2.8, 3.5),
};

impl ModelVariant {
    /// The fixed parameters for this variant
    pub fn parameters(self) -> &'static VariantParameters {
        match self {
            Self::RandomForest => &RANDOM_FOREST,
            Self::LinearRegression => &LINEAR_REGRESSION,
            Self::GradientBoosted => &GRADIENT_BOOSTED,
        }
    }

    /// Evaluate the variant's formula for the given inputs.
    ///
    /// `noise_factor` scales the noise term and should be in `[0, 1]`.
    fn evaluate<R: Rng + ?Sized>(
        self,
        inputs: &PredictionInputs,
        noise_factor: f64,
        rng: &mut R,
    ) -> u32 {
        let params = self.parameters();
        let mut waste = params.baseline_waste;
        waste += (inputs.population - BASE_POPULATION) * params.population;
        waste += (inputs.income - BASE_INCOME) * params.income;
        waste += (inputs.rainfall - BASE_RAINFALL) * params.rainfall;
        waste += (inputs.temperature - BASE_TEMPERATURE) * params.temperature;
        waste += (inputs.trucks - BASE_TRUCKS) * params.trucks;
        waste += (inputs.recycling - BASE_RECYCLING) * params.recycling;
        waste += (draw_unit(rng) * 2.0 * params.noise - params.noise) * noise_factor;

        let (low, high) = PREDICTION_BOUNDS;
        (waste.round().max(0.0) as u32).clamp(low, high)
    }
}

/// Accuracy band for a trained model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AccuracyBand {
    /// Accuracy above 95%
    High,
    /// Accuracy above 90%
    Medium,
    /// Anything else
    Low,
}

/// Simulated error metrics for a trained model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::Display)]
#[display("RMSE {rmse:.2} tons, MAE {mae:.2} tons, MAPE {mape:.2}%")]
pub struct Metrics {
    /// Root mean squared error (tons)
    pub rmse: f64,
    /// Mean absolute error (tons)
    pub mae: f64,
    /// Mean absolute percentage error
    pub mape: f64,
}

impl Metrics {
    /// Percentage accuracy implied by the MAPE, floored at zero
    pub fn accuracy(&self) -> f64 {
        (100.0 - self.mape).max(0.0)
    }

    /// The band into which [`Metrics::accuracy`] falls
    pub fn accuracy_band(&self) -> AccuracyBand {
        let accuracy = self.accuracy();
        if accuracy > 95.0 {
            AccuracyBand::High
        } else if accuracy > 90.0 {
            AccuracyBand::Medium
        } else {
            AccuracyBand::Low
        }
    }
}

/// The input features for a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInputs {
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
    pub trucks: f64,
    /// Recycling rate (%)
    pub recycling: f64,
    /// Month being predicted (1-12)
    pub month: u32,
    /// Year being predicted
    pub year: u32,
}

impl Default for PredictionInputs {
    fn default() -> Self {
        Self {
            population: BASE_POPULATION,
            income: BASE_INCOME,
            urban_area: BASE_URBAN_AREA,
            rainfall: BASE_RAINFALL,
            temperature: BASE_TEMPERATURE,
            trucks: BASE_TRUCKS,
            recycling: BASE_RECYCLING,
            month: DEFAULT_MONTH,
            year: DEFAULT_YEAR,
        }
    }
}

impl From<&Observation> for PredictionInputs {
    fn from(obs: &Observation) -> Self {
        Self {
            population: obs.population,
            income: obs.income,
            urban_area: obs.urban_area,
            rainfall: obs.rainfall,
            temperature: obs.temperature,
            trucks: obs.truck_count as f64,
            recycling: obs.recycling_rate,
            month: obs.month,
            year: obs.year,
        }
    }
}

/// A record of a single prediction request
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    /// The inputs which were supplied
    pub inputs: PredictionInputs,
    /// When the request was made
    pub timestamp: DateTime<Utc>,
}

/// Predicted waste for each trained variant
pub type Predictions = IndexMap<ModelVariant, u32>;

/// Predicted waste series for each trained variant, one value per observation
pub type BulkPredictions = IndexMap<ModelVariant, Vec<u32>>;

/// Holds the training state of every variant and the history of prediction requests
#[derive(Debug, Clone, Default)]
pub struct PredictionEngine {
    /// Metrics for each variant, which are only present once it has been trained
    metrics: IndexMap<ModelVariant, Metrics>,
    /// Every prediction request made so far
    history: Vec<PredictionRecord>,
}

/// Factor by which training metrics are scaled after `count` predictions
fn improvement_factor(count: usize) -> f64 {
    IMPROVEMENT_RATE.powf(count as f64)
}

/// Factor by which prediction noise is scaled after `count` predictions.
///
/// This reaches zero after 200 predictions and is held there.
fn noise_factor(count: usize) -> f64 {
    (1.0 - count as f64 * NOISE_DECAY_PER_PREDICTION).max(0.0)
}

impl PredictionEngine {
    /// Create an engine with no trained variants and an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Train the given variant, returning its new metrics.
    ///
    /// Metrics are drawn from the variant's ranges and scaled by [`IMPROVEMENT_RATE`] for every
    /// prediction made so far. Any previous metrics are replaced.
    pub fn train<R: Rng + ?Sized>(&mut self, variant: ModelVariant, rng: &mut R) -> Metrics {
        let params = variant.parameters();
        let factor = improvement_factor(self.history.len());
        let mut draw = |(low, high): MetricRange| draw_between(rng, low, high) * factor;
        let metrics = Metrics {
            rmse: draw(params.rmse),
            mae: draw(params.mae),
            mape: draw(params.mape),
        };

        debug!("Trained {variant}: {metrics}");
        self.metrics.insert(variant, metrics);
        self.metrics.sort_keys();

        metrics
    }

    /// Whether the given variant has been trained
    pub fn is_trained(&self, variant: ModelVariant) -> bool {
        self.metrics.contains_key(&variant)
    }

    /// The trained variants, in [`ModelVariant`] order
    pub fn trained_variants(&self) -> Vec<ModelVariant> {
        self.metrics.keys().copied().collect()
    }

    /// The metrics from the most recent training of the variant, if it has been trained
    pub fn metrics(&self, variant: ModelVariant) -> Option<&Metrics> {
        self.metrics.get(&variant)
    }

    /// Record a prediction request, returning the noise factor to use for it
    fn record(&mut self, inputs: &PredictionInputs, timestamp: DateTime<Utc>) -> f64 {
        self.history.push(PredictionRecord {
            inputs: inputs.clone(),
            timestamp,
        });

        noise_factor(self.history.len())
    }

    /// Predict waste with every trained variant.
    ///
    /// One entry is added to the prediction history however many variants are trained, including
    /// none.
    pub fn predict<R: Rng + ?Sized>(
        &mut self,
        inputs: &PredictionInputs,
        timestamp: DateTime<Utc>,
        rng: &mut R,
    ) -> Predictions {
        let noise_factor = self.record(inputs, timestamp);
        let predictions: Predictions = self
            .trained_variants()
            .into_iter()
            .map(|variant| (variant, variant.evaluate(inputs, noise_factor, rng)))
            .collect();
        debug!("Prediction #{}: {predictions:?}", self.history.len());

        predictions
    }

    /// Predict waste with a single variant.
    ///
    /// The request is added to the prediction history whether or not the variant is trained.
    ///
    /// # Returns
    ///
    /// The predicted waste or `None` if the variant has not been trained.
    pub fn predict_variant<R: Rng + ?Sized>(
        &mut self,
        variant: ModelVariant,
        inputs: &PredictionInputs,
        timestamp: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<u32> {
        let noise_factor = self.record(inputs, timestamp);
        self.is_trained(variant)
            .then(|| variant.evaluate(inputs, noise_factor, rng))
    }

    /// Predict waste for every observation with every trained variant.
    ///
    /// Unlike [`PredictionEngine::predict`], this does not add to the prediction history.
    pub fn generate_predictions<R: Rng + ?Sized>(
        &self,
        observations: &[Observation],
        rng: &mut R,
    ) -> BulkPredictions {
        let noise_factor = noise_factor(self.history.len());
        let variants = self.trained_variants();
        let mut predictions: BulkPredictions = variants
            .iter()
            .map(|variant| (*variant, Vec::with_capacity(observations.len())))
            .collect();

        for obs in observations {
            let inputs = PredictionInputs::from(obs);
            for variant in &variants {
                let value = variant.evaluate(&inputs, noise_factor, rng);
                predictions[variant].push(value);
            }
        }

        predictions
    }

    /// Every prediction request made so far, oldest first
    pub fn prediction_history(&self) -> &[PredictionRecord] {
        &self.history
    }

    /// The number of prediction requests made so far
    pub fn prediction_count(&self) -> usize {
        self.history.len()
    }

    /// Percentage reduction in error relative to an untrained model.
    ///
    /// Zero until the first prediction has been made.
    pub fn improvement(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }

        let current = TRAINED_ERROR * improvement_factor(self.history.len());
        (INITIAL_ERROR - current) / INITIAL_ERROR * 100.0
    }
}

/// The relative importance of each feature.
///
/// These are fixed values rather than anything derived from the models.
pub fn feature_importance() -> IndexMap<Feature, f64> {
    indexmap! {
        Feature::Population => 0.85,
        Feature::Income => 0.72,
        Feature::Rainfall => 0.65,
        Feature::Temperature => 0.58,
        Feature::TruckCount => 0.42,
        Feature::RecyclingRate => 0.35,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::generate_dataset;
    use crate::fixture::{prediction_inputs, seeded_rng, trained_engine};
    use float_cmp::assert_approx_eq;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    fn assert_in_range(value: f64, (low, high): MetricRange, factor: f64) {
        assert!(
            (low * factor..=high * factor).contains(&value),
            "{value} not in [{}, {}]",
            low * factor,
            high * factor
        );
    }

    #[rstest]
    #[case(ModelVariant::RandomForest)]
    #[case(ModelVariant::LinearRegression)]
    #[case(ModelVariant::GradientBoosted)]
    fn test_train_untrained_to_trained(mut seeded_rng: ChaCha8Rng, #[case] variant: ModelVariant) {
        let mut engine = PredictionEngine::new();
        assert!(!engine.is_trained(variant));
        assert!(engine.metrics(variant).is_none());

        let metrics = engine.train(variant, &mut seeded_rng);
        assert!(engine.is_trained(variant));
        assert_eq!(engine.metrics(variant), Some(&metrics));
        assert_eq!(engine.trained_variants(), vec![variant]);

        let params = variant.parameters();
        assert_in_range(metrics.rmse, params.rmse, 1.0);
        assert_in_range(metrics.mae, params.mae, 1.0);
        assert_in_range(metrics.mape, params.mape, 1.0);
    }

    #[rstest]
    fn test_train_improves_with_prediction_count(
        mut seeded_rng: ChaCha8Rng,
        prediction_inputs: PredictionInputs,
    ) {
        let mut engine = PredictionEngine::new();
        let variant = ModelVariant::LinearRegression;
        let params = variant.parameters();
        engine.train(variant, &mut seeded_rng);

        for _ in 0..10 {
            engine.predict(&prediction_inputs, Utc::now(), &mut seeded_rng);
        }

        // Ranges scale down with prediction count, so even the worst case beats the base range
        let factor = improvement_factor(10);
        let metrics = engine.train(variant, &mut seeded_rng);
        assert_in_range(metrics.rmse, params.rmse, factor);
        assert_in_range(metrics.mae, params.mae, factor);
        assert_in_range(metrics.mape, params.mape, factor);
        assert!(params.rmse.1 * factor < params.rmse.0);
    }

    #[rstest]
    fn test_train_is_not_affected_by_training_count(mut seeded_rng: ChaCha8Rng) {
        let mut engine = PredictionEngine::new();
        let params = ModelVariant::RandomForest.parameters();
        for _ in 0..5 {
            let metrics = engine.train(ModelVariant::RandomForest, &mut seeded_rng);
            assert_in_range(metrics.rmse, params.rmse, 1.0);
        }
    }

    #[test]
    fn test_train_same_seed_same_metrics() {
        let mut engine1 = PredictionEngine::new();
        let mut engine2 = PredictionEngine::new();
        let mut rng1 = crate::rng::new_rng(Some(3));
        let mut rng2 = crate::rng::new_rng(Some(3));
        assert_eq!(
            engine1.train(ModelVariant::GradientBoosted, &mut rng1),
            engine2.train(ModelVariant::GradientBoosted, &mut rng2)
        );
    }

    #[rstest]
    fn test_predict_variant_untrained(
        mut seeded_rng: ChaCha8Rng,
        prediction_inputs: PredictionInputs,
    ) {
        let mut engine = PredictionEngine::new();
        assert_eq!(
            engine.predict_variant(
                ModelVariant::RandomForest,
                &prediction_inputs,
                Utc::now(),
                &mut seeded_rng
            ),
            None
        );

        // The request is still recorded
        assert_eq!(engine.prediction_count(), 1);
    }

    #[rstest]
    fn test_predict_variant_trained(
        mut seeded_rng: ChaCha8Rng,
        prediction_inputs: PredictionInputs,
    ) {
        let mut engine = PredictionEngine::new();
        engine.train(ModelVariant::RandomForest, &mut seeded_rng);
        let waste = engine
            .predict_variant(
                ModelVariant::RandomForest,
                &prediction_inputs,
                Utc::now(),
                &mut seeded_rng,
            )
            .unwrap();

        // Default inputs give the baseline plus at most 15 tons of noise
        assert!((770..=800).contains(&waste));
    }

    #[rstest]
    fn test_predict_only_trained_variants(
        mut seeded_rng: ChaCha8Rng,
        prediction_inputs: PredictionInputs,
    ) {
        let mut engine = PredictionEngine::new();
        assert!(
            engine
                .predict(&prediction_inputs, Utc::now(), &mut seeded_rng)
                .is_empty()
        );

        engine.train(ModelVariant::GradientBoosted, &mut seeded_rng);
        engine.train(ModelVariant::RandomForest, &mut seeded_rng);
        let predictions = engine.predict(&prediction_inputs, Utc::now(), &mut seeded_rng);
        assert_eq!(
            predictions.keys().copied().collect::<Vec<_>>(),
            vec![ModelVariant::RandomForest, ModelVariant::GradientBoosted]
        );
        assert_eq!(engine.prediction_count(), 2);
    }

    #[rstest]
    fn test_predict_records_history(
        mut trained_engine: PredictionEngine,
        mut seeded_rng: ChaCha8Rng,
        prediction_inputs: PredictionInputs,
    ) {
        let timestamp = Utc::now();
        engine_predict_n(&mut trained_engine, &prediction_inputs, 3, &mut seeded_rng);
        trained_engine.predict(&prediction_inputs, timestamp, &mut seeded_rng);

        let history = trained_engine.prediction_history();
        assert_eq!(history.len(), 4);
        assert_eq!(history.last().unwrap().timestamp, timestamp);
        assert_eq!(history.last().unwrap().inputs, prediction_inputs);
    }

    fn engine_predict_n(
        engine: &mut PredictionEngine,
        inputs: &PredictionInputs,
        n: usize,
        rng: &mut ChaCha8Rng,
    ) {
        for _ in 0..n {
            engine.predict(inputs, Utc::now(), rng);
        }
    }

    #[rstest]
    #[case(PredictionInputs { population: 1e9, ..Default::default() }, 1000)]
    #[case(PredictionInputs { rainfall: 1e9, ..Default::default() }, 600)]
    fn test_predict_clamped(
        mut trained_engine: PredictionEngine,
        mut seeded_rng: ChaCha8Rng,
        #[case] inputs: PredictionInputs,
        #[case] expected: u32,
    ) {
        let predictions = trained_engine.predict(&inputs, Utc::now(), &mut seeded_rng);
        assert_eq!(predictions.len(), 3);
        assert!(predictions.values().all(|waste| *waste == expected));
    }

    #[rstest]
    fn test_predict_noise_vanishes(
        mut trained_engine: PredictionEngine,
        mut seeded_rng: ChaCha8Rng,
        prediction_inputs: PredictionInputs,
    ) {
        engine_predict_n(&mut trained_engine, &prediction_inputs, 250, &mut seeded_rng);

        // With no noise left, the default inputs give each variant's baseline exactly
        let predictions = trained_engine.predict(&prediction_inputs, Utc::now(), &mut seeded_rng);
        assert_eq!(
            predictions,
            indexmap! {
                ModelVariant::RandomForest => 785,
                ModelVariant::LinearRegression => 750,
                ModelVariant::GradientBoosted => 790,
            }
        );
    }

    #[rstest]
    #[case(0, 1.0)]
    #[case(100, 0.5)]
    #[case(200, 0.0)]
    #[case(1000, 0.0)]
    fn test_noise_factor(#[case] count: usize, #[case] expected: f64) {
        assert_approx_eq!(f64, noise_factor(count), expected, epsilon = 1e-12);
    }

    #[rstest]
    fn test_generate_predictions_does_not_record(
        trained_engine: PredictionEngine,
        mut seeded_rng: ChaCha8Rng,
    ) {
        let dataset = generate_dataset(24, &mut seeded_rng);
        let predictions = trained_engine.generate_predictions(dataset.as_slice(), &mut seeded_rng);

        assert_eq!(predictions.len(), 3);
        for series in predictions.values() {
            assert_eq!(series.len(), 24);
            assert!(series.iter().all(|waste| (600..=1000).contains(waste)));
        }
        assert_eq!(trained_engine.prediction_count(), 0);
    }

    #[rstest]
    fn test_generate_predictions_untrained(mut seeded_rng: ChaCha8Rng) {
        let dataset = generate_dataset(5, &mut seeded_rng);
        let engine = PredictionEngine::new();
        assert!(
            engine
                .generate_predictions(dataset.as_slice(), &mut seeded_rng)
                .is_empty()
        );
    }

    #[rstest]
    fn test_improvement(
        mut trained_engine: PredictionEngine,
        mut seeded_rng: ChaCha8Rng,
        prediction_inputs: PredictionInputs,
    ) {
        assert_eq!(trained_engine.improvement(), 0.0);
        trained_engine.predict(&prediction_inputs, Utc::now(), &mut seeded_rng);
        let expected = (35.0 - 25.0 * 0.95) / 35.0 * 100.0;
        assert_approx_eq!(f64, trained_engine.improvement(), expected, epsilon = 1e-9);
    }

    #[rstest]
    #[case(3.2, 96.8, AccuracyBand::High)]
    #[case(5.5, 94.5, AccuracyBand::Medium)]
    #[case(12.0, 88.0, AccuracyBand::Low)]
    #[case(150.0, 0.0, AccuracyBand::Low)]
    fn test_accuracy(#[case] mape: f64, #[case] accuracy: f64, #[case] band: AccuracyBand) {
        let metrics = Metrics {
            rmse: 0.0,
            mae: 0.0,
            mape,
        };
        assert_approx_eq!(f64, metrics.accuracy(), accuracy, epsilon = 1e-9);
        assert_eq!(metrics.accuracy_band(), band);
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(ModelVariant::GradientBoosted.to_string(), "gradient-boosted");
        assert_eq!("random-forest".parse(), Ok(ModelVariant::RandomForest));
        assert_eq!(ModelVariant::GradientBoosted.parameters().display_name, "XGBoost");
    }

    #[test]
    fn test_feature_importance_covers_features() {
        let importance = feature_importance();
        assert!(Feature::iter().all(|feature| importance.contains_key(&feature)));
    }

    #[test]
    fn test_metrics_display() {
        let metrics = Metrics {
            rmse: 25.123,
            mae: 20.0,
            mape: 3.456,
        };
        assert_eq!(
            metrics.to_string(),
            "RMSE 25.12 tons, MAE 20.00 tons, MAPE 3.46%"
        );
    }
}
