//! The session, which owns all state for a single run of the tool.
use crate::dataset::{Dataset, Feature, Observation, ObservationFields, generate_dataset};
use crate::model::{
    BulkPredictions, Metrics, ModelVariant, PredictionEngine, PredictionInputs, PredictionRecord,
    Predictions, feature_importance,
};
use crate::rng::new_rng;
use crate::stats::{CorrelationTable, Statistics, compute_correlation_table, compute_statistics};
use crate::training::{TrainingPlan, TrainingStatus, TrainingTask};
use anyhow::{Result, ensure};
use chrono::Utc;
use indexmap::IndexMap;
use log::{debug, info};
use rand_chacha::ChaCha8Rng;

/// The default number of observations to generate
pub const DEFAULT_DATASET_SIZE: usize = 144;

/// Options for creating a [`Session`]
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// The number of observations to generate
    pub dataset_size: usize,
    /// Seed for the random number generator. If `None`, a random seed is used.
    pub seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dataset_size: DEFAULT_DATASET_SIZE,
            seed: None,
        }
    }
}

/// All the state for a run: the dataset, its statistics and the prediction models.
///
/// Statistics and correlations are kept in step with the dataset: every operation which changes
/// the dataset recomputes them before returning.
#[derive(Debug)]
pub struct Session {
    dataset: Dataset,
    statistics: Statistics,
    correlations: CorrelationTable,
    engine: PredictionEngine,
    rng: ChaCha8Rng,
}

impl Session {
    /// Start a new session, generating a fresh dataset.
    ///
    /// # Returns
    ///
    /// The new session or an error if `dataset_size` is zero.
    pub fn new(options: &SessionOptions) -> Result<Self> {
        ensure!(options.dataset_size > 0, "Dataset size must be greater than zero");

        let mut rng = new_rng(options.seed);
        let dataset = generate_dataset(options.dataset_size, &mut rng);
        let statistics = compute_statistics(dataset.as_slice())?;
        let correlations = compute_correlation_table(dataset.as_slice())?;
        info!(
            "Generated {} observations covering {}-{}",
            statistics.total_records, statistics.start_year, statistics.end_year
        );

        Ok(Self {
            dataset,
            statistics,
            correlations,
            engine: PredictionEngine::new(),
            rng,
        })
    }

    /// Recompute statistics and correlations after the dataset has changed
    fn refresh_statistics(&mut self) -> Result<()> {
        self.statistics = compute_statistics(self.dataset.as_slice())?;
        self.correlations = compute_correlation_table(self.dataset.as_slice())?;
        Ok(())
    }

    /// Get the first `limit` observations, or all of them if `limit` is `None`
    pub fn dataset(&self, limit: Option<usize>) -> &[Observation] {
        self.dataset.get(limit)
    }

    /// Summary statistics for the current dataset
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Correlation of each feature against waste for the current dataset
    pub fn feature_correlations(&self) -> &CorrelationTable {
        &self.correlations
    }

    /// The variants which have been trained
    pub fn trained_variants(&self) -> Vec<ModelVariant> {
        self.engine.trained_variants()
    }

    /// The metrics for a variant, if it has been trained
    pub fn model_metrics(&self, variant: ModelVariant) -> Option<&Metrics> {
        self.engine.metrics(variant)
    }

    /// The fixed importance of each feature
    #[allow(clippy::unused_self)]
    pub fn feature_importance(&self) -> IndexMap<Feature, f64> {
        feature_importance()
    }

    /// Every prediction request made so far
    pub fn prediction_history(&self) -> &[PredictionRecord] {
        self.engine.prediction_history()
    }

    /// Percentage reduction in error relative to an untrained model
    pub fn improvement(&self) -> f64 {
        self.engine.improvement()
    }

    /// Train a single variant
    pub fn train(&mut self, variant: ModelVariant) -> Metrics {
        let metrics = TrainingTask::new(variant, 0.0, 100.0).run(&mut self.engine, &mut self.rng);
        info!("Trained {}: {metrics}", variant.parameters().display_name);
        metrics
    }

    /// Train every variant in turn
    pub fn train_all(&mut self) -> IndexMap<ModelVariant, Metrics> {
        self.train_with_progress(TrainingPlan::all(), |_, _| {})
    }

    /// Run a training plan to completion.
    ///
    /// `on_step` is called after every step, so callers can report progress.
    ///
    /// # Returns
    ///
    /// The metrics for every variant trained by the plan.
    pub fn train_with_progress<F>(
        &mut self,
        mut plan: TrainingPlan,
        mut on_step: F,
    ) -> IndexMap<ModelVariant, Metrics>
    where
        F: FnMut(ModelVariant, TrainingStatus),
    {
        let mut trained = IndexMap::new();
        while let Some((variant, status)) = plan.step(&mut self.engine, &mut self.rng) {
            if let TrainingStatus::Complete(metrics) = status {
                info!("Trained {}: {metrics}", variant.parameters().display_name);
                trained.insert(variant, metrics);
            }
            on_step(variant, status);
        }

        trained
    }

    /// Predict waste with every trained variant, recording the request
    pub fn predict(&mut self, inputs: &PredictionInputs) -> Predictions {
        self.engine.predict(inputs, Utc::now(), &mut self.rng)
    }

    /// Predict waste with a single variant, recording the request.
    ///
    /// Returns `None` if the variant has not been trained.
    pub fn predict_variant(
        &mut self,
        variant: ModelVariant,
        inputs: &PredictionInputs,
    ) -> Option<u32> {
        self.engine
            .predict_variant(variant, inputs, Utc::now(), &mut self.rng)
    }

    /// Predict waste for each observation with every trained variant.
    ///
    /// These predictions are not recorded in the prediction history.
    pub fn generate_predictions(&mut self, observations: &[Observation]) -> BulkPredictions {
        self.engine.generate_predictions(observations, &mut self.rng)
    }

    /// Bulk predictions for the first `limit` observations of the session's own dataset
    pub fn generate_dataset_predictions(&mut self, limit: Option<usize>) -> BulkPredictions {
        self.engine
            .generate_predictions(self.dataset.get(limit), &mut self.rng)
    }

    /// Append an observation to the dataset, recomputing statistics and correlations
    pub fn append_observation(&mut self, fields: ObservationFields) -> Result<&Observation> {
        let index = self.dataset.len();
        self.dataset.append(fields);
        self.refresh_statistics()?;

        let obs = &self.dataset.as_slice()[index];
        debug!("Appended observation {}", obs.id);
        Ok(obs)
    }

    /// Add a prediction to the dataset as if it had been observed.
    ///
    /// The new observation takes its features from `inputs` and its waste from the rounded mean of
    /// `predictions`.
    ///
    /// # Returns
    ///
    /// The new observation, or `None` if there are no predictions to learn from.
    pub fn learn_from_prediction(
        &mut self,
        inputs: &PredictionInputs,
        predictions: &Predictions,
    ) -> Result<Option<&Observation>> {
        if predictions.is_empty() {
            return Ok(None);
        }

        let total: f64 = predictions.values().map(|waste| f64::from(*waste)).sum();
        let waste = (total / predictions.len() as f64).round();
        let fields = ObservationFields {
            month: inputs.month,
            year: inputs.year,
            population: inputs.population,
            income: inputs.income,
            urban_area: inputs.urban_area,
            rainfall: inputs.rainfall,
            temperature: inputs.temperature,
            truck_count: inputs.trucks.round().max(0.0) as u32,
            recycling_rate: inputs.recycling,
            waste,
        };

        self.append_observation(fields).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, observation_fields, session};
    use indexmap::indexmap;
    use rstest::rstest;

    #[test]
    fn test_new_zero_size() {
        let options = SessionOptions {
            dataset_size: 0,
            seed: Some(1),
        };
        assert_error!(
            Session::new(&options),
            "Dataset size must be greater than zero"
        );
    }

    #[test]
    fn test_new_same_seed_same_dataset() {
        let options = SessionOptions {
            dataset_size: 24,
            seed: Some(99),
        };
        let session1 = Session::new(&options).unwrap();
        let session2 = Session::new(&options).unwrap();
        assert_eq!(session1.dataset(None), session2.dataset(None));
    }

    #[rstest]
    fn test_append_observation_refreshes_statistics(
        mut session: Session,
        observation_fields: ObservationFields,
    ) {
        let before = session.statistics().clone();
        let fields = ObservationFields {
            year: 2030,
            waste: 2000.0,
            ..observation_fields
        };

        let obs = session.append_observation(fields).unwrap().clone();
        assert_eq!(obs.id as usize, before.total_records + 1);
        assert_eq!(session.dataset(None).last(), Some(&obs));

        let after = session.statistics();
        assert_eq!(after.total_records, before.total_records + 1);
        assert_eq!(after.end_year, 2030);
        assert_eq!(after.max_waste, 2000.0);
        assert_eq!(session.dataset(None).len(), before.total_records + 1);
    }

    #[rstest]
    fn test_predict_untrained(mut session: Session) {
        let inputs = PredictionInputs::default();
        assert_eq!(
            session.predict_variant(ModelVariant::RandomForest, &inputs),
            None
        );
        assert!(session.predict(&inputs).is_empty());
        assert_eq!(session.prediction_history().len(), 2);
    }

    #[rstest]
    fn test_train_then_predict(mut session: Session) {
        let metrics = session.train(ModelVariant::RandomForest);
        assert_eq!(session.trained_variants(), vec![ModelVariant::RandomForest]);
        assert_eq!(
            session.model_metrics(ModelVariant::RandomForest),
            Some(&metrics)
        );

        let waste = session
            .predict_variant(ModelVariant::RandomForest, &PredictionInputs::default())
            .unwrap();
        assert!((600..=1000).contains(&waste));
    }

    #[rstest]
    fn test_train_all_reports_progress(mut session: Session) {
        let mut steps = 0;
        let trained = session.train_with_progress(TrainingPlan::all(), |_, _| steps += 1);
        assert_eq!(trained.len(), 3);
        assert_eq!(steps, 150);
        assert_eq!(session.trained_variants().len(), 3);
    }

    #[rstest]
    fn test_generate_dataset_predictions(mut session: Session) {
        session.train_all();
        let predictions = session.generate_dataset_predictions(Some(24));
        assert!(predictions.values().all(|series| series.len() == 24));
        assert!(session.prediction_history().is_empty());
    }

    #[rstest]
    fn test_learn_from_prediction(mut session: Session) {
        let inputs = PredictionInputs {
            trucks: 52.4,
            ..Default::default()
        };
        let predictions = indexmap! {
            ModelVariant::RandomForest => 800,
            ModelVariant::LinearRegression => 765,
        };

        let obs = session
            .learn_from_prediction(&inputs, &predictions)
            .unwrap()
            .unwrap();
        assert_eq!(obs.waste, 783.0); // 782.5 rounds up
        assert_eq!(obs.truck_count, 52);
        assert_eq!((obs.month, obs.year), (1, 2024));
    }

    #[rstest]
    fn test_learn_from_no_predictions(mut session: Session) {
        let len = session.dataset(None).len();
        assert!(
            session
                .learn_from_prediction(&PredictionInputs::default(), &Predictions::new())
                .unwrap()
                .is_none()
        );
        assert_eq!(session.dataset(None).len(), len);
    }
}
