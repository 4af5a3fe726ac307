//! Step-driven training of the mock models.
//!
//! Training a model is instantaneous, but it is presented as a task which advances a progress
//! percentage over a fixed number of steps before resolving. Callers drive tasks by calling
//! [`TrainingTask::step`] and are free to pause between steps; nothing here depends on timing.
use crate::model::{Metrics, ModelVariant, PredictionEngine};
use log::trace;
use rand::Rng;
use std::collections::VecDeque;

/// The number of steps taken by each training task
pub const TRAINING_STEPS: u32 = 50;

/// The state of a training task after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrainingStatus {
    /// Still running, with progress as a percentage
    InProgress(f64),
    /// Finished, with the metrics of the trained model
    Complete(Metrics),
}

/// Trains a single variant, reporting progress between `start` and `end` percent
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingTask {
    variant: ModelVariant,
    start: f64,
    end: f64,
    steps_taken: u32,
    metrics: Option<Metrics>,
}

impl TrainingTask {
    /// Create a task which reports progress from `start` to `end` percent
    pub fn new(variant: ModelVariant, start: f64, end: f64) -> Self {
        Self {
            variant,
            start,
            end,
            steps_taken: 0,
            metrics: None,
        }
    }

    /// The variant being trained
    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    /// Current progress, as a percentage
    pub fn progress(&self) -> f64 {
        let fraction = f64::from(self.steps_taken) / f64::from(TRAINING_STEPS);
        self.start + (self.end - self.start) * fraction
    }

    /// Whether the model has been trained
    pub fn is_complete(&self) -> bool {
        self.metrics.is_some()
    }

    /// Advance the task by one step.
    ///
    /// On the final step, the variant is trained. Stepping a completed task returns the same
    /// metrics again without retraining.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        engine: &mut PredictionEngine,
        rng: &mut R,
    ) -> TrainingStatus {
        if let Some(metrics) = self.metrics {
            return TrainingStatus::Complete(metrics);
        }

        self.steps_taken += 1;
        trace!("Training {}: {:.1}%", self.variant, self.progress());
        if self.steps_taken < TRAINING_STEPS {
            return TrainingStatus::InProgress(self.progress());
        }

        let metrics = engine.train(self.variant, rng);
        self.metrics = Some(metrics);
        TrainingStatus::Complete(metrics)
    }

    /// Step the task until it completes, returning the metrics
    pub fn run<R: Rng + ?Sized>(&mut self, engine: &mut PredictionEngine, rng: &mut R) -> Metrics {
        loop {
            if let TrainingStatus::Complete(metrics) = self.step(engine, rng) {
                return metrics;
            }
        }
    }
}

/// A sequence of training tasks which share one progress bar
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPlan {
    tasks: VecDeque<TrainingTask>,
}

impl TrainingPlan {
    /// Train every variant in turn, each taking an equal share of 10-100%
    pub fn all() -> Self {
        Self {
            tasks: VecDeque::from([
                TrainingTask::new(ModelVariant::RandomForest, 10.0, 40.0),
                TrainingTask::new(ModelVariant::LinearRegression, 40.0, 70.0),
                TrainingTask::new(ModelVariant::GradientBoosted, 70.0, 100.0),
            ]),
        }
    }

    /// The number of tasks yet to complete
    pub fn remaining(&self) -> usize {
        self.tasks.len()
    }

    /// Advance the current task by one step.
    ///
    /// # Returns
    ///
    /// The variant stepped and its status, or `None` if every task is complete.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        engine: &mut PredictionEngine,
        rng: &mut R,
    ) -> Option<(ModelVariant, TrainingStatus)> {
        let task = self.tasks.front_mut()?;
        let variant = task.variant();
        let status = task.step(engine, rng);
        if task.is_complete() {
            self.tasks.pop_front();
        }

        Some((variant, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::seeded_rng;
    use float_cmp::assert_approx_eq;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[rstest]
    fn test_task_progress(mut seeded_rng: ChaCha8Rng) {
        let mut engine = PredictionEngine::new();
        let mut task = TrainingTask::new(ModelVariant::RandomForest, 10.0, 40.0);
        assert_approx_eq!(f64, task.progress(), 10.0);

        let mut last = task.progress();
        for _ in 1..TRAINING_STEPS {
            let TrainingStatus::InProgress(progress) = task.step(&mut engine, &mut seeded_rng)
            else {
                panic!("Task completed early");
            };
            assert!(progress > last && progress < 40.0);
            last = progress;
        }

        // Nothing is trained until the final step
        assert!(!engine.is_trained(ModelVariant::RandomForest));
        let status = task.step(&mut engine, &mut seeded_rng);
        assert!(matches!(status, TrainingStatus::Complete(_)));
        assert!(engine.is_trained(ModelVariant::RandomForest));
        assert_approx_eq!(f64, task.progress(), 40.0);
    }

    #[rstest]
    fn test_task_step_after_complete(mut seeded_rng: ChaCha8Rng) {
        let mut engine = PredictionEngine::new();
        let mut task = TrainingTask::new(ModelVariant::LinearRegression, 0.0, 100.0);
        let metrics = task.run(&mut engine, &mut seeded_rng);
        assert_eq!(
            task.step(&mut engine, &mut seeded_rng),
            TrainingStatus::Complete(metrics)
        );
        assert_eq!(engine.metrics(ModelVariant::LinearRegression), Some(&metrics));
    }

    #[rstest]
    fn test_plan_all(mut seeded_rng: ChaCha8Rng) {
        let mut engine = PredictionEngine::new();
        let mut plan = TrainingPlan::all();
        assert_eq!(plan.remaining(), 3);

        let mut completed = Vec::new();
        let mut steps = 0;
        while let Some((variant, status)) = plan.step(&mut engine, &mut seeded_rng) {
            steps += 1;
            if let TrainingStatus::Complete(_) = status {
                completed.push(variant);
            }
        }

        assert_eq!(steps, 3 * TRAINING_STEPS);
        assert_eq!(
            completed,
            vec![
                ModelVariant::RandomForest,
                ModelVariant::LinearRegression,
                ModelVariant::GradientBoosted
            ]
        );
        assert_eq!(plan.remaining(), 0);
        assert_eq!(engine.trained_variants(), completed);
    }
}
