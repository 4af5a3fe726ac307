//! Fixtures for tests

use crate::dataset::ObservationFields;
use crate::model::{ModelVariant, PredictionEngine, PredictionInputs};
use crate::rng::new_rng;
use crate::session::{Session, SessionOptions};
use rand_chacha::ChaCha8Rng;
use rstest::fixture;
use strum::IntoEnumIterator;

/// Seed used for all randomness in tests
pub const TEST_SEED: u64 = 42;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn seeded_rng() -> ChaCha8Rng {
    new_rng(Some(TEST_SEED))
}

#[fixture]
pub fn observation_fields() -> ObservationFields {
    ObservationFields {
        month: 1,
        year: 2013,
        population: 8500.0,
        income: 25000.0,
        urban_area: 280.0,
        rainfall: 150.0,
        temperature: 28.0,
        truck_count: 45,
        recycling_rate: 18.0,
        waste: 785.0,
    }
}

#[fixture]
pub fn prediction_inputs() -> PredictionInputs {
    PredictionInputs::default()
}

#[fixture]
pub fn trained_engine() -> PredictionEngine {
    let mut rng = new_rng(Some(TEST_SEED + 1));
    let mut engine = PredictionEngine::new();
    for variant in ModelVariant::iter() {
        engine.train(variant, &mut rng);
    }

    engine
}

#[fixture]
pub fn session() -> Session {
    Session::new(&SessionOptions {
        dataset_size: 144,
        seed: Some(TEST_SEED),
    })
    .unwrap()
}
