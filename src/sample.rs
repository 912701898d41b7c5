use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rbrank_config::{SampleMode, SampleSettings};
use rbrank_tree::Element;

/// Sample entry: a unique sequence number as the key, the ranked value as
/// the value.
pub type Sample = Element<u64, i64>;

/// Builds the elements for one run. Keys are unique even when values repeat.
pub fn generate(settings: &SampleSettings) -> Vec<Sample> {
    let values = match settings.mode {
        SampleMode::Fixed => settings.values.clone(),
        SampleMode::Random => random_values(settings.count, settings.max_value, settings.seed),
    };

    (0u64..).zip(values).map(Element::from).collect()
}

fn random_values(count: usize, max_value: i64, seed: Option<u64>) -> Vec<i64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..count).map(|_| rng.gen_range(0..max_value)).collect()
}
