use crate::sample::Sample;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rbrank_config::{RemoveOrder, RunSettings};
use rbrank_tree::{InvariantError, RankTree};
use std::time::{Duration, Instant};

/// Outcome of one timed pass over the samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub elapsed: Duration,
}

impl PassReport {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// Inserts every sample, validating after each one when asked to.
pub fn insert_pass(
    tree: &mut RankTree<u64, i64>,
    samples: &[Sample],
    run: &RunSettings,
) -> Result<PassReport, InvariantError> {
    let start = Instant::now();
    let mut succeeded = 0;

    for sample in samples {
        if tree.insert(sample.clone()) {
            succeeded += 1;
        } else {
            warn!("duplicate key {} rejected", sample.key());
        }
        if run.check_invariants {
            tree.validate()?;
        }
    }

    let report = PassReport {
        attempted: samples.len(),
        succeeded,
        elapsed: start.elapsed(),
    };
    info!(
        "inserted {}/{} elements ({} rejected) in {:?}",
        report.succeeded,
        report.attempted,
        report.failed(),
        report.elapsed
    );
    Ok(report)
}

/// Removes every sample in the configured order.
pub fn remove_pass(
    tree: &mut RankTree<u64, i64>,
    samples: &[Sample],
    run: &RunSettings,
    seed: Option<u64>,
) -> Result<PassReport, InvariantError> {
    let order = removal_order(samples, run.remove_order, seed);
    let start = Instant::now();
    let mut succeeded = 0;

    for sample in order {
        if tree.remove(sample) {
            succeeded += 1;
        } else {
            warn!("key {} was not in the tree", sample.key());
        }
        if run.check_invariants {
            tree.validate()?;
        }
    }

    let report = PassReport {
        attempted: samples.len(),
        succeeded,
        elapsed: start.elapsed(),
    };
    info!(
        "removed {}/{} elements ({} missing, {} order) in {:?}",
        report.succeeded,
        report.attempted,
        report.failed(),
        run.remove_order,
        report.elapsed
    );
    Ok(report)
}

fn removal_order(samples: &[Sample], order: RemoveOrder, seed: Option<u64>) -> Vec<&Sample> {
    let mut ordered: Vec<&Sample> = samples.iter().collect();
    match order {
        RemoveOrder::Insertion => {}
        RemoveOrder::Reverse => ordered.reverse(),
        RemoveOrder::Shuffled => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            ordered.shuffle(&mut rng);
        }
    }
    debug!("removal order: {:?}", ordered.iter().map(|s| s.key()).collect::<Vec<_>>());
    ordered
}

/// Logs the tree contents in ascending value order.
pub fn log_contents(tree: &RankTree<u64, i64>) {
    info!(
        "{} elements, root color {:?}, black height {:?}",
        tree.len(),
        tree.root_color(),
        tree.black_height()
    );
    for element in tree.traverse() {
        info!("  key {:>6}  value {}", element.key(), element.value());
    }
}
