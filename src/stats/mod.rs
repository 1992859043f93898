//! Consensus statistics over a sampled tree ensemble.

pub mod coassignment;
pub mod membership;
pub mod node_relation;
pub mod rounding;
pub mod ssm_assignment;
pub mod ssm_relation;
pub mod subclone;

pub use coassignment::CoassignmentComputer;
pub use membership::{ClusterMembership, ClusterMembershipComputer};
pub use node_relation::NodeRelationComputer;
pub use rounding::round_to_int;
pub use ssm_assignment::SsmAssignmentComputer;
pub use ssm_relation::SsmRelationComputer;
pub use subclone::{SubcloneStats, SubcloneStatsComputer};

use std::collections::BTreeMap;

/// Most frequent value. Ties go to the smallest tied value; the flag reports
/// whether a tie had to be broken.
pub(crate) fn int_mode(values: &[usize]) -> Option<(usize, bool)> {
    let mut tally: BTreeMap<usize, usize> = BTreeMap::new();
    for &v in values {
        *tally.entry(v).or_insert(0) += 1;
    }

    let mut best: Option<(usize, usize)> = None;
    let mut tied = false;
    for (&value, &count) in &tally {
        match best {
            Some((_, best_count)) if count < best_count => {}
            Some((_, best_count)) if count == best_count => tied = true,
            _ => {
                best = Some((value, count));
                tied = false;
            }
        }
    }
    best.map(|(value, _)| (value, tied))
}
