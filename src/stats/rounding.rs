use crate::error::{ConsensusError, Result};

const REL_TOL: f64 = 1e-5;
const ABS_TOL: f64 = 1e-8;

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= ABS_TOL + REL_TOL * b.abs()
}

fn residual_error(rounded: &[f64], values: &[f64]) -> f64 {
    rounded.iter().zip(values).map(|(r, v)| r - v).sum()
}

/// Rounds every element to the nearest integer while keeping the total.
///
/// `values` must sum to an integer (within floating tolerance). The rounding
/// error left by per-element rounding is pushed onto the largest rounded
/// elements, one unit each, so at most `len / 2` elements move away from their
/// nearest integer. Among equal rounded values the later element is adjusted
/// first: `[1.5, 1.5, 1.0]` becomes `[2, 1, 1]`.
pub fn round_to_int(values: &[f64]) -> Result<Vec<i64>> {
    let mut rounded: Vec<f64> = values.iter().map(|v| v.round_ties_even()).collect();
    let mut rerr = residual_error(&rounded, values);
    if !is_close(rerr.round_ties_even(), rerr) {
        return Err(ConsensusError::Precondition(format!(
            "rounding residual {} is not integral; input must sum to an integer",
            rerr
        )));
    }

    let mut biggest_idxs: Vec<usize> = (0..rounded.len()).collect();
    biggest_idxs.sort_by(|&a, &b| rounded[a].total_cmp(&rounded[b]));

    while !is_close(rerr, 0.0) {
        let idx = biggest_idxs.pop().ok_or_else(|| {
            ConsensusError::Invariant(format!(
                "rounding residual {} remains after adjusting every element",
                rerr
            ))
        })?;
        if rerr > 0.0 {
            rounded[idx] -= 1.0;
        } else {
            rounded[idx] += 1.0;
        }
        rerr = residual_error(&rounded, values);
    }

    let rounded: Vec<i64> = rounded.into_iter().map(|r| r as i64).collect();
    let input_sum: f64 = values.iter().sum();
    let output_sum: i64 = rounded.iter().sum();
    if !is_close(input_sum, output_sum as f64) {
        return Err(ConsensusError::Invariant(format!(
            "rounded sum {} differs from input sum {}",
            output_sum, input_sum
        )));
    }
    Ok(rounded)
}
