use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delta {
    pub delta_percent: f64,
    pub improved: bool,
}

/// Signed percentage change of `current` against `baseline`, rounded to one
/// decimal place. A non-positive baseline is treated as missing and yields
/// a zero, not-improved delta.
pub fn compute_delta(baseline: f64, current: f64) -> Delta {
    if baseline.is_nan() || baseline <= 0.0 {
        return Delta {
            delta_percent: 0.0,
            improved: false,
        };
    }

    let raw = (current - baseline) / baseline * 100.0;
    Delta {
        delta_percent: round1(raw),
        improved: current > baseline,
    }
}

/// Rounds to one decimal place, half away from zero.
///
/// The scaled value is first snapped to 1e-6 so that decimal halves which
/// land a hair under .5 in binary (81.24 vs 80 gives 15.4999...) still round
/// away from zero.
pub fn round1(value: f64) -> f64 {
    let scaled = value * 10.0;
    let snapped = (scaled * 1e6).round() / 1e6;
    let rounded = snapped.round() / 10.0;
    // normalize -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
