//! Bounded, monotonic transforms shared by the calculators

/// Clamp a score to [0, 100]. NaN collapses to 0.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Clamp a ratio or coefficient to [0, 1]. NaN collapses to 0.
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Diminishing-returns transform: 1 - e^(-x / scale), in [0, 1).
///
/// Doubling `x` never doubles the output, so raw volume cannot dominate.
pub fn saturate(x: f64, scale: f64) -> f64 {
    if x <= 0.0 || scale <= 0.0 {
        return 0.0;
    }
    clamp_ratio(1.0 - (-x / scale).exp())
}

/// Concave map of a ratio in [0, 1] onto [0, 1] with f(0) = 0 and f(1) = 1.
///
/// ```text
/// f(r) = (1 - e^(-k r)) / (1 - e^(-k))
/// ```
/// Larger `curvature` (k) rewards the first increments more.
pub fn concave_ratio(ratio: f64, curvature: f64) -> f64 {
    let r = clamp_ratio(ratio);
    if r == 0.0 {
        return 0.0;
    }
    if curvature <= 0.0 {
        return r;
    }
    clamp_ratio((1.0 - (-curvature * r).exp()) / (1.0 - (-curvature).exp()))
}

/// Weight of an interaction's length: starts at `floor` for an instantaneous
/// exchange and approaches 1 as the duration grows past `scale_minutes`.
pub fn duration_factor(minutes: f64, floor: f64, scale_minutes: f64) -> f64 {
    let floor = clamp_ratio(floor);
    floor + (1.0 - floor) * saturate(minutes, scale_minutes)
}
