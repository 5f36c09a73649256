//! Statistical tests and summaries used by the describers.
//!
//! Failures are reported as `anyhow` errors carrying a short, human-readable
//! reason; the calling describer turns that reason into an `Invalid` verdict.

use anyhow::{Result, bail};
use statrs::distribution::{ContinuousCDF as _, FisherSnedecor, StudentsT};

/// p-value below which a test result counts as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnovaResult {
    pub f: f64,
    pub p: f64,
    pub df_between: f64,
    pub df_within: f64,
}

/// One-way ANOVA F test across groups. Empty groups are ignored.
pub fn one_way_anova(groups: &[Vec<f64>]) -> Result<AnovaResult> {
    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    if k < 2 {
        bail!("ANOVA requires at least two groups with values (found {k})");
    }
    let n: usize = groups.iter().map(|g| g.len()).sum();
    if n <= k {
        bail!("ANOVA requires more observations ({n}) than groups ({k})");
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;

    // Exact comparisons keep the verdict independent of the data's scale.
    if groups.iter().all(|g| is_constant(g)) {
        let first = groups.first().and_then(|g| g.first());
        if groups.iter().all(|g| g.first() == first) {
            bail!("all values are identical, ANOVA is undefined");
        }
        // No spread inside groups: the group means separate perfectly.
        return Ok(AnovaResult {
            f: f64::INFINITY,
            p: 0.0,
            df_between,
            df_within,
        });
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let mean = mean(group);
        ss_between += group.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += group.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
    }

    let f = (ss_between / df_between) / (ss_within / df_within);
    let dist = FisherSnedecor::new(df_between, df_within)?;
    Ok(AnovaResult {
        f,
        p: dist.sf(f).clamp(0.0, 1.0),
        df_between,
        df_within,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PearsonResult {
    pub r: f64,
    pub p: f64,
    pub n: usize,
}

/// Pearson correlation with a two-sided Student-t p-value.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<PearsonResult> {
    let n = x.len();
    if n != y.len() {
        bail!("paired samples differ in length ({n} vs {})", y.len());
    }
    if n < 2 {
        bail!("correlation requires at least two paired values (found {n})");
    }

    let (sxx, syy, sxy) = sums_of_squares(x, y);
    if sxx <= 0.0 || syy <= 0.0 {
        bail!("an input is constant, correlation is undefined");
    }
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

    let p = if n == 2 {
        1.0
    } else if r.abs() >= 1.0 {
        0.0
    } else {
        let df = (n - 2) as f64;
        let t = r * (df / (1.0 - r * r)).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df)?;
        (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0)
    };

    Ok(PearsonResult { r, p, n })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Ordinary least squares fit of `y = slope * x + intercept`.
pub fn least_squares(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let (sxx, syy, sxy) = sums_of_squares(x, y);
    if sxx <= 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = mean(y) - slope * mean(x);
    let r_squared = if syy > 0.0 {
        (sxy * sxy) / (sxx * syy)
    } else {
        1.0
    };
    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w.first() == w.last())
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sums_of_squares(x: &[f64], y: &[f64]) -> (f64, f64, f64) {
    let mx = mean(x);
    let my = mean(y);
    x.iter().zip(y).fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (a, b)| {
        let dx = a - mx;
        let dy = b - my;
        (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
    })
}

/// Linear-interpolated quantile of already sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let lo = *sorted.get(lower)?;
    let hi = *sorted.get(upper)?;
    Some(lo + (hi - lo) * (pos - lower as f64))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bin_width: f64,
    /// Bin start and count.
    pub bins: Vec<(f64, usize)>,
}

/// Freedman–Diaconis histogram, bin count clamped to 5..=50.
///
/// A column holding a single distinct value gets one bin of width 1.
pub fn histogram(values: &[f64]) -> Histogram {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (Some(&min_v), Some(&max_v)) = (sorted.first(), sorted.last()) else {
        return Histogram {
            bin_width: 0.0,
            bins: Vec::new(),
        };
    };

    if min_v == max_v {
        return Histogram {
            bin_width: 1.0,
            bins: vec![(min_v, sorted.len())],
        };
    }

    let n = sorted.len() as f64;
    let q1 = quantile_sorted(&sorted, 0.25).unwrap_or(min_v);
    let q3 = quantile_sorted(&sorted, 0.75).unwrap_or(max_v);
    let iqr = q3 - q1;
    let h = if iqr > 0.0 {
        2.0 * iqr / n.cbrt()
    } else {
        (max_v - min_v) / n.sqrt()
    };

    let num_bins = (((max_v - min_v) / h).ceil() as usize).clamp(5, 50);
    let bin_width = (max_v - min_v) / num_bins as f64;

    let mut counts = vec![0usize; num_bins];
    for val in &sorted {
        let idx = (((val - min_v) / bin_width).floor() as usize).min(num_bins - 1);
        if let Some(count) = counts.get_mut(idx) {
            *count += 1;
        }
    }

    Histogram {
        bin_width,
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| (min_v + i as f64 * bin_width, count))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anova_overlapping_means() -> Result<()> {
        let result = one_way_anova(&[vec![10.0, 20.0, 30.0], vec![11.0, 21.0, 31.0]])?;
        assert!((result.f - 0.015).abs() < 1e-9, "F={}", result.f);
        assert!(result.p > 0.9 && result.p < 0.92, "p={}", result.p);
        Ok(())
    }

    #[test]
    fn test_anova_different_means() -> Result<()> {
        let result = one_way_anova(&[vec![10.0, 20.0, 30.0], vec![100.0, 110.0, 120.0]])?;
        assert!((result.f - 121.5).abs() < 1e-9, "F={}", result.f);
        assert!(result.p < 0.001, "p={}", result.p);
        Ok(())
    }

    #[test]
    fn test_anova_needs_two_groups() {
        assert!(one_way_anova(&[vec![1.0, 2.0]]).is_err());
        assert!(one_way_anova(&[vec![1.0], vec![2.0]]).is_err());
        assert!(one_way_anova(&[vec![3.0, 3.0], vec![3.0, 3.0]]).is_err());
    }

    #[test]
    fn test_anova_no_within_group_spread() -> Result<()> {
        let result = one_way_anova(&[vec![1.0, 1.0], vec![5.0, 5.0]])?;
        assert!(result.f.is_infinite());
        assert_eq!(result.p, 0.0);
        Ok(())
    }

    #[test]
    fn test_anova_verdict_ignores_scale() -> Result<()> {
        let scaled = |groups: &[Vec<f64>], factor: f64| -> Vec<Vec<f64>> {
            groups
                .iter()
                .map(|g| g.iter().map(|x| x * factor).collect())
                .collect()
        };
        let cases = [
            vec![vec![0.0, 1.0], vec![2.0, 3.0]],
            vec![vec![10.0, 20.0, 30.0], vec![11.0, 21.0, 31.0]],
        ];
        for groups in &cases {
            let base = one_way_anova(groups)?;
            for factor in [1e-9, 1e-8, 1e9] {
                let result = one_way_anova(&scaled(groups, factor))?;
                assert!(result.f.is_finite(), "factor {factor}: F={}", result.f);
                assert!((result.p - base.p).abs() < 1e-6, "factor {factor}: p={}", result.p);
            }
        }

        let tiny = one_way_anova(&[vec![1e-12, 1e-12], vec![5e-12, 5e-12]])?;
        assert!(tiny.f.is_infinite());
        assert!(one_way_anova(&[vec![1e-12, 1e-12], vec![1e-12]]).is_err());
        Ok(())
    }

    #[test]
    fn test_pearson_perfect_line() -> Result<()> {
        let x = [10.0, 11.0, 12.0, 13.0, 14.0];
        let y = [20.0, 21.0, 22.0, 23.0, 24.0];
        let result = pearson(&x, &y)?;
        assert!((result.r - 1.0).abs() < 1e-12);
        assert_eq!(result.p, 0.0);
        Ok(())
    }

    #[test]
    fn test_pearson_weak() -> Result<()> {
        let x = [1.0, 5.0, 2.0, 4.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = pearson(&x, &y)?;
        assert!((result.r - 0.3).abs() < 1e-12, "r={}", result.r);
        assert!(result.p > 0.5 && result.p < 0.7, "p={}", result.p);
        Ok(())
    }

    #[test]
    fn test_pearson_rejects_constant_input() {
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(pearson(&[1.0], &[1.0]).is_err());
    }

    #[test]
    fn test_least_squares() {
        let fit = least_squares(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]);
        let fit = fit.unwrap_or(LinearFit {
            slope: f64::NAN,
            intercept: f64::NAN,
            r_squared: f64::NAN,
        });
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_counts_everything() {
        let hist = histogram(&[1.0, 1.0, 2.0, 3.0, 10.0]);
        assert!(hist.bins.len() >= 5);
        assert_eq!(hist.bins.iter().map(|b| b.1).sum::<usize>(), 5);
        assert_eq!(hist.bins.first().map(|b| b.0), Some(1.0));
    }

    #[test]
    fn test_histogram_single_value() {
        let hist = histogram(&[2.0, 2.0, 2.0]);
        assert_eq!(hist.bins, vec![(2.0, 3)]);
    }

    #[test]
    fn test_histogram_small_spread() {
        let hist = histogram(&[1e-9, 2e-9, 3e-9, 4e-9, 5e-9]);
        assert!(hist.bins.len() >= 5);
        assert_eq!(hist.bins.iter().map(|b| b.1).sum::<usize>(), 5);
    }

    #[test]
    fn test_quantile_sorted() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }
}
