//! Distributional summaries of a single metric over one or more runs.
//!
//! A [`Cdf`] never holds raw samples. It carries a sample count, a centrality
//! estimate, a spread, the value range and a table of percentiles over a fixed
//! probability grid. Merging two summaries is a pure function of the two
//! summaries:
//!
//! - `sample_count`, `range_low` and `range_high` merge exactly;
//! - `centrality` and every percentile value are the sample-count-weighted mean
//!   of the inputs. For percentiles this is a re-estimate, not the value a
//!   recomputation from the pooled samples would give;
//! - `spread` merges as a pooled standard deviation, which is exact when
//!   centrality is the mean and spread the population standard deviation.
//!
//! Merging requires identical probability grids; there is no resampling.
//! An input with a zero sample count carries no weight. When both inputs are
//! empty the result is empty too and takes the componentwise maximum of
//! centrality, spread and percentile values. Both rules are associative and
//! commutative, so a list of per-run CDFs can be folded in any order (or
//! tree-reduced) with equal results up to floating-point rounding.
//!
//! Sample counts that would overflow `u64` are rejected.

use serde::{Deserialize, Serialize};

use crate::errors::{ReportError, Result};

/// Two grid probabilities closer than this are the same grid point.
pub const GRID_TOLERANCE: f64 = 1e-12;

/// One point of the percentile table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centile {
    /// Probability in `[0, 1]`.
    pub p: f64,
    pub value: f64,
}

/// Which statistic of a distribution to render.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "stat", content = "p")]
pub enum Stat {
    #[default]
    Centrality,
    Spread,
    Low,
    High,
    Count,
    Percentile(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCdf")]
pub struct Cdf {
    sample_count: u64,
    centrality: f64,
    spread: f64,
    percentiles: Vec<Centile>,
    range_low: f64,
    range_high: f64,
}

/// Unchecked wire form; validated into a [`Cdf`] on deserialization.
#[derive(Deserialize)]
struct RawCdf {
    sample_count: u64,
    centrality: f64,
    spread: f64,
    percentiles: Vec<Centile>,
    range_low: f64,
    range_high: f64,
}

impl TryFrom<RawCdf> for Cdf {
    type Error = ReportError;

    fn try_from(raw: RawCdf) -> Result<Self> {
        Cdf::new(
            raw.sample_count,
            raw.centrality,
            raw.spread,
            raw.percentiles,
            raw.range_low,
            raw.range_high,
        )
    }
}

impl Cdf {
    /// Build a CDF, checking the grid and range invariants.
    pub fn new(
        sample_count: u64,
        centrality: f64,
        spread: f64,
        percentiles: Vec<Centile>,
        range_low: f64,
        range_high: f64,
    ) -> Result<Self> {
        let finite = [centrality, spread, range_low, range_high]
            .iter()
            .chain(percentiles.iter().map(|c| &c.value))
            .all(|x| x.is_finite());
        if !finite {
            return Err(ReportError::invalid_distribution(
                "non-finite value in summary",
            ));
        }
        if spread < 0.0 {
            return Err(ReportError::invalid_distribution(format!(
                "negative spread {}",
                spread
            )));
        }
        if !(range_low <= centrality && centrality <= range_high) {
            return Err(ReportError::invalid_distribution(format!(
                "centrality {} outside range [{}, {}]",
                centrality, range_low, range_high
            )));
        }
        if percentiles.len() < 2 {
            return Err(ReportError::invalid_distribution(format!(
                "percentile grid needs at least a low and a high point, got {}",
                percentiles.len()
            )));
        }
        for c in &percentiles {
            if !(0.0..=1.0).contains(&c.p) {
                return Err(ReportError::invalid_distribution(format!(
                    "probability {} outside [0, 1]",
                    c.p
                )));
            }
        }
        if let Some(w) = percentiles.windows(2).find(|w| w[0].p >= w[1].p) {
            return Err(ReportError::invalid_distribution(format!(
                "probabilities not strictly increasing at {} -> {}",
                w[0].p, w[1].p
            )));
        }

        Ok(Self {
            sample_count,
            centrality,
            spread,
            percentiles,
            range_low,
            range_high,
        })
    }

    /// Convenience constructor from `(p, value)` pairs.
    pub fn from_pairs(
        sample_count: u64,
        centrality: f64,
        spread: f64,
        pairs: &[(f64, f64)],
        range_low: f64,
        range_high: f64,
    ) -> Result<Self> {
        let percentiles = pairs.iter().map(|&(p, value)| Centile { p, value }).collect();
        Self::new(
            sample_count,
            centrality,
            spread,
            percentiles,
            range_low,
            range_high,
        )
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn centrality(&self) -> f64 {
        self.centrality
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    pub fn percentiles(&self) -> &[Centile] {
        &self.percentiles
    }

    pub fn range_low(&self) -> f64 {
        self.range_low
    }

    pub fn range_high(&self) -> f64 {
        self.range_high
    }

    /// The probability grid.
    pub fn grid(&self) -> Vec<f64> {
        self.percentiles.iter().map(|c| c.p).collect()
    }

    /// Value at grid probability `p`, if `p` is a grid point.
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|c| (c.p - p).abs() <= GRID_TOLERANCE)
            .map(|c| c.value)
    }

    pub fn has_same_grid(&self, other: &Cdf) -> bool {
        self.percentiles.len() == other.percentiles.len()
            && self
                .percentiles
                .iter()
                .zip(&other.percentiles)
                .all(|(a, b)| (a.p - b.p).abs() <= GRID_TOLERANCE)
    }

    /// Merge two summaries into one over the union population.
    pub fn merge(&self, other: &Cdf) -> Result<Cdf> {
        self.merge_inner(None, other)
    }

    /// Like [`Cdf::merge`], naming the metric in a grid-mismatch error.
    pub fn merge_named(&self, metric: &str, other: &Cdf) -> Result<Cdf> {
        self.merge_inner(Some(metric), other)
    }

    fn merge_inner(&self, metric: Option<&str>, other: &Cdf) -> Result<Cdf> {
        if !self.has_same_grid(other) {
            return Err(ReportError::IncompatibleDistributions {
                metric: metric.map(str::to_string),
                left: self.grid(),
                right: other.grid(),
            });
        }

        let sample_count = self
            .sample_count
            .checked_add(other.sample_count)
            .ok_or_else(|| {
                ReportError::invalid_distribution(format!(
                    "sample count overflow merging {} and {}",
                    self.sample_count, other.sample_count
                ))
            })?;

        let (centrality, spread, percentiles) = if sample_count == 0 {
            // Neither side carries weight: take the componentwise extremes.
            let percentiles = self
                .percentiles
                .iter()
                .zip(&other.percentiles)
                .map(|(a, b)| Centile {
                    p: a.p,
                    value: a.value.max(b.value),
                })
                .collect();
            (
                self.centrality.max(other.centrality),
                self.spread.max(other.spread),
                percentiles,
            )
        } else {
            let wa = self.sample_count as f64 / sample_count as f64;
            let wb = 1.0 - wa;
            let centrality = wa * self.centrality + wb * other.centrality;
            let pooled = wa * (self.spread.powi(2) + (self.centrality - centrality).powi(2))
                + wb * (other.spread.powi(2) + (other.centrality - centrality).powi(2));
            let percentiles = self
                .percentiles
                .iter()
                .zip(&other.percentiles)
                .map(|(a, b)| Centile {
                    p: a.p,
                    value: wa * a.value + wb * b.value,
                })
                .collect();
            (centrality, pooled.max(0.0).sqrt(), percentiles)
        };
        let range_low = self.range_low.min(other.range_low);
        let range_high = self.range_high.max(other.range_high);

        Ok(Cdf {
            sample_count,
            // Rounding in the weighted mean must not push centrality out of range.
            centrality: centrality.clamp(range_low, range_high),
            spread,
            percentiles,
            range_low,
            range_high,
        })
    }

    /// Fold a non-empty sequence of CDFs with [`Cdf::merge`].
    pub fn merge_all<'a, I>(cdfs: I) -> Result<Cdf>
    where
        I: IntoIterator<Item = &'a Cdf>,
    {
        let mut iter = cdfs.into_iter();
        let first = iter
            .next()
            .ok_or_else(|| ReportError::empty_run_set("no distributions to merge"))?;
        let mut acc = first.clone();
        let mut folded = 1usize;
        for cdf in iter {
            acc = acc.merge(cdf)?;
            folded += 1;
        }
        tracing::debug!(folded, samples = acc.sample_count, "merged distributions");
        Ok(acc)
    }

    pub fn stat(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Centrality => Some(self.centrality),
            Stat::Spread => Some(self.spread),
            Stat::Low => Some(self.range_low),
            Stat::High => Some(self.range_high),
            Stat::Count => Some(self.sample_count as f64),
            Stat::Percentile(p) => self.percentile(p),
        }
    }

    /// Render the centrality to `precision` decimal places.
    pub fn format(&self, precision: i32) -> Result<String> {
        self.format_stat(Stat::Centrality, precision)
    }

    /// Render the selected statistic to `precision` decimal places.
    pub fn format_stat(&self, stat: Stat, precision: i32) -> Result<String> {
        let value = self.stat(stat).ok_or_else(|| {
            ReportError::invalid_distribution(format!(
                "no percentile {:?} on grid {:?}",
                stat,
                self.grid()
            ))
        })?;
        format_fixed(value, precision)
    }
}

/// Fixed-point rendering shared by distributional and instant fields.
pub fn format_fixed(value: f64, precision: i32) -> Result<String> {
    if precision < 0 {
        return Err(ReportError::InvalidPrecision { precision });
    }
    Ok(format!("{:.*}", precision as usize, value))
}
