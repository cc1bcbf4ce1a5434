//! Weighted aggregation and status classification.
//!
//! A pure fold over the cycle's reasons: each category's reason count is
//! multiplied by its weight, the sum is mapped onto a fixed descending
//! threshold ladder. Identical inputs always classify identically.

use crate::config::Weights;
use crate::detect::{Category, ReasonSet};
use serde::Serialize;

/// The cycle's aggregate numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub weighted: f64,
    pub unweighted: usize,
}

/// Fold the reason counts into weighted and unweighted totals.
pub fn score(reasons: &ReasonSet, weights: &Weights) -> Metrics {
    let weighted = Category::ALL
        .iter()
        .map(|&c| weights.for_category(c) * reasons.count(c) as f64)
        .sum();
    Metrics {
        weighted,
        unweighted: reasons.total(),
    }
}

/// The twelve status tiers, most severe first. Ordering follows severity,
/// so a score increase can never move the tier toward `Baseline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    TotallyUtterlyCompletely,
    Completely,
    Utterly,
    Totally,
    Really,
    Rather,
    Quite,
    Pretty,
    Somewhat,
    Partially,
    JustABit,
    Baseline,
}

impl Status {
    /// Map a weighted score onto the ladder. Strictly-greater comparisons,
    /// highest threshold first, first match wins; total over all
    /// non-negative scores.
    pub fn classify(weighted: f64) -> Status {
        if weighted > 200.0 {
            Status::TotallyUtterlyCompletely
        } else if weighted > 100.0 {
            Status::Completely
        } else if weighted > 60.0 {
            Status::Utterly
        } else if weighted > 50.0 {
            Status::Totally
        } else if weighted > 40.0 {
            Status::Really
        } else if weighted > 30.0 {
            Status::Rather
        } else if weighted > 20.0 {
            Status::Quite
        } else if weighted > 15.0 {
            Status::Pretty
        } else if weighted > 10.0 {
            Status::Somewhat
        } else if weighted > 5.0 {
            Status::Partially
        } else if weighted > 0.0 {
            Status::JustABit
        } else {
            Status::Baseline
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::TotallyUtterlyCompletely => {
                "The Internet is totally, utterly, and completely fucked"
            }
            Status::Completely => "The Internet is completely fucked",
            Status::Utterly => "The Internet is utterly fucked",
            Status::Totally => "The Internet is totally fucked",
            Status::Really => "The Internet is really fucked",
            Status::Rather => "The Internet is rather fucked",
            Status::Quite => "The Internet is quite fucked",
            Status::Pretty => "The Internet is pretty fucked",
            Status::Somewhat => "The Internet is somewhat fucked",
            Status::Partially => "The Internet is partially fucked",
            Status::JustABit => "The Internet is just a bit fucked",
            Status::Baseline => "The Internet is fucked no more than usual",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reasons(counts: &[(Category, usize)]) -> ReasonSet {
        let mut rs = ReasonSet::default();
        for &(category, n) in counts {
            rs.set(category, (0..n).map(|i| format!("reason {i}")).collect());
        }
        rs
    }

    #[test]
    fn weighting_combines_categories() {
        let w = Weights::default();
        let rs = reasons(&[(Category::Origins, 3), (Category::DnsRoot, 1)]);
        let m = score(&rs, &w);
        assert!((m.weighted - 10.3).abs() < 1e-9);
        assert_eq!(m.unweighted, 4);
        // 10.3 sits strictly above the 10 threshold on the ladder
        assert_eq!(Status::classify(m.weighted), Status::Somewhat);
    }

    #[test]
    fn ladder_boundaries_are_strictly_greater() {
        assert_eq!(Status::classify(0.0), Status::Baseline);
        assert_eq!(Status::classify(0.1), Status::JustABit);
        assert_eq!(Status::classify(5.0), Status::JustABit);
        assert_eq!(Status::classify(5.1), Status::Partially);
        assert_eq!(Status::classify(10.0), Status::Partially);
        assert_eq!(Status::classify(15.0), Status::Somewhat);
        assert_eq!(Status::classify(20.0), Status::Pretty);
        assert_eq!(Status::classify(30.0), Status::Quite);
        assert_eq!(Status::classify(40.0), Status::Rather);
        assert_eq!(Status::classify(50.0), Status::Really);
        assert_eq!(Status::classify(60.0), Status::Totally);
        assert_eq!(Status::classify(100.0), Status::Utterly);
        assert_eq!(Status::classify(200.0), Status::Completely);
        assert_eq!(Status::classify(200.5), Status::TotallyUtterlyCompletely);
    }

    #[test]
    fn classification_is_deterministic() {
        for score in [0.0, 3.3, 17.0, 99.9, 1e6] {
            assert_eq!(Status::classify(score), Status::classify(score));
        }
    }

    #[test]
    fn more_reasons_never_downgrade_the_tier() {
        let w = Weights::default();
        for category in Category::ALL {
            let mut prev_weighted = f64::MIN;
            let mut prev_status = Status::Baseline;
            for n in 0..300 {
                let m = score(&reasons(&[(category, n)]), &w);
                assert!(m.weighted >= prev_weighted);
                let status = Status::classify(m.weighted);
                // Status derives Ord most-severe-first
                assert!(status <= prev_status);
                prev_weighted = m.weighted;
                prev_status = status;
            }
        }
    }
}
