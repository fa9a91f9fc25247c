//! rank.rs
//!
//! Turns activity counters into a letter level and a percentile.
//!
//! Each counter is divided by its median and squashed into [0, 1):
//!     • activity counters use an exponential CDF `1 - 2^-x`
//!     • popularity counters use a log-normal-ish CDF `x / (1 + x)`
//!
//! The weighted mean of those scores is subtracted from 1, so a lower
//! percentile means a better rank ("top 1%" is level S).

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankInput {
    pub commits: u64,
    pub prs: u64,
    pub issues: u64,
    pub reviews: u64,
    pub stars: u64,
    pub followers: u64,
    /// Commits are all-time rather than last year; raises the commit median.
    pub all_commits: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankResult {
    pub level: &'static str,
    pub percentile: f64,
}

#[derive(Clone, Copy)]
enum Cdf {
    Exponential,
    LogNormal,
}

struct Metric {
    median: f64,
    weight: f64,
    cdf: Cdf,
}

const COMMITS_MEDIAN: f64 = 250.0;
const ALL_COMMITS_MEDIAN: f64 = 1000.0;

const COMMITS_WEIGHT: f64 = 2.0;
const PRS: Metric = Metric {
    median: 50.0,
    weight: 3.0,
    cdf: Cdf::Exponential,
};
const ISSUES: Metric = Metric {
    median: 25.0,
    weight: 1.0,
    cdf: Cdf::Exponential,
};
const REVIEWS: Metric = Metric {
    median: 2.0,
    weight: 1.0,
    cdf: Cdf::Exponential,
};
const STARS: Metric = Metric {
    median: 50.0,
    weight: 4.0,
    cdf: Cdf::LogNormal,
};
const FOLLOWERS: Metric = Metric {
    median: 10.0,
    weight: 1.0,
    cdf: Cdf::LogNormal,
};

/// Upper percentile bound for each level, best first.
const LEVELS: [(f64, &str); 9] = [
    (1.0, "S"),
    (12.5, "A+"),
    (25.0, "A"),
    (37.5, "A-"),
    (50.0, "B+"),
    (62.5, "B"),
    (75.0, "B-"),
    (87.5, "C+"),
    (100.0, "C"),
];

fn exponential_cdf(x: f64) -> f64 {
    1.0 - 2f64.powf(-x)
}

fn log_normal_cdf(x: f64) -> f64 {
    x / (1.0 + x)
}

impl Metric {
    fn score(&self, value: u64) -> f64 {
        let x = value as f64 / self.median;
        let p = match self.cdf {
            Cdf::Exponential => exponential_cdf(x),
            Cdf::LogNormal => log_normal_cdf(x),
        };
        self.weight * p
    }
}

pub fn calculate_rank(input: &RankInput) -> RankResult {
    let commits = Metric {
        median: if input.all_commits {
            ALL_COMMITS_MEDIAN
        } else {
            COMMITS_MEDIAN
        },
        weight: COMMITS_WEIGHT,
        cdf: Cdf::Exponential,
    };

    let scored = [
        (&commits, input.commits),
        (&PRS, input.prs),
        (&ISSUES, input.issues),
        (&REVIEWS, input.reviews),
        (&STARS, input.stars),
        (&FOLLOWERS, input.followers),
    ];

    let total_weight: f64 = scored.iter().map(|(m, _)| m.weight).sum();
    let weighted: f64 = scored.iter().map(|(m, v)| m.score(*v)).sum();

    let percentile = (1.0 - weighted / total_weight) * 100.0;
    let level = LEVELS
        .iter()
        .find(|(threshold, _)| percentile <= *threshold)
        .map(|(_, level)| *level)
        .unwrap_or("C");

    RankResult { level, percentile }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn no_activity_is_lowest_level() {
        let r = calculate_rank(&RankInput::default());
        assert_eq!(r.level, "C");
        assert_eq!(r.percentile, 100.0);
    }

    #[test]
    fn median_user_lands_on_b_plus() {
        let r = calculate_rank(&RankInput {
            commits: 250,
            prs: 50,
            issues: 25,
            reviews: 2,
            stars: 50,
            followers: 10,
            all_commits: false,
        });
        assert_eq!(r.percentile, 50.0);
        assert_eq!(r.level, "B+");
    }

    #[test]
    fn all_commits_raises_commit_median() {
        let base = RankInput {
            commits: 500,
            ..RankInput::default()
        };
        let yearly = calculate_rank(&base);
        let all_time = calculate_rank(&RankInput {
            all_commits: true,
            ..base
        });
        assert!(all_time.percentile > yearly.percentile);
    }

    #[test]
    fn heavy_user_reaches_s() {
        let r = calculate_rank(&RankInput {
            commits: 10_000,
            prs: 3_000,
            issues: 2_000,
            reviews: 1_000,
            stars: 600_000,
            followers: 50_000,
            all_commits: false,
        });
        assert_eq!(r.level, "S");
        assert!(r.percentile < 1.0);
    }

    proptest! {
        #[test]
        fn rank_is_deterministic_and_bounded(
            commits in 0u64..100_000,
            prs in 0u64..10_000,
            issues in 0u64..10_000,
            reviews in 0u64..10_000,
            stars in 0u64..1_000_000,
            followers in 0u64..100_000,
            all_commits in any::<bool>(),
        ) {
            let input = RankInput { commits, prs, issues, reviews, stars, followers, all_commits };
            let a = calculate_rank(&input);
            let b = calculate_rank(&input);
            prop_assert_eq!(a, b);
            prop_assert!(a.percentile > 0.0 && a.percentile <= 100.0);
        }

        #[test]
        fn more_stars_never_worsens_rank(stars in 0u64..1_000_000, extra in 1u64..1_000) {
            let lo = calculate_rank(&RankInput { stars, ..RankInput::default() });
            let hi = calculate_rank(&RankInput { stars: stars + extra, ..RankInput::default() });
            prop_assert!(hi.percentile <= lo.percentile + 1e-9);
        }
    }
}
