use std::str::FromStr;

/// Aggregated counters for one user, produced once per request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsRecord {
    pub name: String,
    pub login: String,
    pub commits: u64,
    pub prs: u64,
    pub prs_merged: u64,
    pub issues: u64,
    pub stars: u64,
    pub contributed_to: u64,
    pub followers: u64,
    pub reviews: u64,
    pub discussions_started: u64,
    pub discussions_answered: u64,
}

/// A stat the stats card knows how to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Stars,
    Commits,
    Prs,
    PrsMerged,
    PrsMergedPercentage,
    Issues,
    Contribs,
    Reviews,
    DiscussionsStarted,
    DiscussionsAnswered,
}

/// Stats shown when nothing is hidden, in display order.
pub const DEFAULT_STATS: [StatKind; 5] = [
    StatKind::Stars,
    StatKind::Commits,
    StatKind::Prs,
    StatKind::Issues,
    StatKind::Contribs,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Count(u64),
    Percent(f64),
}

impl StatKind {
    pub const ALL: [StatKind; 10] = [
        StatKind::Stars,
        StatKind::Commits,
        StatKind::Prs,
        StatKind::PrsMerged,
        StatKind::PrsMergedPercentage,
        StatKind::Issues,
        StatKind::Contribs,
        StatKind::Reviews,
        StatKind::DiscussionsStarted,
        StatKind::DiscussionsAnswered,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StatKind::Stars => "stars",
            StatKind::Commits => "commits",
            StatKind::Prs => "prs",
            StatKind::PrsMerged => "prs_merged",
            StatKind::PrsMergedPercentage => "prs_merged_percentage",
            StatKind::Issues => "issues",
            StatKind::Contribs => "contribs",
            StatKind::Reviews => "reviews",
            StatKind::DiscussionsStarted => "discussions_started",
            StatKind::DiscussionsAnswered => "discussions_answered",
        }
    }

    /// Key into the locale table for the row label.
    pub fn label_key(self) -> &'static str {
        match self {
            StatKind::Stars => "statcard_totalstars",
            StatKind::Commits => "statcard_commits",
            StatKind::Prs => "statcard_prs",
            StatKind::PrsMerged => "statcard_prs_merged",
            StatKind::PrsMergedPercentage => "statcard_prs_merged_percentage",
            StatKind::Issues => "statcard_issues",
            StatKind::Contribs => "statcard_contribs",
            StatKind::Reviews => "statcard_reviews",
            StatKind::DiscussionsStarted => "statcard_discussions_started",
            StatKind::DiscussionsAnswered => "statcard_discussions_answered",
        }
    }

    pub fn value(self, stats: &StatsRecord) -> StatValue {
        match self {
            StatKind::Stars => StatValue::Count(stats.stars),
            StatKind::Commits => StatValue::Count(stats.commits),
            StatKind::Prs => StatValue::Count(stats.prs),
            StatKind::PrsMerged => StatValue::Count(stats.prs_merged),
            StatKind::PrsMergedPercentage => {
                let pct = if stats.prs > 0 {
                    stats.prs_merged as f64 / stats.prs as f64 * 100.0
                } else {
                    0.0
                };
                StatValue::Percent(pct)
            }
            StatKind::Issues => StatValue::Count(stats.issues),
            StatKind::Contribs => StatValue::Count(stats.contributed_to),
            StatKind::Reviews => StatValue::Count(stats.reviews),
            StatKind::DiscussionsStarted => StatValue::Count(stats.discussions_started),
            StatKind::DiscussionsAnswered => StatValue::Count(stats.discussions_answered),
        }
    }

    pub fn is_discussion(self) -> bool {
        matches!(
            self,
            StatKind::DiscussionsStarted | StatKind::DiscussionsAnswered
        )
    }
}

impl FromStr for StatKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        StatKind::ALL
            .into_iter()
            .find(|kind| kind.key() == wanted)
            .ok_or(())
    }
}

/// Parses stat keys, dropping the ones that are not known.
pub fn parse_stat_keys<S: AsRef<str>>(keys: &[S]) -> Vec<StatKind> {
    keys.iter()
        .filter_map(|k| match k.as_ref().parse::<StatKind>() {
            Ok(kind) => Some(kind),
            Err(()) => {
                tracing::debug!("ignoring unknown stat key {:?}", k.as_ref());
                None
            }
        })
        .collect()
}

/// Avatar bytes ready for a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarImage {
    pub mime: String,
    /// Base64-encoded image body.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    /// `owner/name`
    pub name: String,
    pub stars: u64,
    pub avatar: Option<AvatarImage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorRecord {
    pub repos: Vec<RepoEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for kind in StatKind::ALL {
            assert_eq!(kind.key().parse::<StatKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let kinds = parse_stat_keys(&["reviews", "bogus", " prs_merged "]);
        assert_eq!(kinds, vec![StatKind::Reviews, StatKind::PrsMerged]);
    }

    #[test]
    fn merged_percentage_handles_zero_prs() {
        let stats = StatsRecord::default();
        assert_eq!(
            StatKind::PrsMergedPercentage.value(&stats),
            StatValue::Percent(0.0)
        );

        let stats = StatsRecord {
            prs: 8,
            prs_merged: 6,
            ..StatsRecord::default()
        };
        assert_eq!(
            StatKind::PrsMergedPercentage.value(&stats),
            StatValue::Percent(75.0)
        );
    }
}
