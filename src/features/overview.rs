// Profile overview aggregation
// Merges every linked platform's statistics into the single summary the
// dashboard renders on the profile page

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::models::platform::Platform;
use crate::models::question::Difficulty;
use crate::models::stats::{PlatformStatsRecord, ProfileBundle};

/// Solved-question counts bucketed by difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyBreakdown {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

/// Best known contest standing on one platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    Ranked(u64),
    Unranked,
}

impl Default for Ranking {
    fn default() -> Self {
        Ranking::Unranked
    }
}

// Renders as the numeric place, or "unranked" where older payloads
// produced a meaningless null
impl Serialize for Ranking {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Ranking::Ranked(place) => serializer.serialize_u64(*place),
            Ranking::Unranked => serializer.serialize_str("unranked"),
        }
    }
}

/// Contest summary for a single platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestSummary {
    pub total_contests: u64,
    pub rating: u64,
    pub ranking: Ranking,
}

/// One rating-history entry tagged with the platform it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingSample {
    pub date: String,
    pub rating: u64,
    pub platform: Platform,
}

/// The unified cross-platform overview
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedOverview {
    pub total_questions: u64,
    pub total_active_days: u64,
    pub topic_wise: HashMap<String, u64>,
    pub difficulty_wise: DifficultyBreakdown,
    pub contest_stats: HashMap<Platform, ContestSummary>,
    pub rating_history: Vec<RatingSample>,
}

/// Merge every present platform record into one overview.
///
/// Pure and order-independent: totals and topic counts sum, difficulty
/// labels match case-insensitively, contest rating keeps the maximum
/// and ranking the minimum seen. Every present platform gets a contest
/// entry even if it never reported a contest field. Sums saturate at
/// u64::MAX instead of wrapping.
pub fn aggregate(bundle: &ProfileBundle) -> AggregatedOverview {
    let mut overview = AggregatedOverview::default();
    for (platform, record) in bundle.iter() {
        merge_record(&mut overview, platform, record);
    }
    overview
}

fn merge_record(
    overview: &mut AggregatedOverview,
    platform: Platform,
    record: &PlatformStatsRecord,
) {
    // Counts come from untrusted payloads; saturate rather than wrap
    overview.total_questions = overview.total_questions.saturating_add(record.total_questions);
    overview.total_active_days = overview
        .total_active_days
        .saturating_add(record.total_active_days);

    for (topic, count) in &record.topic_wise_solved {
        let tally = overview.topic_wise.entry(topic.clone()).or_insert(0);
        *tally = tally.saturating_add(*count);
    }

    for (label, count) in &record.difficulty_wise_solved {
        let buckets = &mut overview.difficulty_wise;
        match Difficulty::from_label(label) {
            Some(Difficulty::Easy) => buckets.easy = buckets.easy.saturating_add(*count),
            Some(Difficulty::Medium) => buckets.medium = buckets.medium.saturating_add(*count),
            Some(Difficulty::Hard) => buckets.hard = buckets.hard.saturating_add(*count),
            None => debug!("Ignoring unrecognized difficulty label: {}", label),
        }
    }

    let summary = overview.contest_stats.entry(platform).or_default();
    summary.total_contests = summary.total_contests.saturating_add(record.total_contests);
    summary.rating = summary.rating.max(record.rating);
    if let Some(place) = record.contest_ranking {
        summary.ranking = match summary.ranking {
            Ranking::Ranked(best) => Ranking::Ranked(best.min(place)),
            Ranking::Unranked => Ranking::Ranked(place),
        };
    }

    for point in &record.rating_history {
        overview.rating_history.push(RatingSample {
            date: point.date.clone(),
            rating: point.rating,
            platform,
        });
    }
}
