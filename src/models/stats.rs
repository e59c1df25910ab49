// Per-platform statistics models
// Upstream payloads are inconsistent about types and missing fields, so
// decoding is lenient: bad fields default, they never fail the record

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::models::platform::Platform;
use crate::utils::coerce;

/// One point of a platform's rating timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingPoint {
    pub date: String,
    pub rating: u64,
}

/// Normalized statistics for a single platform
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatsRecord {
    pub total_questions: u64,
    pub total_active_days: u64,
    pub total_contests: u64,
    pub rating: u64,
    pub contest_ranking: Option<u64>,
    pub topic_wise_solved: HashMap<String, u64>,
    pub difficulty_wise_solved: HashMap<String, u64>,
    pub rating_history: Vec<RatingPoint>,
}

impl PlatformStatsRecord {
    /// Decode a raw stats payload. Counts accept numbers or numeric
    /// strings; a non-object value yields the default record.
    ///
    /// The backend reports contestRanking 0 for users who never entered
    /// a contest, so 0 maps to None alongside a missing field.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }

        let rating_history = value
            .get("ratingHistory")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let date = coerce::opt_field_str(entry, "date")?;
                        Some(RatingPoint {
                            date,
                            rating: coerce::field_u64(entry, "rating"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            total_questions: coerce::field_u64(value, "totalQuestions"),
            total_active_days: coerce::field_u64(value, "totalActiveDays"),
            total_contests: coerce::field_u64(value, "totalContests"),
            rating: coerce::field_u64(value, "rating"),
            contest_ranking: coerce::opt_field_u64(value, "contestRanking")
                .filter(|ranking| *ranking > 0),
            topic_wise_solved: coerce::field_count_map(value, "topicWiseSolved"),
            difficulty_wise_solved: coerce::field_count_map(value, "difficultyWiseSolved"),
            rating_history,
        }
    }
}

/// A user's per-platform statistics, one explicit slot per platform.
/// A platform the user never linked is None, never a zeroed record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileBundle {
    pub leetcode: Option<PlatformStatsRecord>,
    pub codeforces: Option<PlatformStatsRecord>,
    pub codechef: Option<PlatformStatsRecord>,
    pub atcoder: Option<PlatformStatsRecord>,
    pub geeksforgeeks: Option<PlatformStatsRecord>,
    pub hackerrank: Option<PlatformStatsRecord>,
    pub github: Option<PlatformStatsRecord>,
}

impl ProfileBundle {
    pub fn get(&self, platform: Platform) -> Option<&PlatformStatsRecord> {
        match platform {
            Platform::Leetcode => self.leetcode.as_ref(),
            Platform::Codeforces => self.codeforces.as_ref(),
            Platform::Codechef => self.codechef.as_ref(),
            Platform::Atcoder => self.atcoder.as_ref(),
            Platform::Geeksforgeeks => self.geeksforgeeks.as_ref(),
            Platform::Hackerrank => self.hackerrank.as_ref(),
            Platform::Github => self.github.as_ref(),
        }
    }

    pub fn set(&mut self, platform: Platform, record: PlatformStatsRecord) {
        let slot = match platform {
            Platform::Leetcode => &mut self.leetcode,
            Platform::Codeforces => &mut self.codeforces,
            Platform::Codechef => &mut self.codechef,
            Platform::Atcoder => &mut self.atcoder,
            Platform::Geeksforgeeks => &mut self.geeksforgeeks,
            Platform::Hackerrank => &mut self.hackerrank,
            Platform::Github => &mut self.github,
        };
        *slot = Some(record);
    }

    /// Present platforms with their records, in display order
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &PlatformStatsRecord)> {
        Platform::ALL
            .iter()
            .filter_map(move |platform| self.get(*platform).map(|record| (*platform, record)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Decode a profile payload by picking out the per-platform stats
    /// fields. Profile metadata (name, email, usernames) is skipped, as
    /// is any stats field for a platform the dashboard does not track.
    pub fn from_value(value: &Value) -> Self {
        let mut bundle = Self::default();
        let Some(map) = value.as_object() else {
            return bundle;
        };

        for (key, raw) in map {
            match Platform::from_bundle_key(key) {
                Some(platform) => {
                    if raw.is_object() {
                        bundle.set(platform, PlatformStatsRecord::from_value(raw));
                    } else {
                        debug!("Ignoring non-object stats payload under {}", key);
                    }
                }
                None => {
                    if key.to_lowercase().ends_with("stats") {
                        debug!("Ignoring stats for unrecognized platform: {}", key);
                    }
                }
            }
        }
        bundle
    }
}

/// GitHub activity summary from the dedicated stats endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubStats {
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub total_stars: u64,
    pub total_contributions: u64,
    pub total_active_days: u64,
    pub current_streak: u64,
    pub max_streak: u64,
    pub prs: u64,
    pub issues: u64,
    pub commits: u64,
    /// Language name to usage percentage
    pub languages: HashMap<String, f64>,
    pub contribution_calendar: Vec<ContributionDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionDay {
    pub date: String,
    pub count: u64,
}

impl GithubStats {
    /// Decode with the same lenient rules as platform stats; calendar
    /// entries without a date are dropped
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }

        let languages = value
            .get("languages")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(name, share)| {
                        coerce::num_f64(share).map(|pct| (name.clone(), pct))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let contribution_calendar = value
            .get("contributionCalendar")
            .and_then(Value::as_array)
            .map(|days| {
                days.iter()
                    .filter_map(|day| {
                        let date = coerce::opt_field_str(day, "date")?;
                        Some(ContributionDay {
                            date,
                            count: coerce::field_u64(day, "count"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            public_repos: coerce::field_u64(value, "publicRepos"),
            followers: coerce::field_u64(value, "followers"),
            following: coerce::field_u64(value, "following"),
            total_stars: coerce::field_u64(value, "totalStars"),
            total_contributions: coerce::field_u64(value, "totalContributions"),
            total_active_days: coerce::field_u64(value, "totalActiveDays"),
            current_streak: coerce::field_u64(value, "currentStreak"),
            max_streak: coerce::field_u64(value, "maxStreak"),
            prs: coerce::field_u64(value, "prs"),
            issues: coerce::field_u64(value, "issues"),
            commits: coerce::field_u64(value, "commits"),
            languages,
            contribution_calendar,
        }
    }
}
