// Profile API service
// Fetches per-user platform stats from the backend and folds them
// into the aggregated overview

use futures::future::join_all;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, warn};

use crate::api::client::{FetchError, ResilientClient};
use crate::features::overview::{aggregate, AggregatedOverview};
use crate::models::platform::Platform;
use crate::models::stats::{GithubStats, PlatformStatsRecord, ProfileBundle};

#[derive(Debug, Clone)]
pub struct ProfileService {
    client: ResilientClient,
    base_url: String,
}

impl ProfileService {
    pub fn new(client: ResilientClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn profile_url(&self, user_id: &str) -> String {
        format!("{}/api/profiles/{}", self.base_url, urlencoding::encode(user_id))
    }

    /// Fetch the user's profile document with every platform's stats.
    /// Email and display name ride along as query parameters so the
    /// backend can create the profile on first sight.
    pub async fn get_profile(
        &self,
        user_id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<ProfileBundle, FetchError> {
        let mut url = self.profile_url(user_id);
        let mut params = Vec::new();
        if let Some(email) = email {
            params.push(format!("email={}", urlencoding::encode(email)));
        }
        if let Some(name) = name {
            params.push(format!("name={}", urlencoding::encode(name)));
        }
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }

        let descriptor = self.client.request(Method::GET, url);
        let payload = self.client.send(&descriptor).await?;
        Ok(ProfileBundle::from_value(&payload))
    }

    /// Stats for a single platform. The backend has no per-platform
    /// route for GitHub; those stats come from get_github_stats.
    pub async fn get_platform_stats(
        &self,
        user_id: &str,
        platform: Platform,
    ) -> Result<PlatformStatsRecord, FetchError> {
        let url = format!("{}/{}", self.profile_url(user_id), platform.as_str());
        let descriptor = self.client.request(Method::GET, url);
        let payload = self.client.send(&descriptor).await?;
        Ok(PlatformStatsRecord::from_value(&payload))
    }

    /// GitHub stats live on their own endpoint with a richer shape
    pub async fn get_github_stats(&self, user_id: &str) -> Result<GithubStats, FetchError> {
        let url = format!("{}/github/stats", self.profile_url(user_id));
        let descriptor = self.client.request(Method::GET, url);
        let payload = self.client.send(&descriptor).await?;
        Ok(GithubStats::from_value(&payload))
    }

    /// Point the profile at a different username on one platform. The
    /// backend re-syncs that platform's stats as a side effect.
    pub async fn update_platform_username(
        &self,
        user_id: &str,
        platform: Platform,
        username: &str,
    ) -> Result<(), FetchError> {
        let url = format!("{}/{}", self.profile_url(user_id), platform.as_str());
        let descriptor = self
            .client
            .request(Method::PUT, url)
            .body(json!({ "username": username }));
        self.client.send(&descriptor).await?;
        Ok(())
    }

    /// Profile fetch plus aggregation in one call
    pub async fn get_overview(&self, user_id: &str) -> Result<AggregatedOverview, FetchError> {
        let bundle = self.get_profile(user_id, None, None).await?;
        Ok(aggregate(&bundle))
    }

    /// Platforms served by the per-platform stats route. GitHub is
    /// routed away because only the github/stats endpoint serves it.
    fn bundle_targets(platforms: &[Platform]) -> Vec<Platform> {
        let mut targets = Vec::with_capacity(platforms.len());
        for &platform in platforms {
            if platform == Platform::Github {
                debug!("Skipping github stats fetch; served by the github/stats endpoint");
            } else {
                targets.push(platform);
            }
        }
        targets
    }

    /// Fetch several platforms concurrently. Platforms that fail are
    /// logged and skipped so one flaky upstream does not sink the rest.
    /// GitHub never issues a fetch here; see get_github_stats.
    pub async fn collect_bundle(&self, user_id: &str, platforms: &[Platform]) -> ProfileBundle {
        let fetches = Self::bundle_targets(platforms)
            .into_iter()
            .map(|platform| async move {
                (platform, self.get_platform_stats(user_id, platform).await)
            });

        let mut bundle = ProfileBundle::default();
        for (platform, outcome) in join_all(fetches).await {
            match outcome {
                Ok(record) => bundle.set(platform, record),
                Err(error) => {
                    warn!("Skipping {} stats for {}: {}", platform, user_id, error);
                }
            }
        }
        debug!(
            "Collected stats for {} platform(s) for {}",
            bundle.iter().count(),
            user_id
        );
        bundle
    }
}
