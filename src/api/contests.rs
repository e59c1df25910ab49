// Contest API service
// Upcoming and active contest feeds, fetched independently so one
// failing side never blanks the other

use reqwest::Method;
use serde::Serialize;
use tracing::warn;

use crate::api::client::{FetchError, ResilientClient};
use crate::models::contest::{decode_contest_list, sort_by_start, Contest};

/// Both contest feeds side by side, ready for the dashboard
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContestBoard {
    pub upcoming: Vec<Contest>,
    pub active: Vec<Contest>,
}

#[derive(Debug, Clone)]
pub struct ContestService {
    client: ResilientClient,
    base_url: String,
}

impl ContestService {
    pub fn new(client: ResilientClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn feed_url(&self, segment: &str) -> String {
        format!("{}/api/contests/{}", self.base_url, segment)
    }

    async fn fetch_feed(&self, segment: &str) -> Result<Vec<Contest>, FetchError> {
        let descriptor = self.client.request(Method::GET, self.feed_url(segment));
        let payload = self.client.send(&descriptor).await?;
        let mut contests = decode_contest_list(&payload);
        sort_by_start(&mut contests);
        Ok(contests)
    }

    /// Contests that have not started yet, soonest first
    pub async fn upcoming(&self) -> Result<Vec<Contest>, FetchError> {
        self.fetch_feed("upcoming").await
    }

    /// Contests currently running
    pub async fn active(&self) -> Result<Vec<Contest>, FetchError> {
        self.fetch_feed("active").await
    }

    /// Fetch both feeds concurrently. A failed side degrades to an
    /// empty list instead of failing the whole board.
    pub async fn board(&self) -> ContestBoard {
        let (upcoming, active) = tokio::join!(self.upcoming(), self.active());

        ContestBoard {
            upcoming: upcoming.unwrap_or_else(|error| {
                warn!("Failed to fetch upcoming contests: {}", error);
                Vec::new()
            }),
            active: active.unwrap_or_else(|error| {
                warn!("Failed to fetch active contests: {}", error);
                Vec::new()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_urls() {
        let client = ResilientClient::new().unwrap();
        let service = ContestService::new(client, "http://localhost:8080");
        assert_eq!(
            service.feed_url("upcoming"),
            "http://localhost:8080/api/contests/upcoming"
        );
        assert_eq!(
            service.feed_url("active"),
            "http://localhost:8080/api/contests/active"
        );
    }

    #[test]
    fn test_board_serializes_both_feeds() {
        let board = ContestBoard::default();
        let json = serde_json::to_value(&board).unwrap();
        assert!(json["upcoming"].as_array().unwrap().is_empty());
        assert!(json["active"].as_array().unwrap().is_empty());
    }
}
