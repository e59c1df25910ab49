// Practice API service
// DSA and aptitude question banks behind the practice endpoints

use reqwest::Method;
use serde_json::Value;

use crate::api::client::{FetchError, ResilientClient};
use crate::models::question::{Difficulty, DsaQuestion, PracticeQuestion};

#[derive(Debug, Clone)]
pub struct PracticeService {
    client: ResilientClient,
    base_url: String,
}

impl PracticeService {
    pub fn new(client: ResilientClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn dsa_url(&self, tail: &str) -> String {
        format!("{}/practice/dsa-questions{}", self.base_url, tail)
    }

    fn aptitude_url(&self, tail: &str) -> String {
        format!("{}/practice/aptitude-questions{}", self.base_url, tail)
    }

    /// Tags travel as one comma-joined path segment
    fn tags_segment(tags: &[&str]) -> String {
        format!("/tags/{}", urlencoding::encode(&tags.join(",")))
    }

    async fn fetch(&self, url: String) -> Result<Value, FetchError> {
        let descriptor = self.client.request(Method::GET, url);
        self.client.send(&descriptor).await
    }

    pub async fn dsa_questions(&self) -> Result<Vec<DsaQuestion>, FetchError> {
        let payload = self.fetch(self.dsa_url("")).await?;
        Ok(decode_list(&payload, DsaQuestion::from_value))
    }

    pub async fn dsa_question(&self, id: u64) -> Result<DsaQuestion, FetchError> {
        let payload = self.fetch(self.dsa_url(&format!("/{}", id))).await?;
        Ok(DsaQuestion::from_value(&payload))
    }

    pub async fn dsa_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> Result<Vec<DsaQuestion>, FetchError> {
        let payload = self
            .fetch(self.dsa_url(&format!("/difficulty/{}", difficulty.as_str())))
            .await?;
        Ok(decode_list(&payload, DsaQuestion::from_value))
    }

    pub async fn dsa_by_tags(&self, tags: &[&str]) -> Result<Vec<DsaQuestion>, FetchError> {
        let payload = self.fetch(self.dsa_url(&Self::tags_segment(tags))).await?;
        Ok(decode_list(&payload, DsaQuestion::from_value))
    }

    /// Create a question; returns the stored entity
    pub async fn add_dsa_question(&self, question: Value) -> Result<DsaQuestion, FetchError> {
        let descriptor = self
            .client
            .request(Method::POST, self.dsa_url(""))
            .body(question);
        let payload = self.client.send(&descriptor).await?;
        Ok(DsaQuestion::from_value(&payload))
    }

    pub async fn delete_dsa_question(&self, id: u64) -> Result<(), FetchError> {
        let descriptor = self
            .client
            .request(Method::DELETE, self.dsa_url(&format!("/{}", id)));
        self.client.send(&descriptor).await?;
        Ok(())
    }

    pub async fn aptitude_questions(&self) -> Result<Vec<PracticeQuestion>, FetchError> {
        let payload = self.fetch(self.aptitude_url("")).await?;
        Ok(decode_list(&payload, PracticeQuestion::from_value))
    }

    pub async fn aptitude_question(&self, id: u64) -> Result<PracticeQuestion, FetchError> {
        let payload = self.fetch(self.aptitude_url(&format!("/{}", id))).await?;
        Ok(PracticeQuestion::from_value(&payload))
    }

    pub async fn aptitude_by_tags(
        &self,
        tags: &[&str],
    ) -> Result<Vec<PracticeQuestion>, FetchError> {
        let payload = self
            .fetch(self.aptitude_url(&Self::tags_segment(tags)))
            .await?;
        Ok(decode_list(&payload, PracticeQuestion::from_value))
    }

    pub async fn add_aptitude_question(
        &self,
        question: Value,
    ) -> Result<PracticeQuestion, FetchError> {
        let descriptor = self
            .client
            .request(Method::POST, self.aptitude_url(""))
            .body(question);
        let payload = self.client.send(&descriptor).await?;
        Ok(PracticeQuestion::from_value(&payload))
    }

    pub async fn delete_aptitude_question(&self, id: u64) -> Result<(), FetchError> {
        let descriptor = self
            .client
            .request(Method::DELETE, self.aptitude_url(&format!("/{}", id)));
        self.client.send(&descriptor).await?;
        Ok(())
    }
}

fn decode_list<T>(payload: &Value, decode: fn(&Value) -> T) -> Vec<T> {
    payload
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter(|item| item.is_object())
                .map(decode)
                .collect()
        })
        .unwrap_or_default()
}
