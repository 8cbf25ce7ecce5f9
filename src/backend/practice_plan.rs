use reqwest::Url;

use super::{BackendClient, ensure_success};
use crate::{
    error::CoachError,
    types::{PlanResource, PracticePlan, PracticePlanRequest},
};

const YOUTUBE_DOMAINS: [&str; 3] = ["youtube.com", "www.youtube.com", "youtu.be"];
const MAX_RESOURCES: usize = 3;

impl BackendClient {
    pub async fn practice_plan(
        &self,
        token: &str,
        request: &PracticePlanRequest,
    ) -> Result<PracticePlan, CoachError> {
        let response = self
            .http
            .post(self.url("/api/practice-plan"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(response.json::<PracticePlan>().await?)
    }
}

pub fn is_youtube_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| YOUTUBE_DOMAINS.contains(&host.as_str()))
}

/// YouTube resources of a plan, at most three.
pub fn youtube_resources(plan: &PracticePlan) -> Vec<&PlanResource> {
    plan.resources
        .iter()
        .filter(|r| is_youtube_url(&r.url))
        .take(MAX_RESOURCES)
        .collect()
}

/// Splits a comma-separated list, dropping blank entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl PracticePlanRequest {
    /// Builds a request from raw form input.
    ///
    /// The song title is required; the artist is dropped when blank.
    pub fn from_input(
        song_title: &str,
        artist: Option<&str>,
        minutes_per_day: u32,
        days_per_week: u32,
        goals: &str,
        struggles: &str,
    ) -> Result<Self, CoachError> {
        let song_title = song_title.trim();
        if song_title.is_empty() {
            return Err(CoachError::InvalidInput("song title is required".to_string()));
        }
        if days_per_week == 0 || days_per_week > 7 {
            return Err(CoachError::InvalidInput(format!(
                "days per week must be between 1 and 7, got {}",
                days_per_week
            )));
        }
        if minutes_per_day == 0 {
            return Err(CoachError::InvalidInput(
                "minutes per day must be positive".to_string(),
            ));
        }

        Ok(Self {
            song_title: song_title.to_string(),
            artist: artist
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            minutes_per_day,
            days_per_week,
            goals: split_list(goals),
            struggles: split_list(struggles),
            skill_level: None,
        })
    }
}
