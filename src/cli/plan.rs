use colored::Colorize;

use super::{access_token, identity_client};
use crate::{
    backend::{BackendClient, practice_plan::youtube_resources},
    error,
    error::CoachError,
    types::{PracticePlan, PracticePlanRequest, SkillLevel},
    utils,
};

const PLAN_FAILED: &str = "Failed to generate practice plan.";

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub song: String,
    pub artist: Option<String>,
    pub minutes: u32,
    pub days: u32,
    pub goals: String,
    pub struggles: String,
    pub skill_level: Option<SkillLevel>,
}

pub async fn plan(opts: PlanOptions) {
    let mut request = match PracticePlanRequest::from_input(
        &opts.song,
        opts.artist.as_deref(),
        opts.minutes,
        opts.days,
        &opts.goals,
        &opts.struggles,
    ) {
        Ok(request) => request,
        Err(e) => error!("{}", e),
    };
    request.skill_level = opts.skill_level;

    let token = access_token(&identity_client()).await;
    let backend = BackendClient::from_config();

    let pb = utils::spinner("Generating practice plan...");
    let result = backend.practice_plan(&token, &request).await;
    pb.finish_and_clear();

    match result {
        Ok(plan) => print_plan(&plan),
        Err(e) => {
            tracing::error!(error = %e, "practice plan request failed");
            error!("{}", plan_error_message(&e))
        }
    }
}

/// Backend `detail` when there is one, the generic message otherwise.
pub fn plan_error_message(e: &CoachError) -> String {
    match e {
        CoachError::Backend { message, .. } if !message.trim().is_empty() => message.clone(),
        _ => PLAN_FAILED.to_string(),
    }
}

fn print_plan(plan: &PracticePlan) {
    if let Some(focus) = plan.focus_summary.as_deref() {
        println!("{}\n{}\n", "Focus".bold(), focus);
    }

    let resources = youtube_resources(plan);
    if !resources.is_empty() {
        println!("{}", "YouTube Resources".bold());
        for r in resources {
            let title = r.title.as_deref().unwrap_or(&r.url);
            match r.why.as_deref() {
                Some(why) => println!("  - {} ({}): {}", title, r.url, why),
                None => println!("  - {} ({})", title, r.url),
            }
        }
        println!();
    }

    if !plan.next_steps.is_empty() {
        println!("{}", "Next Steps".bold());
        for step in &plan.next_steps {
            println!("  - {}", step);
        }
        println!();
    }

    if !plan.plan.is_empty() {
        println!("{}", "Plan".bold());
        match serde_json::to_string_pretty(&plan.plan) {
            Ok(raw) => println!("{}", raw),
            Err(e) => tracing::warn!(error = %e, "cannot format plan"),
        }
    }
}
