// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LLM-backed content ideas and post optimization.
//!
//! Every public method succeeds: on any failure (or with no API key
//! configured) the caller gets a fixed fallback payload instead.

use crate::config::Config;
use crate::models::{ContentIdea, ProfileData};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const LLM_TIMEOUT: Duration = Duration::from_secs(30);
const IDEA_CATEGORIES: &[&str] = &["insight", "how-to", "story", "opinion"];

/// Rewritten post plus improvement tips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedPost {
    pub optimized_content: String,
    pub suggestions: Vec<String>,
    pub estimated_improvement: String,
}

/// The model answers either `{"ideas": [...]}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdeasEnvelope {
    Wrapped { ideas: Vec<ContentIdea> },
    Bare(Vec<ContentIdea>),
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct ContentGenerator {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl ContentGenerator {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(LLM_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
        })
    }

    /// Post ideas tailored to the account's profile metrics.
    pub async fn generate_ideas(&self, profile: &ProfileData) -> Vec<ContentIdea> {
        let profile_json = serde_json::to_string_pretty(profile).unwrap_or_default();
        let prompt = format!(
            "As a LinkedIn content creation expert, generate {count} engaging post ideas for a \
             professional in the technology industry.\n\n\
             User profile summary:\n{profile_json}\n\n\
             For each content idea:\n\
             1. Create a compelling title that captures attention\n\
             2. Write a detailed content outline (150-200 words) that could be expanded into a full post\n\
             3. Categorize it as one of: {categories}\n\
             4. Estimate the engagement level as: \"low\", \"medium\", \"high\", or \"very-high\"\n\
             5. Use a professional tone that's appropriate for LinkedIn\n\n\
             Respond with a JSON object {{\"ideas\": [{{\"title\": string, \"content\": string, \
             \"category\": string, \"estimatedEngagement\": string}}]}}",
            count = IDEA_CATEGORIES.len(),
            categories = IDEA_CATEGORIES.join(", "),
        );

        match self.complete_json::<IdeasEnvelope>(&prompt).await {
            Ok(IdeasEnvelope::Wrapped { ideas }) | Ok(IdeasEnvelope::Bare(ideas))
                if !ideas.is_empty() =>
            {
                ideas
            }
            Ok(_) => {
                tracing::warn!("Content generator returned no ideas, using fallback");
                fallback_ideas()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Content idea generation failed, using fallback");
                fallback_ideas()
            }
        }
    }

    /// Rewrite `content` for the given goal (`engagement` when unset).
    pub async fn optimize_post(&self, content: &str, goal: Option<&str>) -> OptimizedPost {
        let goal = goal.filter(|g| !g.trim().is_empty()).unwrap_or("engagement");
        let prompt = format!(
            "As a LinkedIn content optimization expert, improve the following post to maximize {goal}:\n\n\
             Original post:\n\"{content}\"\n\n\
             1. Rewrite the post to be more engaging and professional\n\
             2. Provide 3 specific suggestions to further improve the content\n\
             3. Estimate the potential improvement in engagement (as a percentage)\n\n\
             Respond with a JSON object {{\"optimizedContent\": string, \"suggestions\": string[], \
             \"estimatedImprovement\": string}}"
        );

        match self.complete_json::<OptimizedPost>(&prompt).await {
            Ok(optimized) => optimized,
            Err(e) => {
                tracing::warn!(error = %e, goal, "Post optimization failed, using fallback");
                fallback_optimization(content)
            }
        }
    }

    /// One chat completion in JSON mode, parsed into `T`.
    async fn complete_json<T: for<'de> Deserialize<'de>>(&self, prompt: &str) -> anyhow::Result<T> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no LLM API key configured"))?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": {"type": "json_object"},
        });

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LLM API returned {}: {}", status, body);
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("LLM response has no content"))?;

        Ok(serde_json::from_str(&content)?)
    }
}

/// Static ideas served whenever generation is unavailable.
pub fn fallback_ideas() -> Vec<ContentIdea> {
    let idea = |title: &str, content: &str, category: &str, engagement: &str| ContentIdea {
        title: title.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        estimated_engagement: engagement.to_string(),
    };

    vec![
        idea(
            "Industry Insights",
            "5 Ways AI is Transforming Marketing Strategy in 2023 - My Experience Implementing These Changes",
            "insight",
            "high",
        ),
        idea(
            "Personal Story",
            "The Career Pivot That Changed Everything: How I Went From [Previous Role] to [Current Role] in 12 Months",
            "story",
            "medium",
        ),
        idea(
            "How-To Guide",
            "LinkedIn Engagement Hack: How I Increased My Post Visibility by 300% Using This Simple 3-Step Process",
            "how-to",
            "very-high",
        ),
        idea(
            "Opinion Piece",
            "Why I Believe [Industry Trend] Is Overrated - And What We Should Focus On Instead",
            "opinion",
            "high",
        ),
    ]
}

fn fallback_optimization(content: &str) -> OptimizedPost {
    OptimizedPost {
        optimized_content: content.to_string(),
        suggestions: vec![
            "Add a compelling hook in the first sentence".to_string(),
            "Include 2-3 relevant hashtags".to_string(),
            "End with a question to encourage comments".to_string(),
        ],
        estimated_improvement: "15-20%".to_string(),
    }
}
