//! LLM-backed Policy Advisor client (spec §4.4).
//!
//! Calls an external chat-completions-style endpoint, tries an ordered list
//! of model names until one responds, and enforces a soft timeout. Any
//! failure surfaces as [`PolicyError`], which the caller is expected to
//! treat as "fall back to formula" rather than propagate — see
//! [`crate::policy::FormulaAdvisor`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::policy::types::{AllocationPlan, GoalTargetContext, GoalTargetRecommendation, PolicyContext};
use crate::policy::{PolicyAdvisor, PolicyError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const QUOTA_COOLDOWN: Duration = Duration::from_secs(300);

/// LLM advisor backed by an OpenAI-compatible chat-completions endpoint.
/// Tries `models` in order, stopping at the first successful, parseable
/// response. A quota/rate-limit error poisons `cooldown_until` for
/// [`QUOTA_COOLDOWN`], during which every call short-circuits to
/// [`PolicyError::QuotaExhausted`] without making a request (spec §4.4).
pub struct LlmPolicyAdvisor {
    client: Client,
    endpoint: String,
    api_key: String,
    models: Vec<String>,
    cooldown_until_epoch_secs: Arc<AtomicI64>,
}

impl LlmPolicyAdvisor {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            models,
            cooldown_until_epoch_secs: Arc::new(AtomicI64::new(0)),
        }
    }

    fn in_cooldown(&self, now_epoch_secs: i64) -> bool {
        self.cooldown_until_epoch_secs.load(Ordering::Relaxed) > now_epoch_secs
    }

    fn poison_cooldown(&self, now_epoch_secs: i64) {
        self.cooldown_until_epoch_secs
            .store(now_epoch_secs + QUOTA_COOLDOWN.as_secs() as i64, Ordering::Relaxed);
    }

    /// Send one chat-completion request for `model` and return the raw
    /// message content. Callers parse the content into whatever shape
    /// they're asking for (an [`AllocationPlan`] or a
    /// [`GoalTargetRecommendation`]).
    async fn send_chat_request(&self, model: &str, prompt: &str) -> Result<String, PolicyError> {
        let body = json!({
            "model": model,
            "messages": [
                {"role": "system", "content": "You are a personal finance allocation assistant. Respond with strict JSON only."},
                {"role": "user", "content": prompt},
            ],
            "response_format": {"type": "json_object"},
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.status().map(|s| s.as_u16()) == Some(429) {
                    PolicyError::QuotaExhausted
                } else if e.is_timeout() {
                    PolicyError::Timeout
                } else {
                    PolicyError::Transport(e.to_string())
                }
            })?;

        if response.status().as_u16() == 429 {
            return Err(PolicyError::QuotaExhausted);
        }
        if !response.status().is_success() {
            return Err(PolicyError::Transport(format!("status {}", response.status())));
        }

        let parsed: ChatCompletion = response
            .json()
            .await
            .map_err(|e| PolicyError::BadResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| PolicyError::BadResponse("no choices in response".to_string()))
    }

    async fn try_model(&self, model: &str, prompt: &str) -> Result<AllocationPlan, PolicyError> {
        let content = self.send_chat_request(model, prompt).await?;
        serde_json::from_str::<AllocationPlan>(&content).map_err(|e| PolicyError::BadResponse(e.to_string()))
    }

    async fn try_model_for_targets(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GoalTargetRecommendation, PolicyError> {
        let content = self.send_chat_request(model, prompt).await?;
        serde_json::from_str::<GoalTargetRecommendation>(&content)
            .map_err(|e| PolicyError::BadResponse(e.to_string()))
    }

    fn build_prompt(ctx: &PolicyContext<'_>) -> String {
        let goal_lines: Vec<String> = ctx
            .active_goals
            .iter()
            .map(|g| format!("- id={} name={} target={} saved={}", g.id, g.name, g.target, g.saved))
            .collect();
        format!(
            "Income amount: {}\nActive goals:\n{}\nPropose an allocation plan as JSON matching the AllocationPlan schema.",
            ctx.income_amount,
            goal_lines.join("\n")
        )
    }

    fn build_target_prompt(ctx: &GoalTargetContext) -> String {
        format!(
            "Average monthly income: {}\nAverage monthly expenses: {}\n\
             Formula emergency fund target: {}\nFormula savings goal 1 target: {}\n\
             Formula savings goal 2 target: {}\n\
             Propose refined integer targets as JSON matching the GoalTargetRecommendation \
             schema, keeping the emergency fund target between 10000 and 12x average monthly \
             expenses, and each savings goal target between its formula minimum and 6x average \
             monthly income.",
            ctx.avg_monthly_income,
            ctx.avg_monthly_expenses,
            ctx.formula_emergency_target,
            ctx.formula_savings_goal_1_target,
            ctx.formula_savings_goal_2_target,
        )
    }
}

#[async_trait]
impl PolicyAdvisor for LlmPolicyAdvisor {
    async fn propose_plan(&self, ctx: &PolicyContext<'_>) -> Result<AllocationPlan, PolicyError> {
        let now_epoch_secs = ctx.now.timestamp();
        if self.in_cooldown(now_epoch_secs) {
            warn!("policy advisor in quota cooldown, skipping request");
            return Err(PolicyError::QuotaExhausted);
        }

        let prompt = Self::build_prompt(ctx);
        let mut last_err = PolicyError::BadResponse("no models configured".to_string());

        for model in &self.models {
            match self.try_model(model, &prompt).await {
                Ok(plan) => return Ok(plan),
                Err(PolicyError::QuotaExhausted) => {
                    self.poison_cooldown(now_epoch_secs);
                    error!(model, "policy advisor quota exhausted");
                    return Err(PolicyError::QuotaExhausted);
                }
                Err(err) => {
                    warn!(model, error = %err, "policy advisor model failed, trying next");
                    last_err = err;
                }
            }
        }

        Err(last_err)
    }

    async fn refine_goal_targets(
        &self,
        ctx: &GoalTargetContext,
    ) -> Result<GoalTargetRecommendation, PolicyError> {
        let now_epoch_secs = chrono::Utc::now().timestamp();
        if self.in_cooldown(now_epoch_secs) {
            warn!("policy advisor in quota cooldown, skipping goal target refinement request");
            return Err(PolicyError::QuotaExhausted);
        }

        let prompt = Self::build_target_prompt(ctx);
        let mut last_err = PolicyError::BadResponse("no models configured".to_string());

        for model in &self.models {
            match self.try_model_for_targets(model, &prompt).await {
                Ok(recommendation) => return Ok(recommendation),
                Err(PolicyError::QuotaExhausted) => {
                    self.poison_cooldown(now_epoch_secs);
                    error!(model, "policy advisor quota exhausted");
                    return Err(PolicyError::QuotaExhausted);
                }
                Err(err) => {
                    warn!(model, error = %err, "policy advisor model failed, trying next");
                    last_err = err;
                }
            }
        }

        Err(last_err)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize, Serialize)]
struct ChatMessage {
    content: String,
}
