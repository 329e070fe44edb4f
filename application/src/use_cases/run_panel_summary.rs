//! Panel summary use case
//!
//! Instead of a conversation round, every judge answers the question in its
//! own voice and a final call condenses the answers into one verdict.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::actor_runtime::ActorRuntime;
use crate::use_cases::shared::complete_with_timeout;
use legion_domain::{Actor, Message, PromptTemplate};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RunPanelError {
    #[error("Question is empty")]
    EmptyQuestion,

    #[error("No judge answered")]
    NoAnswers,

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(#[from] GatewayError),
}

/// Judges' answers and the combined verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelVerdict {
    pub question: String,
    /// `(judge, answer)` in judge order, failed judges omitted
    pub answers: Vec<(String, String)>,
    pub verdict: String,
}

pub struct RunPanelSummary<G: LlmGateway + 'static> {
    runtime: ActorRuntime<G>,
    judges: Vec<Actor>,
}

impl<G: LlmGateway + 'static> RunPanelSummary<G> {
    pub fn new(runtime: ActorRuntime<G>, judges: Vec<Actor>) -> Self {
        Self { runtime, judges }
    }

    pub async fn execute(
        &self,
        question: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<PanelVerdict, RunPanelError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RunPanelError::EmptyQuestion);
        }

        let mut join_set = JoinSet::new();
        for (index, judge) in self.judges.iter().enumerate() {
            let runtime = self.runtime.clone();
            let judge = judge.clone();
            let question = question.to_string();
            join_set.spawn(async move {
                let result = runtime.answer(&judge, &question).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<String>> = vec![None; self.judges.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, Ok(answer))) => slots[index] = Some(answer),
                Ok((index, Err(e))) => {
                    let name = self.judges[index].real_name();
                    warn!("Judge {} failed: {}", name, e);
                    progress.on_warning(&format!("{} unavailable: {}", name, e));
                }
                Err(e) => warn!("Task join error: {}", e),
            }
        }

        let answers: Vec<(String, String)> = self
            .judges
            .iter()
            .zip(slots)
            .filter_map(|(judge, slot)| slot.map(|a| (judge.real_name().to_string(), a)))
            .collect();
        if answers.is_empty() {
            return Err(RunPanelError::NoAnswers);
        }
        for (judge, answer) in &answers {
            progress.on_panel_response(judge, answer);
        }

        let prompt = PromptTemplate::panel_synthesis(question, &answers);
        let verdict = complete_with_timeout(
            self.runtime.gateway().as_ref(),
            &[Message::user(prompt)],
            self.runtime.timeout(),
        )
        .await?;
        info!("Panel answered with {} judges", answers.len());

        Ok(PanelVerdict {
            question: question.to_string(),
            answers,
            verdict,
        })
    }
}
