//! Application layer for legion
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionConfig;
pub use ports::{
    actor_store::{ActorStore, NoStore, StoreError},
    conversation_logger::{
        ConversationEvent, ConversationLogger, EventKind, NoConversationLogger,
    },
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    random::RandomSource,
    speech::{NoSpeech, SpeechPort},
};
pub use use_cases::actor_runtime::ActorRuntime;
pub use use_cases::judge_panel::{JudgePanel, PanelDecision};
pub use use_cases::pool_manager::{PoolChange, PoolManager};
pub use use_cases::run_panel_summary::{PanelVerdict, RunPanelError, RunPanelSummary};
pub use use_cases::run_round::{RoundOutcome, RunRoundUseCase};
pub use use_cases::session::{
    InputRoute, LegionSession, PANEL_PREFIX, RoundReport, SessionError, SessionReply,
    route_input,
};
