//! Prompt domain
//!
//! Every string sent to the generation backend is built here.

mod template;

pub use template::PromptTemplate;
