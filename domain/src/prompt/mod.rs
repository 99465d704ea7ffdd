//! Prompt domain
//!
//! Fixed prompt texts and templates used by the recipes.

mod template;

pub use template::PromptTemplate;
