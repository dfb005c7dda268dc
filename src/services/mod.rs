pub mod deepl_translator;
pub mod llm_translator;
pub mod translator;

pub use deepl_translator::{DeeplSettings, DeeplTranslator};
pub use llm_translator::LlmTranslator;
pub use translator::{IdentityTranslator, Translator};
