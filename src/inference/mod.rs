pub mod provider;
pub mod providers;
pub mod text;

pub use provider::{CompletionProvider, ProviderError};
pub use providers::GeminiProvider;
pub use text::strip_bold_markers;
