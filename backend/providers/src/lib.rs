pub mod providers;

pub use providers::{GeminiProvider, MockProvider};
