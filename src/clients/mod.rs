pub mod genai;
pub mod images;
pub mod weather;

pub use genai::{GeminiClient, TextModel};
pub use images::{ImageSearch, PexelsClient, PhotoCandidate};
pub use weather::{WeatherApi, WeatherClient, WeatherSnapshot};
