use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSearchConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub weather: WeatherConfig,
    pub genai: GenAiConfig,
    pub images: ImageSearchConfig,
    /// How many days the generated plan should cover.
    pub plan_days: u32,
    /// Timeout applied to every outbound provider call.
    pub upstream_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutriplan".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutriplan-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let weather = WeatherConfig {
            api_key: std::env::var("WEATHER_API_KEY")?,
            base_url: std::env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| "http://api.weatherapi.com/v1".into()),
        };
        let genai = GenAiConfig {
            api_key: std::env::var("GEMINI_API_KEY")?,
            base_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),
        };
        let images = ImageSearchConfig {
            api_key: std::env::var("PEXELS_API_KEY")?,
            base_url: std::env::var("PEXELS_API_URL")
                .unwrap_or_else(|_| "https://api.pexels.com/v1".into()),
        };
        let plan_days = std::env::var("PLAN_DAYS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(7);
        let upstream_timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);
        Ok(Self {
            database_url,
            jwt,
            weather,
            genai,
            images,
            plan_days,
            upstream_timeout_secs,
        })
    }
}
