use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api_url: Option<String>,
    pub token_file: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();
        config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| "http://localhost:8000/api".to_string())
    }

    pub fn token_file(&self) -> String {
        self.token_file
            .clone()
            .unwrap_or_else(|| ".doctor-portal-tokens.json".to_string())
    }
}
