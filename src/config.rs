use std::env;

/// Runtime settings, collected once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Config {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tasks.db".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Config { database_url, port }
    }
}
