use chime_utils::create_random_secret;
use tracing::{info, warn};

const CRON_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer secret the periodic trigger must present before a push
    /// fan-out pass is run.
    pub cron_secret: String,
    /// Port for the application to run on
    pub port: usize,
}

impl Config {
    pub fn new() -> Self {
        let cron_secret = match std::env::var("CRON_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find CRON_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(CRON_SECRET_LEN);
                info!(
                    "Secret for the periodic notification trigger was generated and set to: {}",
                    secret
                );
                secret
            }
        };
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        Self { cron_secret, port }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
