use std::time::Duration;

/// Fixed system address every notification is sent from.
pub const DEFAULT_SENDER: &str = "noreply@clubevents.local";

/// Event service settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Sender address stamped on every notification.
    pub sender_address: String,
    /// Upper bound for one directory lookup.
    pub directory_timeout: Duration,
    /// Upper bound for one publish call.
    pub publish_timeout: Duration,
}

impl ServiceConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `NOTIFICATION_SENDER`    | `noreply@clubevents.local` |
    /// | `DIRECTORY_TIMEOUT_SECS` | `5`                        |
    /// | `PUBLISH_TIMEOUT_SECS`   | `5`                        |
    pub fn from_env() -> Self {
        let sender_address =
            std::env::var("NOTIFICATION_SENDER").unwrap_or_else(|_| DEFAULT_SENDER.into());

        let directory_timeout_secs: u64 = std::env::var("DIRECTORY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DIRECTORY_TIMEOUT_SECS must be a valid u64");

        let publish_timeout_secs: u64 = std::env::var("PUBLISH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("PUBLISH_TIMEOUT_SECS must be a valid u64");

        Self {
            sender_address,
            directory_timeout: Duration::from_secs(directory_timeout_secs),
            publish_timeout: Duration::from_secs(publish_timeout_secs),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sender_address: DEFAULT_SENDER.to_string(),
            directory_timeout: Duration::from_secs(5),
            publish_timeout: Duration::from_secs(5),
        }
    }
}
