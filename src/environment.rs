use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The backend deployment the dashboard reads from.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Backend running on this machine.
    #[default]
    Local,
    /// Backend at an explicit base URL.
    Custom { backend_url: String },
}

impl Environment {
    /// Returns the backend base URL associated with the environment.
    pub fn backend_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:5000".to_string(),
            Environment::Custom { backend_url } => backend_url.clone(),
        }
    }

    /// Picks the first configured source: CLI flag, then environment variable, then config file.
    pub fn resolve(
        cli_url: Option<&str>,
        env_url: Option<&str>,
        config_url: Option<&str>,
    ) -> Result<Self, String> {
        match cli_url.or(env_url).or(config_url) {
            Some(value) => value.parse(),
            None => Ok(Environment::Local),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Environment::Local);
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Environment::Custom {
                backend_url: trimmed.trim_end_matches('/').to_string(),
            });
        }
        Err(format!(
            "Invalid backend '{}': expected 'local' or an http(s) URL",
            s
        ))
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.backend_url())
    }
}
