use crate::Config;
use std::fmt;

/// How the client authenticates against the CLC API.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A pre-issued bearer token. Only usable together with explicit aliases.
    Token { token: String },
    /// Exchanged for a bearer token on login.
    Password { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { .. } => f.debug_struct("Token").finish_non_exhaustive(),
            Self::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Credentials {
    /// An API token paired with at least one alias takes priority over
    /// username and password. `None` when neither is usable.
    pub fn resolve(config: &Config) -> Option<Self> {
        let token = non_empty(&config.v2_api_token);
        if let Some(token) = token {
            if !config.aliases.is_empty() {
                return Some(Self::Token {
                    token: token.to_string(),
                });
            }
            warn!("CLC_V2_API_Token is set but no alias is configured, ignoring the token");
        }

        match (non_empty(&config.v2_api_username), non_empty(&config.v2_api_passwd)) {
            (Some(username), Some(password)) => Some(Self::Password {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => None,
        }
    }
}
