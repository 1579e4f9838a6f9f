//! OAuth credential loading and validation.
//!
//! The server authenticates to the YouTube Data API with a long-lived OAuth2
//! refresh token plus the client id/secret of the Google Cloud application it
//! was minted for. All three arrive through the environment (or a `.env` file
//! picked up at startup):
//!
//! - `YOUTUBE_REFRESH_TOKEN`
//! - `YOUTUBE_CLIENT_ID`
//! - `YOUTUBE_CLIENT_SECRET`

use crate::error::Error;

/// Environment variable holding the long-lived OAuth2 refresh token.
pub const ENV_REFRESH_TOKEN: &str = "YOUTUBE_REFRESH_TOKEN";
/// Environment variable holding the Google Cloud OAuth client id.
pub const ENV_CLIENT_ID: &str = "YOUTUBE_CLIENT_ID";
/// Environment variable holding the Google Cloud OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "YOUTUBE_CLIENT_SECRET";

/// The OAuth2 credential triple used to obtain short-lived access tokens.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Reads the credential triple from the environment and validates it.
    ///
    /// Unset variables are treated the same as empty ones, and the returned
    /// [`Error::Configuration`] names every variable that still needs to be
    /// provided rather than just the first.
    pub fn from_env() -> Result<Self, Error> {
        let credentials = Self {
            client_id: std::env::var(ENV_CLIENT_ID).unwrap_or_default(),
            client_secret: std::env::var(ENV_CLIENT_SECRET).unwrap_or_default(),
            refresh_token: std::env::var(ENV_REFRESH_TOKEN).unwrap_or_default(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Checks that every field is non-empty.
    ///
    /// Token exchange calls this before building a request so that incomplete
    /// credentials never generate network traffic.
    pub fn validate(&self) -> Result<(), Error> {
        let mut missing = Vec::new();
        if self.refresh_token.is_empty() {
            missing.push(ENV_REFRESH_TOKEN);
        }
        if self.client_id.is_empty() {
            missing.push(ENV_CLIENT_ID);
        }
        if self.client_secret.is_empty() {
            missing.push(ENV_CLIENT_SECRET);
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::Configuration {
                missing: missing.join(", "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_credentials_validate() {
        let credentials = Credentials::new("id", "secret", "token");
        assert!(credentials.validate().is_ok());
    }

    #[test]
    fn each_missing_field_is_reported_by_variable_name() {
        let cases = [
            (Credentials::new("", "secret", "token"), ENV_CLIENT_ID),
            (Credentials::new("id", "", "token"), ENV_CLIENT_SECRET),
            (Credentials::new("id", "secret", ""), ENV_REFRESH_TOKEN),
        ];

        for (credentials, expected) in cases {
            let err = credentials.validate().unwrap_err();
            match err {
                Error::Configuration { ref missing } => {
                    assert_eq!(missing, expected);
                }
                other => panic!("expected Configuration error, got {other:?}"),
            }
        }
    }

    #[test]
    fn all_missing_fields_are_listed_together() {
        let err = Credentials::new("", "", "").validate().unwrap_err();
        match err {
            Error::Configuration { missing } => {
                assert_eq!(
                    missing,
                    "YOUTUBE_REFRESH_TOKEN, YOUTUBE_CLIENT_ID, YOUTUBE_CLIENT_SECRET"
                );
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }
}
