use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const ICE_SCHEMES: [&str; 4] = ["stun", "stuns", "turn", "turns"];

/// RTCIceServer describes a single STUN or TURN server the transport may use
/// while gathering candidates.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCIceServer {
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub credential: String,
}

impl RTCIceServer {
    /// validate checks the scheme of every url. TURN urls need both a
    /// username and a credential.
    pub fn validate(&self) -> Result<()> {
        if self.urls.is_empty() {
            return Err(Error::ErrInvalidConfiguration(
                "ice server without urls".to_owned(),
            ));
        }

        for url in &self.urls {
            let scheme = url.split_once(':').map(|(scheme, _)| scheme);
            match scheme {
                Some("turn") | Some("turns") => {
                    if self.username.is_empty() || self.credential.is_empty() {
                        return Err(Error::ErrNoTurnCredentials);
                    }
                }
                Some(scheme) if ICE_SCHEMES.contains(&scheme) => {}
                _ => {
                    return Err(Error::ErrInvalidConfiguration(format!(
                        "unsupported ice server url {url}"
                    )))
                }
            }
        }

        Ok(())
    }
}

/// RTCConfiguration is handed to the transport factory when the session's
/// transport is created.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCConfiguration {
    #[serde(default)]
    pub ice_servers: Vec<RTCIceServer>,
}

impl RTCConfiguration {
    pub fn validate(&self) -> Result<()> {
        for server in &self.ice_servers {
            server.validate()?;
        }
        Ok(())
    }
}
