use relay_errors::RelayError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Upstream backends the relay knows how to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ProviderId {
    #[default]
    #[serde(rename = "OpenAI")]
    OpenAi,
}

impl ProviderId {
    pub const ALL: &'static [ProviderId] = &[ProviderId::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
        }
    }
}

impl FromStr for ProviderId {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RelayError::UnknownProvider(s.to_string()))
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
