use serde::{Deserialize, Serialize};

use super::{API_PREFIX, Endpoint};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationCode(pub String);

impl StationCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        let Self(code) = self;

        code
    }
}

impl Endpoint for StationCode {
    fn endpoint() -> String {
        format!("{API_PREFIX}/stations")
    }
}

impl std::fmt::Display for StationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
