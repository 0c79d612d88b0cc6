use super::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment a project's API key is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags match exactly: `"Dev"` or `" production"` are rejected.
impl FromStr for Environment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Environment::Dev),
            "production" => Ok(Environment::Production),
            _ => Err(DomainError::InvalidEnvironment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("dev".parse::<Environment>(), Ok(Environment::Dev));
        assert_eq!(
            "production".parse::<Environment>(),
            Ok(Environment::Production)
        );
    }

    #[test]
    fn rejects_other_spellings() {
        for tag in ["", "Dev", "PRODUCTION", "prod", " dev", "staging"] {
            assert_eq!(
                tag.parse::<Environment>(),
                Err(DomainError::InvalidEnvironment),
                "{tag:?} should be rejected"
            );
        }
    }

    #[test]
    fn defaults_to_dev() {
        assert_eq!(Environment::default(), Environment::Dev);
    }
}
