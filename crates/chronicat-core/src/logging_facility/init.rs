//! Global subscriber installation

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Where and how log events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Text lines on stderr, `debug` and up
    #[default]
    Development,
    /// One JSON object per line on stderr, `info` and up
    Production,
    /// No output; tests install [`init_test_capture`](super::init_test_capture)
    Test,
}

impl Profile {
    fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "chronicat=debug",
            Profile::Production | Profile::Test => "chronicat=info",
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let profile = match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Profile::Development,
            "production" | "prod" => Profile::Production,
            "test" => Profile::Test,
            other => return Err(format!("unknown log profile '{}'", other)),
        };
        Ok(profile)
    }
}

static INSTALLED: Once = Once::new();

/// Install the process-wide subscriber for `profile`. Only the first call
/// has any effect. `RUST_LOG`, when set, replaces the profile's filter.
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));
        let builder = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter);

        // losing the race to another global subscriber is not an error
        let _ = match profile {
            Profile::Development => builder.finish().try_init(),
            Profile::Production => builder.json().finish().try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_ignored() {
        init(Profile::Test);
        init(Profile::Production);
    }

    #[test]
    fn test_profile_parsing_is_lenient() {
        assert_eq!(" PROD ".parse::<Profile>(), Ok(Profile::Production));
        assert_eq!("Dev".parse::<Profile>(), Ok(Profile::Development));
        assert_eq!("test".parse::<Profile>(), Ok(Profile::Test));
        assert!("verbose".parse::<Profile>().is_err());
    }
}
