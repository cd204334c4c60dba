//! Configuration and CLI argument handling

use clap::Parser;

use crate::{error::TimerError, state::Settings};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "speech-timer")]
#[command(about = "A speech/discussion session timer with a local HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Speech duration in seconds
    #[arg(short, long, default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub speech: u64,

    /// Discussion duration in seconds
    #[arg(short, long, default_value = "120", value_parser = clap::value_parser!(u64).range(1..))]
    pub discussion: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial session durations
    pub fn settings(&self) -> Result<Settings, TimerError> {
        Settings::new(self.speech, self.discussion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["speech-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.settings().unwrap(), Settings::new(300, 120).unwrap());
    }

    #[test]
    fn durations_from_flags() {
        let config =
            Config::try_parse_from(["speech-timer", "--speech", "90", "-d", "45", "-v"]).unwrap();
        assert_eq!(config.settings().unwrap(), Settings::new(90, 45).unwrap());
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(Config::try_parse_from(["speech-timer", "--speech", "0"]).is_err());
        assert!(Config::try_parse_from(["speech-timer", "--discussion", "-5"]).is_err());
    }
}
