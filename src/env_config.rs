// Meeting Context - Environment Configuration Loader
// Loads rule overrides from .env files and the process environment

use chrono::Duration;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::detection_rules::MeetingDetectionRules;
use crate::error::{DetectionError, DetectionResult};

const CONFIG_DIR: &str = ".meeting-context";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    /// YAML rules file; env overrides are applied on top of it
    pub rules_file: Option<PathBuf>,
    pub min_confidence: Option<f32>,
    pub min_duration_minutes: Option<i64>,
    pub max_duration_minutes: Option<i64>,
    pub require_attendees: Option<bool>,
    pub min_attendees: Option<usize>,
    pub detect_virtual: Option<bool>,
    pub summary_delay_minutes: Option<i64>,
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).filter(|s| !s.trim().is_empty())?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("⚠️ Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

fn minutes_override(key: &str, minutes: i64) -> DetectionResult<Duration> {
    Duration::try_minutes(minutes).ok_or_else(|| {
        DetectionError::InvalidRules(format!("{}={} is out of range", key, minutes))
    })
}

impl EnvConfig {
    /// Home-directory config folder (~/.meeting-context)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR))
    }

    /// Load environment configuration from .env files and the environment
    pub fn load() -> Self {
        // Try to load .env from the working directory
        let _ = dotenvy::dotenv();

        // Also try from user's home directory
        if let Some(dir) = Self::config_dir() {
            let home_env = dir.join(".env");
            if home_env.exists() {
                let _ = dotenvy::from_path(home_env);
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in `load`)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            rules_file: lookup("MEETING_RULES_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            min_confidence: parse_var(&lookup, "MEETING_MIN_CONFIDENCE"),
            min_duration_minutes: parse_var(&lookup, "MEETING_MIN_DURATION_MINUTES"),
            max_duration_minutes: parse_var(&lookup, "MEETING_MAX_DURATION_MINUTES"),
            require_attendees: parse_var(&lookup, "MEETING_REQUIRE_ATTENDEES"),
            min_attendees: parse_var(&lookup, "MEETING_MIN_ATTENDEES"),
            detect_virtual: parse_var(&lookup, "MEETING_DETECT_VIRTUAL"),
            summary_delay_minutes: parse_var(&lookup, "MEETING_SUMMARY_DELAY_MINUTES"),
        }
    }

    /// Validated rules: rules file (or defaults), then environment overrides
    pub fn rules(&self) -> DetectionResult<MeetingDetectionRules> {
        let mut rules = match &self.rules_file {
            Some(path) => {
                log::info!("📂 Loading meeting rules from {}", path.display());
                MeetingDetectionRules::load_from_path(path)?
            }
            None => MeetingDetectionRules::default(),
        };

        if let Some(value) = self.min_confidence {
            rules.minimum_confidence_threshold = value;
        }
        if let Some(minutes) = self.min_duration_minutes {
            rules.minimum_meeting_duration = minutes_override("MEETING_MIN_DURATION_MINUTES", minutes)?;
        }
        if let Some(minutes) = self.max_duration_minutes {
            rules.maximum_meeting_duration = minutes_override("MEETING_MAX_DURATION_MINUTES", minutes)?;
        }
        if let Some(value) = self.require_attendees {
            rules.require_attendees = value;
        }
        if let Some(value) = self.min_attendees {
            rules.minimum_attendee_count = value;
        }
        if let Some(value) = self.detect_virtual {
            rules.detect_virtual_meetings = value;
        }
        if let Some(minutes) = self.summary_delay_minutes {
            rules.summary_delay = minutes_override("MEETING_SUMMARY_DELAY_MINUTES", minutes)?;
        }

        rules.validate()?;
        Ok(rules)
    }

    /// Write the set values as a .env file
    pub fn save_to_path(&self, path: &Path) -> DetectionResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;

        writeln!(file, "# Meeting Context - User Configuration")?;
        writeln!(file, "# Auto-generated - Edit these values as needed\n")?;

        if let Some(ref val) = self.rules_file {
            writeln!(file, "MEETING_RULES_FILE={}", val.display())?;
        }
        if let Some(val) = self.min_confidence {
            writeln!(file, "MEETING_MIN_CONFIDENCE={}", val)?;
        }
        if let Some(val) = self.min_duration_minutes {
            writeln!(file, "MEETING_MIN_DURATION_MINUTES={}", val)?;
        }
        if let Some(val) = self.max_duration_minutes {
            writeln!(file, "MEETING_MAX_DURATION_MINUTES={}", val)?;
        }
        if let Some(val) = self.require_attendees {
            writeln!(file, "MEETING_REQUIRE_ATTENDEES={}", val)?;
        }
        if let Some(val) = self.min_attendees {
            writeln!(file, "MEETING_MIN_ATTENDEES={}", val)?;
        }
        if let Some(val) = self.detect_virtual {
            writeln!(file, "MEETING_DETECT_VIRTUAL={}", val)?;
        }
        if let Some(val) = self.summary_delay_minutes {
            writeln!(file, "MEETING_SUMMARY_DELAY_MINUTES={}", val)?;
        }

        Ok(())
    }

    /// Save to ~/.meeting-context/.env
    pub fn save_to_home(&self) -> DetectionResult<()> {
        let dir = Self::config_dir()
            .ok_or_else(|| DetectionError::Config("could not find home directory".to_string()))?;
        self.save_to_path(&dir.join(".env"))
    }
}
