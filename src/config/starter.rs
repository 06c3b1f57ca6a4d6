//! Starter data loading from starter.toml
//!
//! The wizard seeds a fresh account with the needs listed here plus one
//! iteration. When no file is present the built-in set is used.

use crate::{
    core::validation::{DESCRIPTION_MAX, ICON_MAX, NEED_NAME_MAX, Validator},
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire starter.toml file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StarterConfig {
    /// Needs created by the wizard, in order
    pub needs: Vec<StarterNeed>,
    /// Iteration created by the wizard
    #[serde(default)]
    pub iteration: StarterIteration,
}

/// A single need in the starter set
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StarterNeed {
    /// Name of the need
    pub name: String,
    /// Description shown under the name
    #[serde(default)]
    pub description: String,
    /// Icon class
    #[serde(default)]
    pub icon_name: String,
    /// Icon color class
    #[serde(default)]
    pub icon_color: String,
}

/// The iteration the wizard opens for the user
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StarterIteration {
    /// Sequence number of the first iteration
    pub number: i32,
}

impl Default for StarterIteration {
    fn default() -> Self {
        Self { number: 1 }
    }
}

fn need(name: &str, description: &str, icon_name: &str, icon_color: &str) -> StarterNeed {
    StarterNeed {
        name: name.to_string(),
        description: description.to_string(),
        icon_name: icon_name.to_string(),
        icon_color: icon_color.to_string(),
    }
}

impl Default for StarterConfig {
    fn default() -> Self {
        Self {
            needs: vec![
                need("Health", "Body and mind in good shape", "fas fa-heartbeat", "bg-red-500"),
                need("Relationships", "Family, friends and partner", "far fa-heart", "bg-pink-500"),
                need("Career", "Work that matters", "fas fa-briefcase", "bg-blue-500"),
                need("Finances", "Money under control", "fas fa-piggy-bank", "bg-green-500"),
                need("Leisure", "Time for fun and hobbies", "fas fa-gamepad", "bg-yellow-500"),
            ],
            iteration: StarterIteration::default(),
        }
    }
}

/// Loads the starter set from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StarterConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read starter file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses a starter set and checks every need against the need field limits.
///
/// # Errors
/// Returns [`Error::Config`] on invalid TOML or on a need the wizard could
/// not create.
pub fn parse_config(contents: &str) -> Result<StarterConfig> {
    let config: StarterConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse starter file: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

impl StarterConfig {
    /// Checks that each need would pass the same validation as a created need.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first offending need.
    pub fn validate(&self) -> Result<()> {
        for (index, need) in self.needs.iter().enumerate() {
            let mut v = Validator::new();
            v.not_blank("name", &need.name)
                .max_chars("name", &need.name, NEED_NAME_MAX)
                .max_chars("description", &need.description, DESCRIPTION_MAX)
                .max_chars("icon_name", &need.icon_name, ICON_MAX)
                .max_chars("icon_color", &need.icon_color, ICON_MAX);
            if let Err(Error::Validation { errors }) = v.finish() {
                let details = errors
                    .iter()
                    .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(Error::Config {
                    message: format!(
                        "Starter need #{} ({:?}) is invalid: {details}",
                        index + 1,
                        need.name
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Loads the starter set from `path` if it exists, otherwise returns the
/// built-in set.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<StarterConfig> {
    let path = path.as_ref();
    if path.exists() {
        let config = load_config(path)?;
        info!(needs = config.needs.len(), "Loaded starter set from {}", path.display());
        Ok(config)
    } else {
        debug!("No starter file at {}, using built-in set", path.display());
        Ok(StarterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_starter_config() {
        let toml_str = r#"
            [[needs]]
            name = "Mind"
            description = "Learning"
            icon_name = "fas fa-brain"
            icon_color = "bg-purple-500"

            [[needs]]
            name = "Home"

            [iteration]
            number = 3
        "#;

        let config: StarterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.needs.len(), 2);
        assert_eq!(config.needs[0].icon_name, "fas fa-brain");
        assert_eq!(config.needs[1].name, "Home");
        assert_eq!(config.needs[1].description, "");
        assert_eq!(config.iteration.number, 3);
    }

    #[test]
    fn test_iteration_section_is_optional() {
        let config: StarterConfig = toml::from_str("[[needs]]\nname = \"Only\"\n").unwrap();
        assert_eq!(config.iteration.number, 1);
    }

    #[test]
    fn test_default_has_five_needs() {
        let config = StarterConfig::default();
        assert_eq!(config.needs.len(), 5);
        assert!(config.needs.iter().all(|n| n.name.chars().count() <= 30));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let config = load_or_default("definitely/not/here/starter.toml").unwrap();
        assert_eq!(config, StarterConfig::default());
    }

    #[test]
    fn test_default_set_is_valid() {
        StarterConfig::default().validate().unwrap();
    }

    #[test]
    fn test_overlong_starter_need_is_config_error() {
        let toml_str = format!("[[needs]]\nname = \"{}\"\n", "n".repeat(31));
        let Err(Error::Config { message }) = parse_config(&toml_str) else {
            panic!("expected config error");
        };
        assert!(message.contains("#1"));
        assert!(message.contains("name"));
    }

    #[test]
    fn test_blank_name_and_long_icon_are_rejected() {
        let blank = parse_config("[[needs]]\nname = \"  \"\n");
        assert!(matches!(blank, Err(Error::Config { .. })));

        let toml_str = format!(
            "[[needs]]\nname = \"Ok\"\n\n[[needs]]\nname = \"Icon\"\nicon_name = \"{}\"\n",
            "i".repeat(51)
        );
        let Err(Error::Config { message }) = parse_config(&toml_str) else {
            panic!("expected config error");
        };
        assert!(message.contains("#2"));
        assert!(message.contains("icon_name"));
    }

    #[test]
    fn test_load_config_missing_file_is_error() {
        let result = load_config("definitely/not/here/starter.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
