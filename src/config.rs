//! Reporter settings: validation of the pre-parsed configuration map and the
//! JSON file loader used by the CLI.

use jira_api::JiraConfig;
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::sanitize::FileNameSanitizer;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables that take precedence over file values.
pub const ENV_OVERRIDES: [(&str, &str); 3] = [
    ("JIRA_HOST", "host"),
    ("JIRA_USER", "user"),
    ("JIRA_TOKEN", "token"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration for '{key}' is missing.{hint}")]
    Missing { key: &'static str, hint: &'static str },
    #[error("Configuration for '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    fn missing(key: &'static str) -> Self {
        ConfigError::Missing { key, hint: "" }
    }

    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            reason: reason.into(),
        }
    }

    /// Name of the offending key, when the error concerns a single key.
    pub fn key(&self) -> Option<&'static str> {
        match self {
            ConfigError::Missing { key, .. } | ConfigError::Invalid { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Validated reporter settings. Read-only once built.
#[derive(Clone)]
pub struct Settings {
    pub host: String,
    pub user: String,
    pub token: String,
    pub project_key: String,
    pub issue_type: String,
    pub labels: Vec<String>,
    pub debug_mode: bool,
    pub verify_tls: bool,
    pub timeout: Duration,
    pub file_name_pattern: Option<Regex>,
}

impl Settings {
    /// Validates `map`, failing on the first missing or empty required key in
    /// the order host, user, token, projectKey, issueType, labels, debugMode.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        let host = required_string(map, "host")?;
        let user = required_string(map, "user")?;
        let token = required_string(map, "token")?;
        let project_key = required_string(map, "projectKey")?;
        let issue_type = required_string(map, "issueType")?;
        let labels = required_labels(map)?;

        let debug_mode = match map.get("debugMode") {
            None | Some(Value::Null) => {
                return Err(ConfigError::Missing {
                    key: "debugMode",
                    hint: " Possible values are true or false",
                })
            }
            Some(Value::Bool(flag)) => *flag,
            Some(_) => return Err(ConfigError::invalid("debugMode", "expected true or false")),
        };

        let verify_tls = match map.get("verifyTls") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => return Err(ConfigError::invalid("verifyTls", "expected true or false")),
        };

        let timeout = match map.get("timeoutSecs") {
            None | Some(Value::Null) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(value) => match value.as_u64() {
                Some(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::invalid(
                        "timeoutSecs",
                        "expected a positive number of seconds",
                    ))
                }
            },
        };

        let file_name_pattern = match map.get("fileNamePattern") {
            None | Some(Value::Null) => None,
            Some(Value::String(pattern)) => Some(
                Regex::new(pattern)
                    .map_err(|err| ConfigError::invalid("fileNamePattern", err.to_string()))?,
            ),
            Some(_) => {
                return Err(ConfigError::invalid(
                    "fileNamePattern",
                    "expected a regular expression string",
                ))
            }
        };

        Ok(Self {
            host,
            user,
            token,
            project_key,
            issue_type,
            labels,
            debug_mode,
            verify_tls,
            timeout,
            file_name_pattern,
        })
    }

    /// Client settings for the configured Jira instance.
    pub fn jira_config(&self) -> JiraConfig {
        JiraConfig::new(&self.host, &self.user, &self.token)
            .with_timeout(self.timeout)
            .with_accept_invalid_certs(!self.verify_tls)
    }

    pub fn sanitizer(&self) -> FileNameSanitizer {
        match &self.file_name_pattern {
            Some(pattern) => FileNameSanitizer::new(pattern.clone()),
            None => FileNameSanitizer::default(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .field("project_key", &self.project_key)
            .field("issue_type", &self.issue_type)
            .field("labels", &self.labels)
            .field("debug_mode", &self.debug_mode)
            .field("verify_tls", &self.verify_tls)
            .field("timeout", &self.timeout)
            .field(
                "file_name_pattern",
                &self.file_name_pattern.as_ref().map(Regex::as_str),
            )
            .finish()
    }
}

fn required_string(map: &Map<String, Value>, key: &'static str) -> Result<String, ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Err(ConfigError::missing(key)),
        Some(Value::String(text)) if text.trim().is_empty() => Err(ConfigError::missing(key)),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ConfigError::invalid(key, "expected a string")),
    }
}

fn required_labels(map: &Map<String, Value>) -> Result<Vec<String>, ConfigError> {
    let value = map.get("labels").or_else(|| map.get("label"));
    let items = match value {
        None | Some(Value::Null) => return Err(ConfigError::missing("labels")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ConfigError::invalid("labels", "expected a list of strings")),
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(label) => Ok(label.clone()),
            _ => Err(ConfigError::invalid("labels", "expected a list of strings")),
        })
        .collect()
}

/// Reads a JSON configuration file. The settings may sit at the top level or
/// under a `"jira"` key.
pub fn load_config_map(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    match value {
        Value::Object(mut map) => match map.remove("jira") {
            Some(Value::Object(nested)) => Ok(nested),
            Some(other) => {
                map.insert("jira".to_string(), other);
                Ok(map)
            }
            None => Ok(map),
        },
        _ => Err(ConfigError::invalid("<root>", "expected a JSON object")),
    }
}

/// Overlays non-empty values from `lookup` (normally the process environment)
/// for the keys in [`ENV_OVERRIDES`].
pub fn apply_env_overrides<F>(map: &mut Map<String, Value>, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (variable, key) in ENV_OVERRIDES {
        if let Some(value) = lookup(variable).filter(|value| !value.trim().is_empty()) {
            map.insert(key.to_string(), Value::String(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_env_overrides, load_config_map, ConfigError, Settings};
    use serde_json::{json, Map, Value};
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    const REQUIRED: [&str; 7] = [
        "host",
        "user",
        "token",
        "projectKey",
        "issueType",
        "labels",
        "debugMode",
    ];

    fn complete_map() -> Map<String, Value> {
        match json!({
            "host": "https://yourdomain.atlassian.net",
            "user": "email@mail.com",
            "token": "Tg7womaGGFpn9EC16qD3L7T6",
            "projectKey": "JE",
            "issueType": "Bug",
            "labels": ["automation", "regression"],
            "debugMode": false
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn unique_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        env::temp_dir().join(format!("jira-reporter-tests-{name}-{nanos}/reporter.json"))
    }

    #[test]
    fn complete_map_validates() {
        let settings = Settings::from_map(&complete_map()).expect("valid settings");
        assert_eq!(settings.host, "https://yourdomain.atlassian.net");
        assert_eq!(settings.project_key, "JE");
        assert_eq!(settings.issue_type, "Bug");
        assert_eq!(settings.labels, vec!["automation", "regression"]);
        assert!(!settings.debug_mode);
        assert!(settings.verify_tls);
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.file_name_pattern.is_none());
    }

    #[test]
    fn each_missing_key_is_named() {
        for key in REQUIRED {
            let mut map = complete_map();
            map.remove(key);
            let err = Settings::from_map(&map).unwrap_err();
            assert_eq!(err.key(), Some(key), "removing {key}");
            assert!(matches!(err, ConfigError::Missing { .. }));
        }
    }

    #[test]
    fn empty_strings_count_as_missing() {
        for key in ["host", "user", "token", "projectKey", "issueType"] {
            let mut map = complete_map();
            map.insert(key.to_string(), json!("  "));
            let err = Settings::from_map(&map).unwrap_err();
            assert_eq!(err.key(), Some(key));
        }
    }

    #[test]
    fn first_missing_key_in_order_wins() {
        let mut map = complete_map();
        map.remove("token");
        map.remove("issueType");
        map.remove("debugMode");
        let err = Settings::from_map(&map).unwrap_err();
        assert_eq!(err.key(), Some("token"));
        assert_eq!(err.to_string(), "Configuration for 'token' is missing.");
    }

    #[test]
    fn empty_labels_are_accepted() {
        let mut map = complete_map();
        map.insert("labels".to_string(), json!([]));
        let settings = Settings::from_map(&map).unwrap();
        assert!(settings.labels.is_empty());
    }

    #[test]
    fn singular_label_key_is_accepted() {
        let mut map = complete_map();
        map.remove("labels");
        map.insert("label".to_string(), json!(["smoke"]));
        let settings = Settings::from_map(&map).unwrap();
        assert_eq!(settings.labels, vec!["smoke"]);
    }

    #[test]
    fn debug_mode_must_be_explicit_boolean() {
        let mut map = complete_map();
        map.remove("debugMode");
        let err = Settings::from_map(&map).unwrap_err();
        assert!(err.to_string().contains("Possible values are true or false"));

        map.insert("debugMode".to_string(), json!("false"));
        let err = Settings::from_map(&map).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "debugMode", .. }));

        map.insert("debugMode".to_string(), json!(true));
        assert!(Settings::from_map(&map).unwrap().debug_mode);
    }

    #[test]
    fn wrong_types_are_invalid() {
        let mut map = complete_map();
        map.insert("labels".to_string(), json!(["ok", 3]));
        assert!(matches!(
            Settings::from_map(&map).unwrap_err(),
            ConfigError::Invalid { key: "labels", .. }
        ));

        let mut map = complete_map();
        map.insert("host".to_string(), json!(42));
        assert!(matches!(
            Settings::from_map(&map).unwrap_err(),
            ConfigError::Invalid { key: "host", .. }
        ));
    }

    #[test]
    fn optional_keys_are_validated() {
        let mut map = complete_map();
        map.insert("verifyTls".to_string(), json!(false));
        map.insert("timeoutSecs".to_string(), json!(5));
        map.insert("fileNamePattern".to_string(), json!(r"[A-Za-z0-9]+\.rs"));
        let settings = Settings::from_map(&map).unwrap();
        assert!(!settings.verify_tls);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert!(settings.jira_config().accept_invalid_certs);
        assert_eq!(settings.sanitizer().sanitize("/src/lib.rs"), "lib.rs");

        map.insert("timeoutSecs".to_string(), json!(0));
        assert_eq!(Settings::from_map(&map).unwrap_err().key(), Some("timeoutSecs"));

        let mut map = complete_map();
        map.insert("fileNamePattern".to_string(), json!("(unclosed"));
        assert_eq!(Settings::from_map(&map).unwrap_err().key(), Some("fileNamePattern"));
    }

    #[test]
    fn debug_output_hides_token() {
        let settings = Settings::from_map(&complete_map()).unwrap();
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("Tg7womaGGFpn9EC16qD3L7T6"));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut map = complete_map();
        apply_env_overrides(&mut map, |name| match name {
            "JIRA_TOKEN" => Some("from-env".to_string()),
            "JIRA_USER" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(map["token"], json!("from-env"));
        assert_eq!(map["user"], json!("email@mail.com"));
    }

    #[test]
    fn load_reads_top_level_and_nested_objects() {
        let path = unique_path("nested");
        let parent = path.parent().expect("parent must exist").to_owned();
        fs::create_dir_all(&parent).expect("create temp directory");

        fs::write(&path, json!({ "jira": complete_map() }).to_string()).expect("write config");
        let nested = load_config_map(&path).expect("load nested");
        assert_eq!(nested["projectKey"], json!("JE"));

        fs::write(&path, Value::Object(complete_map()).to_string()).expect("write config");
        let flat = load_config_map(&path).expect("load flat");
        assert!(Settings::from_map(&flat).is_ok());

        let _ = fs::remove_dir_all(parent);
    }

    #[test]
    fn load_rejects_missing_and_malformed_files() {
        let path = unique_path("invalid");
        assert!(matches!(load_config_map(&path), Err(ConfigError::Io(_))));

        let parent = path.parent().expect("parent must exist").to_owned();
        fs::create_dir_all(&parent).expect("create temp directory");
        fs::write(&path, "not-valid-json").expect("write invalid config");
        assert!(matches!(load_config_map(&path), Err(ConfigError::Parse(_))));

        fs::write(&path, "[1, 2]").expect("write array config");
        assert!(matches!(load_config_map(&path), Err(ConfigError::Invalid { .. })));

        let _ = fs::remove_dir_all(parent);
    }
}
