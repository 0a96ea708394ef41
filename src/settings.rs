use serde::Deserialize;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use dotenv::dotenv;

fn default_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    /// Root of the booking backend's REST API, e.g. `http://localhost:8080/api`
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Overridden by `RUST_LOG` when set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Settings {
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        dotenv().ok();

        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings: Settings = serde_yaml::from_str(contents)?;

        settings.api_base_url = parse_env_var(&settings.api_base_url)?;
        settings.log_level = parse_env_var(&settings.log_level)?;

        Ok(settings)
    }
}

fn parse_env_var(value: &str) -> Result<String, Box<dyn std::error::Error>> {
    if value.starts_with("${") && value.ends_with("}") {
        let env_name = &value[2..value.len() - 1];
        match env::var(env_name) {
            Ok(val) => Ok(val),
            Err(_) => Err(format!("Environment variable '{}' not found", env_name).into()),
        }
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let settings = Settings::from_yaml_str("api_base_url: http://localhost:8080/api\n").unwrap();
        assert_eq!(settings.api_base_url, "http://localhost:8080/api");
        assert_eq!(settings.request_timeout_secs, 10);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn env_placeholders_are_resolved() {
        env::set_var("AYTODEPORTE_TEST_API", "http://backend:8080/api");
        let settings = Settings::from_yaml_str(
            "api_base_url: ${AYTODEPORTE_TEST_API}\nrequest_timeout_secs: 3\nlog_level: debug\n",
        )
        .unwrap();
        assert_eq!(settings.api_base_url, "http://backend:8080/api");
        assert_eq!(settings.request_timeout_secs, 3);
    }

    #[test]
    fn missing_env_var_is_an_error() {
        let result = Settings::from_yaml_str("api_base_url: ${AYTODEPORTE_SURELY_UNSET_VAR}\n");
        assert!(result.is_err());
    }
}
