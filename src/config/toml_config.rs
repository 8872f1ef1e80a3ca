use crate::core::ConfigProvider;
use crate::domain::model::{ColumnMapping, MatchOptions};
use crate::utils::error::{MatchError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: &[&str] = &["xlsx", "csv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub matching: MatchOptions,
    #[serde(default)]
    pub columns: ColumnMapping,
    pub usage: Option<UsageConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub contacts: String,
    pub roster: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub filename: String,
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            filename: "resultado".to_string(),
            formats: vec!["xlsx".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageConfig {
    pub counter_db: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl MatchConfig {
    pub fn new(contacts: impl Into<String>, roster: impl Into<String>) -> Self {
        Self {
            input: InputConfig {
                contacts: contacts.into(),
                roster: roster.into(),
            },
            output: OutputConfig::default(),
            matching: MatchOptions::default(),
            columns: ColumnMapping::default(),
            usage: None,
            monitoring: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ROSTER_PATH})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| MatchError::ConfigError {
            message: format!("Invalid env var pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("input.contacts", &self.input.contacts)?;
        validation::validate_file_extension("input.contacts", &self.input.contacts, validation::TABLE_EXTENSIONS)?;
        validation::validate_path("input.roster", &self.input.roster)?;
        validation::validate_file_extension("input.roster", &self.input.roster, validation::TABLE_EXTENSIONS)?;

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_non_empty_string("output.filename", &self.output.filename)?;
        if self.output.formats.is_empty() {
            return Err(MatchError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        for format in &self.output.formats {
            validation::validate_one_of("output.formats", format, OUTPUT_FORMATS)?;
        }

        validation::validate_regex("matching.partition_pattern", &self.matching.partition_pattern)?;
        validation::validate_non_empty_string("columns.roster_name", &self.columns.roster_name)?;
        validation::validate_non_empty_string("columns.roster_id", &self.columns.roster_id)?;

        if let Some(usage) = &self.usage {
            validation::validate_path("usage.counter_db", &usage.counter_db)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn counter_db(&self) -> Option<&str> {
        self.usage.as_ref().map(|u| u.counter_db.as_str())
    }
}

impl ConfigProvider for MatchConfig {
    fn contacts_path(&self) -> &str {
        &self.input.contacts
    }

    fn roster_path(&self) -> &str {
        &self.input.roster
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_filename(&self) -> &str {
        &self.output.filename
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn match_options(&self) -> MatchOptions {
        MatchOptions {
            columns: self.columns.clone(),
            ..self.matching.clone()
        }
    }
}

impl Validate for MatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{MatchMode, RankOrder};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[input]
contacts = "contactos.csv"
roster = "consulta_rector.xlsx"
"#;

        let config = MatchConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.contacts_path(), "contactos.csv");
        assert_eq!(config.output_filename(), "resultado");
        assert_eq!(config.output_formats(), &["xlsx".to_string()]);
        assert_eq!(config.matching.mode, MatchMode::Combined);
        assert_eq!(config.matching.order, RankOrder::Confidence);
        assert_eq!(config.columns.roster_id, "Cedula");
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[input]
contacts = "contactos.xlsx"
roster = "egresados.xlsx"

[output]
path = "./reportes"
filename = "unillanos"
formats = ["xlsx", "csv"]

[matching]
mode = "unillanos_filtered"
order = "coincidence"
partition_pattern = '\b(U|UNILLANOS|UNIVERSIDAD)\b'
parallel = true

[columns]
roster_id = "Documento"
phone1_aliases = ["Celular"]

[usage]
counter_db = "contador.db"

[monitoring]
enabled = true
"#;

        let config = MatchConfig::from_toml_str(toml_content).unwrap();
        let options = config.match_options();

        assert_eq!(options.mode, MatchMode::UnillanosFiltered);
        assert_eq!(options.order, RankOrder::Coincidence);
        assert!(options.parallel);
        assert_eq!(options.columns.roster_id, "Documento");
        assert_eq!(options.columns.phone1_aliases, vec!["Celular".to_string()]);
        // untouched column names keep their defaults
        assert_eq!(options.columns.roster_name, "Nombres");
        assert_eq!(config.counter_db(), Some("contador.db"));
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONTACT_MATCH_TEST_ROSTER", "/data/egresados.xlsx");

        let toml_content = r#"
[input]
contacts = "contactos.csv"
roster = "${CONTACT_MATCH_TEST_ROSTER}"
"#;

        let config = MatchConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.roster_path(), "/data/egresados.xlsx");

        std::env::remove_var("CONTACT_MATCH_TEST_ROSTER");
    }

    #[test]
    fn test_config_validation() {
        let mut config = MatchConfig::new("contactos.vcf", "egresados.xlsx");
        assert!(config.validate().is_err());

        config.input.contacts = "contactos.csv".to_string();
        assert!(config.validate().is_ok());

        config.output.formats = vec!["pdf".to_string()];
        assert!(config.validate().is_err());

        config.output.formats = vec!["csv".to_string()];
        config.matching.partition_pattern = "(".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_input_section_is_error() {
        assert!(MatchConfig::from_toml_str("[output]\npath = \"x\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[input]\ncontacts = \"a.csv\"\nroster = \"b.xlsx\"\n")
            .unwrap();

        let config = MatchConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.roster_path(), "b.xlsx");
    }
}
