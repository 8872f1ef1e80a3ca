pub mod cli;
pub mod toml_config;

pub use toml_config::MatchConfig;

#[cfg(feature = "cli")]
use crate::domain::model::{MatchMode, RankOrder};
#[cfg(feature = "cli")]
use crate::utils::error::{MatchError, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "contact-match")]
#[command(about = "Match a contact list against the graduate roster")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log memory and timing for each phase")]
    pub monitor: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Match contacts against the roster and write the report
    Match(MatchArgs),
    /// Look up a roster entry by cédula
    Lookup(LookupArgs),
    /// Convert a CSV or Excel table into a formatted xlsx workbook
    Convert(ConvertArgs),
    /// Print how many comparisons have been completed
    Count(CountArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct MatchArgs {
    #[arg(short, long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Contacts table (csv or Excel)")]
    pub contacts: Option<String>,

    #[arg(long, help = "Roster table (csv or Excel)")]
    pub roster: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, help = "Report file name without extension")]
    pub output_name: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Comma-separated: xlsx,csv,json")]
    pub format: Vec<String>,

    #[arg(long, help = "combined | unillanos_filtered")]
    pub mode: Option<MatchMode>,

    #[arg(long, help = "confidence | coincidence")]
    pub order: Option<RankOrder>,

    #[arg(long, help = "Override the unillanos partition pattern")]
    pub pattern: Option<String>,

    #[arg(long, help = "Match contacts on all cores")]
    pub parallel: bool,

    #[arg(long, help = "SQLite file holding the usage counter")]
    pub counter_db: Option<String>,
}

#[cfg(feature = "cli")]
impl MatchArgs {
    /// 合併 TOML 與命令列參數，命令列優先
    pub fn into_config(self) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::from_file(path)?,
            None => {
                let contacts = self.contacts.clone().ok_or_else(|| MatchError::MissingConfigError {
                    field: "contacts".to_string(),
                })?;
                let roster = self.roster.clone().ok_or_else(|| MatchError::MissingConfigError {
                    field: "roster".to_string(),
                })?;
                MatchConfig::new(contacts, roster)
            }
        };

        if let Some(contacts) = self.contacts {
            config.input.contacts = contacts;
        }
        if let Some(roster) = self.roster {
            config.input.roster = roster;
        }
        if let Some(path) = self.output_path {
            config.output.path = path;
        }
        if let Some(name) = self.output_name {
            config.output.filename = name;
        }
        if !self.format.is_empty() {
            config.output.formats = self.format;
        }
        if let Some(mode) = self.mode {
            config.matching.mode = mode;
        }
        if let Some(order) = self.order {
            config.matching.order = order;
        }
        if let Some(pattern) = self.pattern {
            config.matching.partition_pattern = pattern;
        }
        if self.parallel {
            config.matching.parallel = true;
        }
        if let Some(counter_db) = self.counter_db {
            config.usage = Some(toml_config::UsageConfig { counter_db });
        }

        Ok(config)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct LookupArgs {
    #[arg(long, help = "Roster table (csv or Excel)")]
    pub roster: String,

    #[arg(long)]
    pub cedula: String,

    #[arg(long, default_value = "Cedula")]
    pub id_column: String,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    #[arg(long)]
    pub input: String,

    #[arg(long, help = "Destination workbook; defaults to the input name with .xlsx")]
    pub output: Option<String>,
}

#[cfg(feature = "cli")]
impl ConvertArgs {
    pub fn output_path(&self) -> String {
        self.output.clone().unwrap_or_else(|| {
            std::path::Path::new(&self.input)
                .with_extension("xlsx")
                .to_string_lossy()
                .into_owned()
        })
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct CountArgs {
    #[arg(long, default_value = "contador.db")]
    pub counter_db: String,
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(args).unwrap()
    }

    fn match_args(cli: CliConfig) -> MatchArgs {
        match cli.command {
            Command::Match(args) => args,
            other => panic!("expected match command, got {:?}", other),
        }
    }

    #[test]
    fn test_match_flags_build_config() {
        let cli = parse(&[
            "contact-match",
            "--verbose",
            "match",
            "--contacts",
            "contactos.csv",
            "--roster",
            "egresados.xlsx",
            "--format",
            "xlsx,csv",
            "--mode",
            "unillanos",
            "--order",
            "coincidence",
            "--counter-db",
            "contador.db",
        ]);
        assert!(cli.verbose);

        let config = match_args(cli).into_config().unwrap();
        assert_eq!(config.contacts_path(), "contactos.csv");
        assert_eq!(config.output_formats(), &["xlsx".to_string(), "csv".to_string()]);
        assert_eq!(config.matching.mode, MatchMode::UnillanosFiltered);
        assert_eq!(config.matching.order, RankOrder::Coincidence);
        assert_eq!(config.counter_db(), Some("contador.db"));
    }

    #[test]
    fn test_match_without_inputs_is_missing_config() {
        let cli = parse(&["contact-match", "match", "--contacts", "contactos.csv"]);
        let err = match_args(cli).into_config().unwrap_err();
        assert!(matches!(err, MatchError::MissingConfigError { ref field } if field == "roster"));
    }

    #[test]
    fn test_flags_override_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"[input]\ncontacts = \"a.csv\"\nroster = \"b.xlsx\"\n[matching]\nmode = \"unillanos_filtered\"\n",
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["contact-match", "match", "--config", &path, "--roster", "c.xlsx", "--mode", "combined"]);
        let config = match_args(cli).into_config().unwrap();

        assert_eq!(config.contacts_path(), "a.csv");
        assert_eq!(config.roster_path(), "c.xlsx");
        assert_eq!(config.matching.mode, MatchMode::Combined);
    }

    #[test]
    fn test_invalid_mode_is_rejected_by_parser() {
        assert!(CliConfig::try_parse_from(["contact-match", "match", "--mode", "fuzzy"]).is_err());
    }

    #[test]
    fn test_convert_default_output() {
        let cli = parse(&["contact-match", "convert", "--input", "data/contactos.csv"]);
        match cli.command {
            Command::Convert(args) => {
                assert_eq!(
                    std::path::Path::new(&args.output_path()),
                    std::path::Path::new("data/contactos.xlsx")
                );
            }
            other => panic!("expected convert command, got {:?}", other),
        }
    }
}
