use clap::Parser;
use contact_match::config::{Command, ConvertArgs, CountArgs, LookupArgs, MatchArgs};
use contact_match::core::{Storage, UsageCounter};
use contact_match::domain::model::ColumnMapping;
use contact_match::matching::records::lookup_by_id;
use contact_match::utils::error::{ErrorSeverity, MatchError, Result};
use contact_match::utils::{logger, validation::Validate};
use contact_match::{io, CliConfig, EtlEngine, LocalStorage, MatchPipeline, SqliteUsageCounter};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting contact-match CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let monitor_enabled = cli.monitor;
    let outcome = match cli.command {
        Command::Match(args) => run_match(args, monitor_enabled).await,
        Command::Lookup(args) => run_lookup(args).await,
        Command::Convert(args) => run_convert(args).await,
        Command::Count(args) => run_count(args),
    };

    if let Err(e) = outcome {
        exit_with(e);
    }

    Ok(())
}

async fn run_match(args: MatchArgs, monitor_flag: bool) -> Result<()> {
    let config = args.into_config()?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e);
    }

    let monitor_enabled = monitor_flag || config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let counter_db = config.counter_db().map(str::to_string);
    let pipeline = MatchPipeline::new(LocalStorage::current_dir(), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    let output_path = engine.run().await?;
    tracing::info!("✅ Matching completed successfully!");
    println!("✅ Matching completed successfully!");
    println!("📁 Report saved to: {}", output_path);

    // 比對成功後才遞增使用次數
    if let Some(path) = counter_db {
        let count = SqliteUsageCounter::open(&path)?.increment()?;
        println!("🔢 Comparisons completed: {}", count);
    }

    Ok(())
}

async fn run_lookup(args: LookupArgs) -> Result<()> {
    let storage = LocalStorage::current_dir();
    let roster = io::read_table(storage.read_file(&args.roster).await?, &args.roster)?;

    let columns = ColumnMapping {
        roster_id: args.id_column,
        ..ColumnMapping::default()
    };

    match lookup_by_id(&roster, &columns, &args.cedula)? {
        Some(entry) => {
            println!("Nombre: {}", entry.nombres);
            if !entry.tipo.is_empty() {
                println!("Tipo: {}", entry.tipo);
            }
        }
        None => println!("No se encontró la cédula {}", args.cedula.trim()),
    }
    Ok(())
}

async fn run_convert(args: ConvertArgs) -> Result<()> {
    let storage = LocalStorage::current_dir();
    let output = args.output_path();

    let table = io::read_table(storage.read_file(&args.input).await?, &args.input)?;
    let bytes = io::xlsx::write_table(&table, "Hoja1")?;
    storage.write_file(&output, &bytes).await?;

    tracing::info!("Converted {} rows from {} to {}", table.len(), args.input, output);
    println!("📁 Workbook saved to: {}", output);
    Ok(())
}

fn run_count(args: CountArgs) -> Result<()> {
    let counter = SqliteUsageCounter::open(&args.counter_db)?;
    println!("🔢 Comparisons completed: {}", counter.current()?);
    if let Some(updated) = counter.last_updated()? {
        println!("🕒 Last run: {}", updated);
    }
    Ok(())
}

fn exit_with(e: MatchError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ contact-match failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
