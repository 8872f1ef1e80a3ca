use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins when set; otherwise only this crate logs, at debug when verbose.
fn env_filter(verbose: bool) -> EnvFilter {
    let default_directive = if verbose {
        "contact_match=debug,warn"
    } else {
        "contact_match=info,warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

pub fn init_cli_logger(verbose: bool) {
    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    tracing_subscriber::registry().with(env_filter(verbose)).with(layer).init();
}

/// 以 JSON 格式輸出日誌，方便批次作業收集
pub fn init_json_logger() {
    let layer = fmt::layer().with_target(true).json().flatten_event(true);

    tracing_subscriber::registry().with(env_filter(false)).with(layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_levels() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(env_filter(true).to_string().contains("contact_match=debug"));
        assert!(env_filter(false).to_string().contains("contact_match=info"));
    }
}
