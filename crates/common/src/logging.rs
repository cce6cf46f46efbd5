use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `default_level`; `LOG_FORMAT=json` switches to JSON lines. Both are read
/// at call time, so load `.env` first.
pub fn init_logging(default_level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if json_format_requested() {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn json_format_requested() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn log_format_from_env_file_is_honoured() {
        std::env::remove_var("LOG_FORMAT");
        assert!(!json_format_requested());

        let dir = std::env::temp_dir().join(format!("tariff-logging-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let env_file = dir.join(".env");
        fs::write(&env_file, "LOG_FORMAT=json\n").unwrap();

        dotenvy::from_path(&env_file).unwrap();
        assert!(json_format_requested());

        std::env::remove_var("LOG_FORMAT");
        fs::remove_dir_all(&dir).unwrap();
    }
}
