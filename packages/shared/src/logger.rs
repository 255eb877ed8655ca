//! Logging setup utilities for the welcome notifier.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are enabled by the default filter.
const LIBRARY_TARGETS: [&str; 2] = ["welcome_shared", "welcome_client"];

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the workspace libraries and the binary itself.
/// It can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "welcome-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use welcome_shared::logger::setup_logger;
///
/// setup_logger("welcome-client", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the `EnvFilter` directive string used when `RUST_LOG` is unset.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut directives: Vec<String> = LIBRARY_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect();

    if !LIBRARY_TARGETS.contains(&binary_target.as_str()) {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }

    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_libraries_and_binary() {
        // テスト項目: デフォルトフィルタにライブラリとバイナリのターゲットが含まれる
        // given (前提条件):
        let binary_name = "welcome-probe";

        // when (操作):
        let filter = default_filter(binary_name, "debug");

        // then (期待する結果):
        assert_eq!(
            filter,
            "welcome_shared=debug,welcome_client=debug,welcome_probe=debug"
        );
    }

    #[test]
    fn test_default_filter_does_not_duplicate_library_target() {
        // テスト項目: バイナリ名がライブラリ名と同じ場合、ターゲットが重複しない
        // given (前提条件):
        let binary_name = "welcome-client";

        // when (操作):
        let filter = default_filter(binary_name, "info");

        // then (期待する結果):
        assert_eq!(filter, "welcome_shared=info,welcome_client=info");
    }
}
