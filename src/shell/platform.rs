//! Platform detection.

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Shell executable and the flag that passes it a command string.
pub(crate) fn shell_program() -> (String, &'static str) {
    if cfg!(target_os = "windows") {
        (
            std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string()),
            "/C",
        )
    } else {
        ("/bin/sh".to_string(), "-c")
    }
}

/// Quote a value so the platform shell passes it as a single literal word.
///
/// POSIX: wrap in single quotes, with embedded `'` written as `'\''`.
/// Windows `cmd`: wrap in double quotes and drop characters `cmd` would
/// still expand inside them.
pub fn quote_arg(value: &str) -> String {
    if cfg!(target_os = "windows") {
        let cleaned: String = value
            .chars()
            .filter(|c| !matches!(c, '"' | '%' | '^' | '!'))
            .collect();
        format!("\"{}\"", cleaned)
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}
