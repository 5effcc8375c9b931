// Build metadata reported by `GET /version` and `GET /health`

/// Controller version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit the binary was built from, when provided at build time
pub const GIT_COMMIT: &str = match option_env!("KAGENT_GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// Build date, when provided at build time
pub const BUILD_DATE: &str = match option_env!("KAGENT_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};
