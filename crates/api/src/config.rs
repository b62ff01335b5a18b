use std::path::PathBuf;

use ytgrab_core::supervisor::SupervisorConfig;

/// Wildcard entry in `CORS_ORIGINS` that allows any origin.
pub const CORS_ANY_ORIGIN: &str = "*";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3032`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Path to the `yt-dlp` executable.
    pub ytdlp_bin: PathBuf,
    /// Directory downloads are written to and served from.
    pub downloads_dir: PathBuf,
    /// Maximum number of concurrently running downloads (unset = unbounded).
    pub max_concurrent_jobs: Option<usize>,
    /// How long finished jobs stay queryable, in seconds (unset = forever).
    pub job_retention_secs: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default          |
    /// |------------------------|------------------|
    /// | `HOST`                 | `0.0.0.0`        |
    /// | `PORT`                 | `3032`           |
    /// | `CORS_ORIGINS`         | `*`              |
    /// | `REQUEST_TIMEOUT_SECS` | `60`             |
    /// | `YTDLP_BIN`            | `./bin/yt-dlp`   |
    /// | `DOWNLOADS_DIR`        | `./downloads`    |
    /// | `MAX_CONCURRENT_JOBS`  | unset            |
    /// | `JOB_RETENTION_SECS`   | unset            |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3032".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| CORS_ANY_ORIGIN.into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let ytdlp_bin = std::env::var("YTDLP_BIN")
            .unwrap_or_else(|_| "./bin/yt-dlp".into())
            .into();

        let downloads_dir = std::env::var("DOWNLOADS_DIR")
            .unwrap_or_else(|_| "./downloads".into())
            .into();

        let max_concurrent_jobs = std::env::var("MAX_CONCURRENT_JOBS").ok().map(|v| {
            v.parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .expect("MAX_CONCURRENT_JOBS must be a positive integer")
        });

        let job_retention_secs = std::env::var("JOB_RETENTION_SECS").ok().map(|v| {
            v.parse::<u64>()
                .expect("JOB_RETENTION_SECS must be a valid u64")
        });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            ytdlp_bin,
            downloads_dir,
            max_concurrent_jobs,
            job_retention_secs,
        }
    }

    /// Settings handed to the download supervisor.
    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            binary: self.ytdlp_bin.clone(),
            downloads_dir: self.downloads_dir.clone(),
            max_concurrent_jobs: self.max_concurrent_jobs,
        }
    }
}
