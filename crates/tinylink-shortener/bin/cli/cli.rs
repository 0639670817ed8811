use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tinylink_shortener::config::{
    ShortenerConfig, DEFAULT_CODE_LENGTH, DEFAULT_MAX_CODE_LENGTH, DEFAULT_OP_TIMEOUT,
};

pub const IN_MEMORY_ENV: &str = "TINYLINK_IN_MEMORY";
pub const MYSQL_DSN_ENV: &str = "TINYLINK_MYSQL_DSN";
pub const CACHE_BACKEND_ENV: &str = "TINYLINK_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "TINYLINK_REDIS_URL";
pub const CACHE_CAPACITY_ENV: &str = "TINYLINK_CACHE_CAPACITY";
pub const CODE_LENGTH_ENV: &str = "TINYLINK_CODE_LENGTH";
pub const MAX_CODE_LENGTH_ENV: &str = "TINYLINK_MAX_CODE_LENGTH";
pub const OP_TIMEOUT_MS_ENV: &str = "TINYLINK_OP_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "TINYLINK_LOG_FORMAT";
pub const BASE_URL_ENV: &str = "TINYLINK_BASE_URL";

pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    InMemory,
    Mysql,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::InMemory => write!(f, "in-memory"),
            StorageBackend::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "none")]
    Disabled,
    #[value(name = "moka")]
    Moka,
    #[value(name = "redis")]
    Redis,
    /// Moka in front of Redis.
    #[value(name = "layered")]
    Layered,
}

impl CacheBackendArg {
    pub fn needs_redis(self) -> bool {
        matches!(self, CacheBackendArg::Redis | CacheBackendArg::Layered)
    }
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::Disabled => write!(f, "none"),
            CacheBackendArg::Moka => write!(f, "moka"),
            CacheBackendArg::Redis => write!(f, "redis"),
            CacheBackendArg::Layered => write!(f, "layered"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the short code for each URL, creating mappings as needed.
    Shorten {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Print the URL each short code points to.
    Expand {
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

#[derive(Debug, Parser)]
#[command(name = "tinylink", about = "Shorten URLs and expand short codes")]
pub struct CLI {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, env = MYSQL_DSN_ENV, required_unless_present = "in_memory")]
    pub mysql_dsn: Option<String>,

    /// Keep mappings in process memory. Nothing outlives the process.
    #[arg(long, env = IN_MEMORY_ENV, conflicts_with = "mysql_dsn")]
    pub in_memory: bool,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::Moka
    )]
    pub cache: CacheBackendArg,

    #[arg(
        long,
        env = REDIS_URL_ENV,
        required_if_eq_any([("cache", "redis"), ("cache", "layered")])
    )]
    pub redis_url: Option<String>,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: u64,

    #[arg(long, env = CODE_LENGTH_ENV, default_value_t = DEFAULT_CODE_LENGTH)]
    pub code_length: usize,

    #[arg(long, env = MAX_CODE_LENGTH_ENV, default_value_t = DEFAULT_MAX_CODE_LENGTH)]
    pub max_code_length: usize,

    #[arg(
        long,
        env = OP_TIMEOUT_MS_ENV,
        default_value_t = DEFAULT_OP_TIMEOUT.as_millis() as u64
    )]
    pub op_timeout_ms: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// Origin the short URLs are served from, e.g. `https://tl.example`.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,
}

impl CLI {
    pub fn storage(&self) -> StorageBackend {
        if self.in_memory {
            StorageBackend::InMemory
        } else {
            StorageBackend::Mysql
        }
    }

    pub fn shortener_config(&self) -> ShortenerConfig {
        ShortenerConfig::builder()
            .code_length(self.code_length)
            .max_code_length(self.max_code_length)
            .op_timeout(Duration::from_millis(self.op_timeout_ms))
            .build()
    }
}
