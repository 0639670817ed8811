mod cli;

use std::io::Write;
use std::process::ExitCode;

use crate::cli::{CacheBackendArg, Command, LogFormatArg, StorageBackend, CLI};
use anyhow::Context;
use clap::Parser;
use tinylink_cache::{LayeredCache, MokaUrlCache, NoopUrlCache, RedisUrlCache, UrlCache};
use tinylink_shortener::{ShortCode, Shortener, ShortenerConfig, ShortenerService};
use tinylink_storage::{InMemoryRepository, MySqlRepository, Repository};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = CLI::parse();
    init_tracing(cli.log_format);

    let config = cli.shortener_config();
    config.validate()?;

    info!(
        storage_backend = %cli.storage(),
        cache_backend = %cli.cache,
        code_length = config.code_length,
        max_code_length = config.max_code_length,
        "starting tinylink"
    );

    match cli.storage() {
        StorageBackend::InMemory => {
            warn!("in-memory storage selected, mappings are lost when the process exits");
            with_cache(&cli, config, InMemoryRepository::new()).await
        }
        StorageBackend::Mysql => {
            let mysql_dsn = cli
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required unless --in-memory is set")?;
            let repository = MySqlRepository::connect(mysql_dsn).await?;
            repository.ensure_schema().await?;
            with_cache(&cli, config, repository).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => subscriber.init(),
        LogFormatArg::Json => subscriber.json().init(),
    }
}

async fn with_cache<R: Repository>(
    cli: &CLI,
    config: ShortenerConfig,
    repository: R,
) -> anyhow::Result<ExitCode> {
    let redis = if cli.cache.needs_redis() {
        let redis_url = cli
            .redis_url
            .as_deref()
            .context("redis url is required for the selected cache backend")?;
        Some(RedisUrlCache::connect(redis_url).await?)
    } else {
        None
    };

    match (cli.cache, redis) {
        (CacheBackendArg::Moka, _) => {
            let cache = MokaUrlCache::with_capacity(cli.cache_capacity);
            run(cli, repository, cache, config).await
        }
        (CacheBackendArg::Redis, Some(redis)) => run(cli, repository, redis, config).await,
        (CacheBackendArg::Layered, Some(redis)) => {
            let cache = LayeredCache::new(MokaUrlCache::with_capacity(cli.cache_capacity), redis);
            run(cli, repository, cache, config).await
        }
        _ => run(cli, repository, NoopUrlCache, config).await,
    }
}

async fn run<R: Repository, C: UrlCache>(
    cli: &CLI,
    repository: R,
    cache: C,
    config: ShortenerConfig,
) -> anyhow::Result<ExitCode> {
    let service = ShortenerService::new(repository, cache, config)?;
    let mut stdout = std::io::stdout().lock();

    let missing = execute(
        &cli.command,
        &service,
        cli.base_url.as_deref(),
        &mut stdout,
    )
    .await?;

    if missing > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Runs `command` against `service`, writing one line per resolved code.
///
/// Returns how many codes could not be resolved. A code that is not well
/// formed counts as unresolved rather than stopping the batch.
async fn execute<S: Shortener>(
    command: &Command,
    service: &S,
    base_url: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<usize> {
    match command {
        Command::Shorten { urls } => {
            for url in urls {
                let code = service
                    .shorten(url)
                    .await
                    .with_context(|| format!("failed to shorten {url}"))?;
                match base_url {
                    Some(base) => writeln!(out, "{code}\t{}\t{url}", code.to_url(base))?,
                    None => writeln!(out, "{code}\t{url}")?,
                }
            }
            Ok(0)
        }
        Command::Expand { codes } => {
            let mut missing = 0usize;
            for raw in codes {
                let code: ShortCode = match raw.parse() {
                    Ok(code) => code,
                    Err(e) => {
                        warn!(code = %raw, error = %e, "malformed short code");
                        missing += 1;
                        continue;
                    }
                };
                match service
                    .expand(&code)
                    .await
                    .with_context(|| format!("failed to expand {code}"))?
                {
                    Some(url) => writeln!(out, "{code}\t{url}")?,
                    None => {
                        warn!(code = %code, "short code not found");
                        missing += 1;
                    }
                }
            }
            Ok(missing)
        }
    }
}
