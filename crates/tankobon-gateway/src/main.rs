//! Tankobon upload gateway - admin file proxy to Bunny Storage

use clap::Parser;
use tankobon_gateway::{run_server, GatewayConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tankobon-upload")]
#[command(about = "Admin upload proxy for Tankobon comic storage")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "TANKOBON_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8787", env = "TANKOBON_PORT")]
    port: u16,

    /// Bunny storage zone name
    #[arg(long, env = "BUNNY_STORAGE_ZONE")]
    storage_zone: Option<String>,

    /// Bunny storage zone password
    #[arg(long, env = "BUNNY_STORAGE_API_KEY", hide_env_values = true)]
    storage_api_key: Option<String>,

    /// Public CDN hostname used in returned URLs
    #[arg(long, env = "BUNNY_CDN_HOSTNAME")]
    cdn_hostname: Option<String>,

    /// Primary storage region of the zone (ny, la, sg, de, uk, syd, br)
    #[arg(long, env = "BUNNY_STORAGE_REGION")]
    storage_region: Option<String>,

    /// HMAC secret for admin tokens
    #[arg(long, env = "ADMIN_JWT_SECRET", hide_env_values = true)]
    admin_jwt_secret: Option<String>,

    /// Timeout for each storage provider request (seconds)
    #[arg(long, default_value = "30", env = "TANKOBON_STORAGE_TIMEOUT_SECS")]
    storage_timeout_secs: u64,

    /// Maximum request body size (MB)
    #[arg(long, default_value = "100", env = "TANKOBON_MAX_BODY_MB")]
    max_body_mb: usize,

    /// Requests per second per client (0 disables rate limiting)
    #[arg(long, default_value = "50", env = "TANKOBON_RATE_LIMIT_RPS")]
    rate_limit_rps: u32,

    /// Rate limit on the x-forwarded-for client (set only behind a trusted proxy)
    #[arg(long, env = "TANKOBON_TRUST_FORWARDED_FOR")]
    trust_forwarded_for: bool,

    /// Enable debug logging
    #[arg(short, long, env = "TANKOBON_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "tankobon_gateway={0},tankobon_storage={0},tower_http=debug",
                log_level
            )
            .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tankobon upload gateway on {}:{}", args.host, args.port);

    match args.storage_region.as_deref().map(str::trim) {
        Some(region) if !region.is_empty() => tracing::info!("Storage region hint: {}", region),
        _ => tracing::info!("No storage region hint; probing every known region"),
    }

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        storage_zone: args.storage_zone,
        storage_api_key: args.storage_api_key,
        cdn_hostname: args.cdn_hostname,
        storage_region: args.storage_region,
        admin_jwt_secret: args.admin_jwt_secret,
        storage_timeout_secs: args.storage_timeout_secs,
        max_body_size: args.max_body_mb * 1024 * 1024,
        rate_limit_rps: args.rate_limit_rps,
        trust_forwarded_for: args.trust_forwarded_for,
    };

    run_server(config).await
}
