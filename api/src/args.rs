use clap::Parser;
use plateful_core::domain::common::{PlanSettings, PlatefulConfig, RecordStoreConfig};

#[derive(Debug, Clone, Parser)]
#[command(name = "plateful-api", version, about = "Meal plan customization API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub record_store: RecordStoreArgs,

    #[command(flatten)]
    pub plan: PlanArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct RecordStoreArgs {
    #[arg(
        long = "record-store-url",
        env = "RECORD_STORE_URL",
        default_value = "https://api.airtable.com/v0"
    )]
    pub url: String,

    #[arg(long = "record-store-base-id", env = "RECORD_STORE_BASE_ID")]
    pub base_id: String,

    #[arg(
        long = "record-store-api-key",
        env = "RECORD_STORE_API_KEY",
        hide_env_values = true
    )]
    pub api_key: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct PlanArgs {
    /// Sauce ingredient ids always offered, in display order.
    #[arg(long = "standard-sauce-ids", env = "STANDARD_SAUCE_IDS", value_delimiter = ',')]
    pub standard_sauce_ids: Vec<String>,

    #[arg(long = "max-quantity", env = "MAX_QUANTITY", default_value_t = 20)]
    pub max_quantity: u32,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "RUST_LOG", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for PlatefulConfig {
    fn from(args: Args) -> Self {
        PlatefulConfig {
            record_store: RecordStoreConfig {
                base_url: args.record_store.url,
                base_id: args.record_store.base_id,
                api_key: args.record_store.api_key,
            },
            plan: PlanSettings {
                standard_sauce_ids: args
                    .plan
                    .standard_sauce_ids
                    .into_iter()
                    .map(|id| id.trim().to_string())
                    .filter(|id| !id.is_empty())
                    .collect(),
                max_quantity: args.plan.max_quantity,
            },
        }
    }
}

#[cfg(test)]
pub(crate) fn test_args() -> Args {
    Args::try_parse_from([
        "plateful-api",
        "--server-root-path",
        "",
        "--record-store-base-id",
        "appTest",
        "--record-store-api-key",
        "key",
        "--standard-sauce-ids",
        "recPesto, ,recBbq",
        "--max-quantity",
        "8",
    ])
    .unwrap()
}
