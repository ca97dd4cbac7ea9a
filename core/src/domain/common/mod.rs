use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

pub mod entities;
pub mod services;

#[derive(Clone, Debug)]
pub struct PlatefulConfig {
    pub record_store: RecordStoreConfig,
    pub plan: PlanSettings,
}

#[derive(Clone, Debug)]
pub struct RecordStoreConfig {
    pub base_url: String,
    pub base_id: String,
    pub api_key: String,
}

/// Tunables for the customization engine.
#[derive(Clone, Debug)]
pub struct PlanSettings {
    /// Sauces always offered in the sauce picker, in display order.
    pub standard_sauce_ids: Vec<String>,
    pub max_quantity: u32,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            standard_sauce_ids: Vec::new(),
            max_quantity: 20,
        }
    }
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, 0);

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}
