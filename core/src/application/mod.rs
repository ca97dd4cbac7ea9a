use tracing::info;

use crate::{
    domain::common::{PlanSettings, PlatefulConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::{
        backend::RecordBackend, memory::InMemoryRecordStore, record_store::RecordStore,
    },
};

pub type PlatefulService =
    Service<RecordBackend, RecordBackend, RecordBackend, RecordBackend, RecordBackend>;

/// Service backed by the remote record store.
pub fn create_service(config: PlatefulConfig) -> Result<PlatefulService, CoreError> {
    if config.record_store.base_url.trim().is_empty() || config.record_store.base_id.trim().is_empty()
    {
        return Err(CoreError::Invalid(
            "record store url and base id are required".to_string(),
        ));
    }

    info!(
        base_url = %config.record_store.base_url,
        standard_sauces = config.plan.standard_sauce_ids.len(),
        max_quantity = config.plan.max_quantity,
        "creating plan service"
    );

    let backend = RecordBackend::Remote(RecordStore::new(&config.record_store));
    Ok(with_backend(backend, config.plan))
}

/// Service backed by a process-local store, for tests and local runs.
pub fn create_memory_service(
    store: InMemoryRecordStore,
    settings: PlanSettings,
) -> PlatefulService {
    with_backend(RecordBackend::Memory(store), settings)
}

fn with_backend(backend: RecordBackend, settings: PlanSettings) -> PlatefulService {
    Service::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend,
        settings,
    )
}
