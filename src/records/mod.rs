pub mod error;
pub mod export;
pub mod guard;
pub mod history;
pub mod local;
pub mod supabase;
pub mod types;

pub use error::StoreError;
pub use export::{export_csv, to_csv};
pub use guard::{SubmitGuard, SubmitRejected, SubmitState, SubmitTicket};
pub use history::HistorySummary;
pub use local::{get_records_path, LocalStore};
pub use supabase::SupabaseStore;
pub use types::DailyRecord;

use crate::config::{Backend, StoreConfig};

/// The append-only record store, local or remote
#[derive(Debug, Clone)]
pub enum RecordStore {
    Local(LocalStore),
    Supabase(SupabaseStore),
}

impl RecordStore {
    /// Short description for verbose output
    pub fn describe(&self) -> String {
        match self {
            RecordStore::Local(store) => format!("local file {}", store.path().display()),
            RecordStore::Supabase(store) => format!("supabase {}", store.endpoint()),
        }
    }

    /// Append one record. Records with non-finite figures are refused.
    pub async fn append(&self, record: &DailyRecord) -> Result<(), StoreError> {
        record.check_finite()?;
        match self {
            RecordStore::Local(store) => store.append(record),
            RecordStore::Supabase(store) => store.append(record).await,
        }
    }

    /// One user's records, oldest first
    pub async fn fetch_for_user(&self, user_id: &str) -> Result<Vec<DailyRecord>, StoreError> {
        match self {
            RecordStore::Local(store) => store.fetch_for_user(user_id),
            RecordStore::Supabase(store) => store.fetch_for_user(user_id).await,
        }
    }

    /// Every record, newest first. Callers gate this behind the admin check.
    pub async fn fetch_all(&self) -> Result<Vec<DailyRecord>, StoreError> {
        match self {
            RecordStore::Local(store) => store.fetch_all(),
            RecordStore::Supabase(store) => store.fetch_all().await,
        }
    }
}

/// Open the configured store. `api_key` is only called for remote backends.
pub fn open_store<F>(config: &StoreConfig, api_key: F) -> anyhow::Result<RecordStore>
where
    F: FnOnce() -> anyhow::Result<String>,
{
    match config.backend {
        Backend::Local => {
            let path = config.path.clone().unwrap_or_else(get_records_path);
            Ok(RecordStore::Local(LocalStore::new(path)))
        }
        Backend::Supabase => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("store.url is required for the supabase backend"))?;
            let key = api_key()?;
            let store = SupabaseStore::new(url, config.table(), &key, config.timeout())?;
            Ok(RecordStore::Supabase(store))
        }
    }
}
