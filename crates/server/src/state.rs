use crate::auth::SessionStore;
use certverify_common::config::{AdminCredentials, AppConfig};
use certverify_common::links::VerificationLinks;
use certverify_common::qr::QrOptions;
use certverify_common::state::ListViewCache;
use certverify_common::store::RecordStore;
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    pub links: VerificationLinks,
    pub qr: QrOptions,
    pub sessions: SessionStore,
    pub admin: AdminCredentials,
    pub default_signer_name: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            store: RecordStore::new(db, ListViewCache::default()),
            links: VerificationLinks::new(config.public_base_url.clone()),
            qr: QrOptions::default(),
            sessions: SessionStore::default(),
            admin: config.admin.clone(),
            default_signer_name: config.default_signer_name.clone(),
        }
    }
}
