//! Service wiring: the explicitly-constructed dependencies every handler
//! uses, injected as one extension.

use std::sync::Arc;

use souk_auth::Hs256TokenCodec;
use souk_store::Database;

/// Shared application services.
///
/// Built once at startup from an explicit store handle and token secret;
/// there is no process-wide database or config singleton.
pub struct AppServices {
    db: Database,
    tokens: Arc<Hs256TokenCodec>,
}

impl AppServices {
    pub fn new(db: Database, tokens: Arc<Hs256TokenCodec>) -> Self {
        Self { db, tokens }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn tokens(&self) -> &Hs256TokenCodec {
        &self.tokens
    }
}
