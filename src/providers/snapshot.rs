use crate::core::commission::{CommissionRecord, RawCommission, normalize_commissions};
use crate::core::partner::{PartnerSafeRecord, RawPartnerSafe, normalize_partner_safes};
use crate::core::repository::PartnerRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    partner_safes: Vec<RawPartnerSafe>,
    #[serde(default)]
    bonuses: Vec<RawCommission>,
}

/// Reads the ledger from a JSON export of the backend, for offline use.
pub struct SnapshotRepository {
    path: PathBuf,
}

impl SnapshotRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SnapshotRepository {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn read(&self) -> Result<SnapshotFile> {
        debug!("Reading ledger snapshot from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read snapshot file: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot file: {}", self.path.display()))
    }
}

#[async_trait]
impl PartnerRepository for SnapshotRepository {
    async fn fetch_partner_safes(&self) -> Result<Vec<PartnerSafeRecord>> {
        Ok(normalize_partner_safes(self.read().await?.partner_safes))
    }

    async fn fetch_commissions(&self) -> Result<Vec<CommissionRecord>> {
        Ok(normalize_commissions(self.read().await?.bonuses))
    }
}
