//! Data source abstractions

use crate::core::commission::CommissionRecord;
use crate::core::partner::PartnerSafeRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Read access to the back-office ledger.
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Current balance snapshot of every partner safe.
    async fn fetch_partner_safes(&self) -> Result<Vec<PartnerSafeRecord>>;

    /// Recorded commissions (bonuses), oldest first as the backend returns them.
    async fn fetch_commissions(&self) -> Result<Vec<CommissionRecord>>;
}
