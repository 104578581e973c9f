use chrono::Utc;

use crate::stores::RevocationList;

/// Drop revocation entries for tokens that have expired on their own
pub async fn purge_revoked(revocations: &dyn RevocationList) -> Result<u64, Box<dyn std::error::Error>> {
    let purged = revocations.purge_expired(Utc::now()).await?;

    tracing::info!(purged, "Purged expired revocation entries");
    println!("✓ Removed {} expired revocation entries", purged);

    Ok(purged)
}
