//! Analytics repository trait: count and group-count primitives.
//!
//! The aggregation reporter in [`crate::services::analytics`] is built on
//! these two queries plus the plain entity listings; everything else is
//! computed fresh per request in the service layer.

use std::collections::HashMap;

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::SchoolId;

/// Total document counts for the main collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub schools: u64,
    pub students: u64,
    pub teachers: u64,
    pub complaints: u64,
}

/// Repository trait for aggregate queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Count documents in each main collection.
    async fn count_entities(&self) -> RepositoryResult<EntityCounts>;

    /// Group-count complaints by school.
    ///
    /// Complaints without a school group under the `None` key. Schools with
    /// no complaints have no entry; callers must default missing schools to
    /// zero.
    async fn complaint_counts_by_school(
        &self,
    ) -> RepositoryResult<HashMap<Option<SchoolId>, u64>>;
}
