//! Field Record Storage
//!
//! Persistent storage for field records. The store never computes anything
//! itself; it holds whatever the service hands it.

pub mod fields;
pub mod persistence;

pub use fields::SledFieldStore;
pub use persistence::{FieldStore, InMemoryFieldStore, StoreError};

use chrono::{TimeZone, Utc};

use crate::types::FieldRecord;

/// The two fields a fresh installation starts with.
pub fn sample_fields() -> Vec<FieldRecord> {
    // 2024-01-15 and 2024-01-10, midnight UTC
    let north_updated = Utc.timestamp_opt(1_705_276_800, 0).single().unwrap_or_else(Utc::now);
    let south_updated = Utc.timestamp_opt(1_704_844_800, 0).single().unwrap_or_else(Utc::now);
    vec![
        FieldRecord::new("1", "North Field", "Plot A, Section 1", north_updated),
        FieldRecord::new("2", "South Field", "Plot B, Section 2", south_updated),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_fields_start_empty() {
        let samples = sample_fields();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].id, "1");
        assert_eq!(samples[1].location, "Plot B, Section 2");
        assert!(samples.iter().all(|f| !f.has_data()));
        assert!(samples[0].last_updated > samples[1].last_updated);
    }
}
