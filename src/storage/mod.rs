pub mod snapshot;

pub use snapshot::{SnapshotStore, StoredData};
