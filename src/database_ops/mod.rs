pub mod exchange;
pub mod refresh;
pub mod sources;
pub mod store;
pub mod transform;

pub use refresh::{RefreshError, RefreshService, RefreshSummary};
pub use store::{open_store, Country, CountryStore, NewCountry, SharedStore, StoreError};
