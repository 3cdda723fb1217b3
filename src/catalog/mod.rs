//! Static quest catalogs.
//!
//! Each demo variant draws its quests from exactly one catalog, and each
//! catalog is bound to one pillar family so XP buckets never mix.

mod data;
mod types;

#[allow(unused_imports)]
pub use data::{catalog_for, core_catalog, diploma_catalog};
#[allow(unused_imports)]
pub use types::{CatalogError, Pillar, PillarSet, Quest, QuestCatalog, Task};
