//! Character records and everything that keeps them: the roster, derived
//! armor class, on-disk storage and the debounced writer.

pub mod armor;
pub mod record;
pub mod roster;
pub mod store;
pub mod sync;

pub use armor::{derive_armor_class, ArmorBreakdown, ArmorCatalog};
pub use record::{Ability, CharacterRecord, EquipmentSlot, FieldError, ListKind};
pub use roster::{Roster, RosterError};
pub use store::{RosterStore, StoreError};
pub use sync::{SyncHandle, SyncStatus};
