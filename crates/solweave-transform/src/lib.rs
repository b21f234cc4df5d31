/*!
Model transforms applied between feature wiring and printing.

Two concerns live here: switching a contract's construction plan to the
proxy-upgradeable initializer pattern, and carving out ERC-7201 namespaced
storage with its deterministically derived slot.
*/

pub mod namespaced;
pub mod upgradeable;

pub use namespaced::{
    namespace_id, namespaced_storage_slot, set_namespaced_storage, storage_getter_signature,
    storage_struct_instantiation,
};
pub use upgradeable::{
    authorize_upgrade_signature, modifier_guard, only_entry_point_or_self, only_governance,
    set_upgradeable, Upgradeable,
};
