//! Parameter system: ranged, warpable published parameters on the control
//! thread, atomic cells and block snapshots on the audio thread.
//!
//! ```text
//! control thread                          audio thread
//! ──────────────                          ────────────
//! ParamTable::set(name, v)
//!   ├─ PublishedParam  clamp / warp / snap
//!   ├─ SharedParams    atomic store  ───────→  snapshot() once per block
//!   └─ PropertySet     notify listeners            │
//!                                                  ▼
//!                                             ParamSnapshot → voices, nodes
//! ```

pub mod engine_params;
pub mod group;
pub mod property;
pub mod published;
pub mod shared;
pub mod table;

pub use engine_params::{EngineParam, ParamSpec};
pub use group::ParamGroupMap;
pub use property::{ListenerToken, Property, PropertyListener, PropertySet};
pub use published::{PublishedParam, Warp};
pub use shared::{AtomicF32, ParamSnapshot, SharedParams};
pub use table::ParamTable;
