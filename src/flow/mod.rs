//! Flow domain model
//!
//! Preferences, itineraries, conversation messages and the normalization
//! boundary between raw model output and these types.

pub mod message;
pub mod normalize;
pub mod preferences;
pub mod types;

pub use message::{HistoryEntry, Message, Role};
pub use normalize::{
    normalize_flow, normalize_stops, total_duration, FlowDefaults, LinkSynthesizer, StopBounds,
    DEFAULT_STOP_MINUTES, MAX_STOP_MINUTES,
};
pub use preferences::{Budget, TimeOfDay, UserPreferences, MAX_GROUP_SIZE};
pub use types::{Coordinates, Flow, FlowStop};
