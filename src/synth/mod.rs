//! Voice management: events in, per-voice control signals and rendered
//! voice graphs out.
//!
//! `message` defines the events, `input` allocates voices and writes their
//! signals through `change_list`s, and `poly` runs one graph per voice
//! against those signals.

pub mod change_list;
pub mod factory;
pub mod input;
pub mod message;
pub mod poly;
pub mod signals;
pub mod voice;

pub use change_list::ChangeList;
pub use factory::{ChainFactory, VoiceFactory};
pub use input::InputToSignals;
pub use message::{ControlEvent, EventKind, EventSource};
pub use poly::PolySynth;
pub use signals::{VoiceSignal, VoiceSignals};
pub use voice::{Voice, VoiceState};
