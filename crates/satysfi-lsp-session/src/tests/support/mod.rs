//! Shared test doubles.

mod recording_client;

pub use recording_client::{
    ClientEvent, FormatFailure, RecordingClientFactory, RecordingFactoryHandle, ScriptedBehaviour,
};
