//! Vocabulary trainer core: lessons, the adaptive review scheduler, and the
//! collaborators it talks to (lesson store, translator, text generator).
//! The terminal front end lives in the `vokab` binary.

pub mod config;
pub mod generator;
pub mod http;
pub mod lesson;
pub mod scheduler;
pub mod store;
pub mod translate;
