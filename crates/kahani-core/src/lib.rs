// Library root: the session state machine, request controller, reveal
// scheduler and the orchestrator loop that ties them together. The terminal
// front end lives in `kahani-tui`.

pub mod app;
pub mod client;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod copy;
pub mod protocol;
pub mod reveal;
pub mod session;
