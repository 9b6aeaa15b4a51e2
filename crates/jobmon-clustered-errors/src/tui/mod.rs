/*
[INPUT]:  ErrorLogSource, ClusteredErrorsPanel, log buffer
[OUTPUT]: Interactive clustered errors browser
[POS]:    TUI module for the jobmon-clustered-errors binary
[UPDATE]: When adding TUI submodules or changing exports
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

pub(crate) use runtime::{LOG_BUFFER_CAPACITY, LogBuffer, LogWriterFactory, run_tui_with_log};
