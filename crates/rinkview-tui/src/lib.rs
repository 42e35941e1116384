// Terminal dashboard for per-season skater metrics.

pub mod app;
pub mod protocol;
pub mod source;
pub mod tui;
