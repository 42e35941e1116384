// TUI widget modules for each dashboard panel.

pub mod help_bar;
pub mod player_list;
pub mod quit_confirm;
pub mod situation_chart;
pub mod status_bar;
