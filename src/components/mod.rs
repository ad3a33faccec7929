pub mod cache_controls;
pub mod tab_panel;
