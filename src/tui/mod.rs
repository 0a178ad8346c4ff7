pub mod confirm_overlay;
pub mod footer;
pub mod header;
pub mod menu;
pub mod render;
pub mod spinner;
pub mod status;
