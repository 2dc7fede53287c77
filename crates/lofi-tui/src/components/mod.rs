pub mod header;
pub mod help_overlay;
pub mod home;
pub mod liked_songs;
pub mod player_bar;
pub mod queue_overlay;
pub mod search;
pub mod sidebar;
pub mod track_list;
