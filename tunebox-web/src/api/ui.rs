//! Static form pages
//!
//! Forms post back to their own URL, so one page serves every
//! `/create_playlist/:id` and `/add_music/:id`.

pub const LOGIN_HTML: &str = include_str!("../ui/login.html");
pub const REGISTER_HTML: &str = include_str!("../ui/register.html");
pub const CREATE_PLAYLIST_HTML: &str = include_str!("../ui/create_playlist.html");
pub const ADD_MUSIC_HTML: &str = include_str!("../ui/add_music.html");
