//! Local storage key names shared by the session and history layers.

pub const ACCESS_TOKEN: &str = "access_token";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const USER_PROFILE: &str = "user_profile";
pub const LOGGED_IN: &str = "juris-logged-in";
/// Legacy history array written when the remote history service is unavailable.
pub const HISTORY: &str = "juris-history";
/// Case timelines built on this device.
pub const TIMELINES: &str = "juris-timelines";

/// Keys removed on logout.
pub const SESSION_KEYS: &[&str] = &[ACCESS_TOKEN, REFRESH_TOKEN, USER_PROFILE, LOGGED_IN];
