pub mod session {

    pub const LIFETIME_DAYS: i64 = 7;

    pub const DEFAULT_COOKIE_NAME: &str = "session_id";
}

pub mod limits {

    pub const MIN_USERNAME_LEN: usize = 3;

    pub const MIN_PASSWORD_LEN: usize = 6;
}

pub mod messages {

    pub const NOT_AUTHENTICATED: &str = "Not authenticated";

    pub const INVALID_SESSION: &str = "Invalid or expired session";

    pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

    pub const USERNAME_TAKEN: &str = "Username already exists";
}
