//! Users, passwords, the auth cookie, and the pages and middleware built on them.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod profile;
mod redirect;
mod register_user;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_api};
pub use password::{PasswordHash, ValidatedPassword};
pub use profile::get_profile;
pub use register_user::{get_register_page, register_user};
pub use user::{User, UserID, create_user_table, get_user_by_id, get_user_by_username};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
#[cfg(test)]
pub(crate) use user::{EmailAddress, Username, create_user};
