use rusqlite::Connection;

use crate::auth::{EmailAddress, PasswordHash, UserID, Username, create_user};

/// Insert a user called `username` so records can reference it, returning its ID.
#[track_caller]
pub(crate) fn insert_test_user(username: &str, connection: &Connection) -> UserID {
    create_user(
        &Username::new(username).unwrap(),
        &EmailAddress::new(&format!("{username}@example.com")).unwrap(),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .unwrap()
    .id
}
