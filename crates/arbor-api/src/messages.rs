//! Canned client-facing message strings. Handlers pick from this table so
//! wording stays consistent across routes.

pub const HOME: &str = "It is the Home Route";

pub const MISSING_FIELDS: &str = "You have not provided enough information";
pub const BAD_REFCODE: &str = "Your reference code is incorrect";
pub const USER_EXISTS: &str = "User already exists";
pub const WRONG_PASSWORD: &str = "The password you've provided is wrong";
pub const USER_NOT_FOUND: &str = "The user you were looking for was not found";
pub const POST_NOT_FOUND: &str = "No post was found in that name";

pub const USER_CREATED: &str = "User was successfully created";
pub const USER_EDITED: &str = "The user was successfully edited";
pub const USER_DELETED: &str = "The user was successfully deleted";
pub const LOGGED_OUT: &str =
    "If any user existed with that username/sessionkey, the user was successfully logged out";

pub const POST_CREATED: &str = "Post was successfully created";
pub const POST_EDITED: &str = "The post was successfully edited";
pub const POST_DELETED: &str = "The post was successfully deleted";

pub const SERVER_ERROR: &str = "We faced a problem in our server, and our developers have been \
                                notified of this problem. Please try again later.";
