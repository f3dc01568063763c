//! Profile requests and their handlers.

mod details;
mod edit;
#[cfg(test)]
mod test_doubles;

pub use details::{ProfileDetails, ProfileDetailsHandler};
pub use edit::{DISPLAY_NAME_MAX_CHARS, EDIT_FAILED, EditProfile, EditProfileHandler};
