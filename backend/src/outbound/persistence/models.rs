//! Diesel row structs. Internal to the persistence adapter.

use diesel::prelude::*;

use super::schema::user_profiles;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub username: &'a str,
    pub display_name: &'a str,
    pub bio: Option<&'a str>,
}

/// Full overwrite of the mutable columns. `None` clears the bio.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileUpdate<'a> {
    pub display_name: &'a str,
    pub bio: Option<&'a str>,
}
