//! Diesel table definitions; must match `backend/migrations`.

diesel::table! {
    /// Public user profiles keyed by username.
    user_profiles (username) {
        username -> Varchar,
        display_name -> Varchar,
        bio -> Nullable<Text>,
        created_at -> Timestamptz,
        /// Maintained by the `user_profiles_touch_updated_at` trigger.
        updated_at -> Timestamptz,
    }
}
