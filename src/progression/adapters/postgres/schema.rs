//! Diesel schema for progression persistence.

diesel::table! {
    /// One progression row per owner.
    user_progress (user_id) {
        /// Owner identifier from the identity provider.
        #[max_length = 255]
        user_id -> Varchar,
        /// Current level.
        level -> Int4,
        /// XP within the current level.
        current_xp -> Int8,
        /// Cumulative XP.
        total_xp -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
