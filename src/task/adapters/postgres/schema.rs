//! Diesel schema for task persistence.

diesel::table! {
    /// Owner-scoped task records.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owner identifier from the identity provider.
        #[max_length = 255]
        user_id -> Varchar,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Priority label.
        #[max_length = 16]
        priority -> Varchar,
        /// Difficulty label.
        #[max_length = 16]
        difficulty -> Varchar,
        /// Completion flag.
        completed -> Bool,
        /// Whether the completion reward has been granted.
        xp_awarded -> Bool,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Completion timestamp while completed.
        completed_at -> Nullable<Timestamptz>,
    }
}
