//! Diesel schema for task persistence.

diesel::table! {
    /// Task rows in flat record encoding.
    tasks (id) {
        /// Task identifier (UUID text).
        id -> Text,
        /// Trimmed display name.
        name -> Text,
        /// Category label, possibly empty.
        category -> Text,
        /// Canonical status string.
        status -> Text,
        /// Creation timestamp (RFC 3339).
        created_at -> Text,
        /// Latest status change timestamp (RFC 3339).
        last_updated -> Text,
        /// Closing timestamp (RFC 3339), if closed.
        completed_at -> Nullable<Text>,
    }
}
