//! Diesel table definitions for the registry schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    admins (id) {
        id -> Int8,
        name -> Text,
        surname -> Text,
        email -> Text,
        password -> Text,
        active -> Bool,
    }
}

diesel::table! {
    users (id) {
        id -> Int8,
        name -> Text,
        surname -> Text,
        email -> Text,
        password -> Text,
        phone -> Int8,
    }
}

diesel::allow_tables_to_appear_in_same_query!(admins, users,);
