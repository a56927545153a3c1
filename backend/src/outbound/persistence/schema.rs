//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts table.
    ///
    /// The `email` column is unique and always stored normalised.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login email, domain part lowercased (max 255 characters).
        email -> Varchar,
        /// Display name, possibly empty (max 255 characters).
        name -> Varchar,
        /// PHC-encoded Argon2id hash.
        password_hash -> Text,
        /// Whether the account may authenticate.
        is_active -> Bool,
        /// Staff flag.
        is_staff -> Bool,
        /// Superuser flag; implies staff.
        is_superuser -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// API tokens, at most one per user.
    auth_tokens (key) {
        /// Primary key: 40 lowercase hex characters.
        key -> Varchar,
        /// Owning user; unique.
        user_id -> Uuid,
        /// Issue timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe tags owned by a user.
    tags (id) {
        /// Primary key: database sequence.
        id -> Int8,
        /// Owning user.
        user_id -> Uuid,
        /// Tag name (max 255 characters).
        name -> Varchar,
    }
}

diesel::table! {
    /// Recipe ingredients owned by a user.
    ingredients (id) {
        /// Primary key: database sequence.
        id -> Int8,
        /// Owning user.
        user_id -> Uuid,
        /// Ingredient name (max 255 characters).
        name -> Varchar,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(ingredients -> users (user_id));
diesel::joinable!(tags -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(auth_tokens, ingredients, tags, users,);
