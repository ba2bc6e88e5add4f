//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Provisioned member accounts.
    accounts (id) {
        id -> Uuid,
        /// Lower-cased, unique.
        email -> Varchar,
        full_name -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        email_verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Anonymous requests for access awaiting an admin decision.
    access_requests (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        reason -> Nullable<Text>,
        /// One of `pending`, `provisioning`, `approved`, `rejected`.
        status -> Varchar,
        created_at -> Timestamptz,
        decided_at -> Nullable<Timestamptz>,
        decided_by -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// One profile row per account, created empty at provisioning.
    profiles (user_id) {
        user_id -> Uuid,
        mobile -> Nullable<Varchar>,
        date_of_birth -> Nullable<Date>,
        university_roll_number -> Nullable<Varchar>,
        profile_completed -> Bool,
    }
}

diesel::table! {
    /// Role grants; the pair is the primary key.
    user_roles (user_id, role) {
        user_id -> Uuid,
        role -> Varchar,
    }
}

diesel::table! {
    /// Calendar events shared with the hackathon.
    events (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        event_date -> Date,
        created_by -> Uuid,
        /// `shared` or `private`.
        visibility -> Varchar,
        approved -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Personal to-do items.
    tasks (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Varchar,
        /// `low`, `medium` or `high`.
        priority -> Varchar,
        done -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user notification feed entries.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        message -> Text,
        read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(profiles -> accounts (user_id));
diesel::joinable!(user_roles -> accounts (user_id));
diesel::joinable!(events -> accounts (created_by));
diesel::joinable!(tasks -> accounts (user_id));
diesel::joinable!(notifications -> accounts (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    accounts,
    access_requests,
    profiles,
    user_roles,
    events,
    tasks,
    notifications,
);
