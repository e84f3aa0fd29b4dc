//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Teams keyed by a generated UUID; names are unique.
    teams (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Users and the team they currently belong to.
    users (id) {
        id -> Varchar,
        username -> Varchar,
        team_id -> Uuid,
        is_active -> Bool,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pull requests. `merged_at` is set exactly when `status = 'MERGED'`.
    pull_requests (id) {
        id -> Varchar,
        name -> Varchar,
        author_id -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
        merged_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Reviewer slots. Unique per `(pull_request_id, reviewer_id)`.
    pull_request_reviewers (pull_request_id, slot) {
        pull_request_id -> Varchar,
        slot -> Int2,
        reviewer_id -> Varchar,
        assigned_at -> Timestamptz,
    }
}

diesel::joinable!(users -> teams (team_id));
diesel::joinable!(pull_requests -> users (author_id));
diesel::joinable!(pull_request_reviewers -> pull_requests (pull_request_id));
diesel::joinable!(pull_request_reviewers -> users (reviewer_id));

diesel::allow_tables_to_appear_in_same_query!(teams, users, pull_requests, pull_request_reviewers,);
