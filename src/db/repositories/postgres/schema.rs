//! Diesel table definitions for the schemas backend.

diesel::table! {
    /// Single-row counter providing monotonic schema id allocation.
    schema_counter (singleton) {
        singleton -> Bool,
        next_id -> BigInt,
    }
}

diesel::table! {
    /// Schema documents, keyed by their allocated id.
    schemas (id) {
        id -> BigInt,
        user_id -> BigInt,
        document -> Jsonb,
    }
}

diesel::allow_tables_to_appear_in_same_query!(schema_counter, schemas);
