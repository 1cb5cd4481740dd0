//! Esquema Diesel (mantenido a mano, reemplazable con `diesel print-schema`).

diesel::table! {
    workflow_checkpoints (session_id, workflow_key) {
        session_id -> Text,
        workflow_key -> Text,
        run_id -> Uuid,
        status -> Text,
        definition_hash -> Text,
        state -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    workflow_events (seq) {
        seq -> BigInt,
        run_id -> Uuid,
        ts -> Timestamptz,
        event_type -> Text,
        payload -> Jsonb,
    }
}

diesel::allow_tables_to_appear_in_same_query!(workflow_checkpoints, workflow_events,);
