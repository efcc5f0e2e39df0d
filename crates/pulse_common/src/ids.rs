use uuid::Uuid;

/// New opaque, time-ordered identifier (UUID v7).
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}
