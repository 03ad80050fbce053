/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// New record key (UUID v4, no hyphens)
///
/// Hyphen-free keys keep SurrealDB record ids unescaped.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
