/// Returns the cache key for a single appointment (the raw id).
pub fn appointment_key(id: &str) -> String {
    id.to_string()
}

/// Returns the cache key for the appointments booked by a user.
pub fn user_key(user_id: i64) -> String {
    format!("user_{}", user_id)
}

/// Returns the cache key for the appointments offered by a salon.
pub fn salon_key(salon_id: i64) -> String {
    format!("salon_{}", salon_id)
}
