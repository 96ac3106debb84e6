/// Get environment variable with PAYSTACK_ prefix, falling back to unprefixed version
///
/// Checks `PAYSTACK_{key}` first, then `{key}`, for compatibility with
/// standard environment variable naming.
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("PAYSTACK_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
