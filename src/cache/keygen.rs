//! Key generation for stored values.

use uuid::Uuid;

/// Produces fresh, never reused keys for stored values.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUID v4 keys (122 random bits).
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeyGenerator;

impl KeyGenerator for UuidKeyGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
