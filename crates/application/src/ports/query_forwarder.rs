use async_trait::async_trait;

/// What a DoT connection needs from the resolution side.
///
/// Both operations are infallible: failures are already folded into a
/// SERVFAIL (or an empty buffer when not even that can be built).
#[async_trait]
pub trait QueryForwarder: Send + Sync {
    async fn forward(&self, query: &[u8]) -> Vec<u8>;

    fn error_response(&self, query: &[u8]) -> Vec<u8>;
}
