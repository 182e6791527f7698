use crate::ports::DnsCodec;
use std::sync::Arc;
use tracing::{debug, warn};

/// Use case: answer a query that could not be resolved with SERVFAIL
pub struct ErrorResponder {
    codec: Arc<dyn DnsCodec>,
}

impl ErrorResponder {
    pub fn new(codec: Arc<dyn DnsCodec>) -> Self {
        Self { codec }
    }

    /// Builds a SERVFAIL echoing the query's identifier and question.
    ///
    /// Returns an empty buffer when not even the identifier and question can
    /// be recovered; the caller still frames it as a zero-length reply.
    pub fn create_error_response(&self, query_bytes: &[u8]) -> Vec<u8> {
        match self.codec.recover_query(query_bytes) {
            Some(query) => {
                let response = self.codec.build_servfail(&query);
                debug!(
                    id = query.id,
                    domain = %query.domain,
                    record_type = query.record_type_name(),
                    "Created SERVFAIL response"
                );
                response
            }
            None => {
                warn!(
                    query_len = query_bytes.len(),
                    "Failed to create error response: identifier and question unrecoverable"
                );
                Vec::new()
            }
        }
    }
}
