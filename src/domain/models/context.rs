use uuid::Uuid;

/// Per-request data handed explicitly to every admin operation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self { request_id: request_id.into() }
    }

    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}
