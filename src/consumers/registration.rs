//! Registration requests map 1:1 onto [`super::consumer::ConsumerEndpoint`]
//! via [`super::ConsumerRegistry::register`]. Keeping the request shape
//! separate from the stored consumer lets the HTTP layer (only `Http`
//! today) and test code (`InProcess`) share one registration path.

use std::collections::HashMap;
use std::sync::Arc;

use super::consumer::DeliveryHandler;

pub enum RegistrationRequest {
    Http {
        callback: String,
        topics: HashMap<String, Option<String>>,
    },
    InProcess {
        handler: Arc<dyn DeliveryHandler>,
        topics: HashMap<String, Option<String>>,
    },
    ExternalPush {
        endpoint: String,
        access_key: String,
        topics: HashMap<String, Option<String>>,
    },
}

impl RegistrationRequest {
    pub fn topics(&self) -> &HashMap<String, Option<String>> {
        match self {
            RegistrationRequest::Http { topics, .. } => topics,
            RegistrationRequest::InProcess { topics, .. } => topics,
            RegistrationRequest::ExternalPush { topics, .. } => topics,
        }
    }
}
