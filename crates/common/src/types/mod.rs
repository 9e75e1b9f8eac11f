use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by count-style queries.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CountResponse {
    pub query: String,
    pub count: u64,
}

/// Body returned by bulk update endpoints.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UpdatedResponse {
    pub updated: u64,
}
