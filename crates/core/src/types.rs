/// Backend identifiers are opaque strings assigned by the GraphQL API.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Solution identifier shared by the stack description and usage metrics.
pub const SOLUTION_ID: &str = "SO0071";
