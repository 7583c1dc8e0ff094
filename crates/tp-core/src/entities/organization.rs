use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A developer account. Used solely to compute an access scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Organization {
    pub id: i64,
    pub developer_key: String,
    pub is_admin: bool,
}
