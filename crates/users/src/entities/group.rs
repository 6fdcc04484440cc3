use serde::{Deserialize, Serialize};

use crate::types::GroupId;

/// Named collection of accounts, exposed read-only over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}
