use serde::{Deserialize, Serialize};

use crate::entity::{fixtures, standings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultUpdate {
    pub fixture: fixtures::Model,
    pub home: standings::Model,
    pub away: standings::Model,
    /// The fixture already had a result, which was replaced
    pub rescored: bool,
}
