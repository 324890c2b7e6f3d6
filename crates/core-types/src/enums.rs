use serde::{Deserialize, Serialize};

/// Which settlement leg of an order an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegKind {
    Near,
    Far,
}
