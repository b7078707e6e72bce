mod index;
mod model;

pub use index::{Endpoint, JoinKey, JoinMode, NodeIndex, PositionKey};
pub use model::{Dataset, EdgeRecord, NodeRecord, Notice, PeriodSlice, Position, TableKind};
