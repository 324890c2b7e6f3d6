pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::LegKind;
pub use structs::{
    CashToTradeExposure, Counterparty, ExecutionTypeData, Leg, LegAccount, Order,
    ParentChildrenResults, SplitOrderStagesDetail, TradeAwayComponent,
};
