use crate::enums::LegKind;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A staged FX order as returned by the order-details stored function,
/// with its settlement legs, per-leg accounts and counterparty candidates
/// fully reconstructed.
///
/// Orders are immutable value snapshots: they are built in one mapping
/// pass over a single result set and never mutated afterwards. The
/// business rules that act on them (netting, splitting, execution-type
/// selection) live in the database, not here.
///
/// Invariant: `far_leg` is `Some` if and only if `num_legs == 2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub oms_number: Option<String>,
    pub order_type: Option<String>,
    pub order_sub_type: Option<String>,
    pub order_sub_status: Option<String>,
    pub input_user_email: Option<String>,
    pub order_source: Option<String>,
    pub trade_date: NaiveDate,
    pub ccy_pair: String,
    pub ccy_base: String,
    pub base_is_restricted: bool,
    pub ccy_term: String,
    pub term_is_restricted: bool,
    pub ccy_dealt: String,
    pub dealt_is_base: bool,
    pub ccy_contra: String,
    pub counterparty_selection_action_code: Option<String>,
    pub execution_type: Option<String>,
    /// 1 for an outright, 2 for a swap.
    pub num_legs: i64,
    pub near_leg: Leg,
    pub far_leg: Option<Leg>,
    pub max_rfq_group_size: i64,
    pub split_action_code: Option<String>,
    pub split_overhang_action: Option<String>,
    pub split_target_volume: Option<Decimal>,
    /// Candidate counterparties for this order, ranked by value.
    pub counterparties: Vec<Counterparty>,
}

/// One settlement side of an order: its own value date, dealt quantity
/// and the accounts participating in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub kind: LegKind,
    pub side: String,
    pub buy_sell_base: String,
    pub value_date: NaiveDate,
    pub dealt_quantity: Decimal,
    pub dealt_quantity_usd: Decimal,
    /// Account count as reported by the database; equals `accounts.len()`
    /// on a well-formed row.
    pub account_count: i64,
    pub accounts: Vec<LegAccount>,
}

/// One account's participation in a leg, decoded from a single
/// composite sub-record of the leg's accounts array.
///
/// `order_id` and `leg` are the back-references to the owning order and
/// leg; ownership points the other way (the leg owns its accounts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegAccount {
    pub order_id: i64,
    pub leg: LegKind,
    pub account_base_ccy: String,
    pub is_nettable: bool,
    pub account_number: String,
    pub dealt_quantity: Decimal,
    pub has_counterparty_credit_restrictions: bool,
    pub has_owner_counterparty_restrictions: bool,
    pub min_nettable_amount_usd: Decimal,
    pub side: String,
    /// Every account owns exactly one trade-away fee component.
    pub trade_away: TradeAwayComponent,
}

/// The trade-away cost fields associated with one account's
/// participation in a leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAwayComponent {
    pub expected_custodian_slippage: Decimal,
    pub trade_away_fee_usd: Decimal,
    pub trade_away_fee_usd_terms_cross_rate: Decimal,
    pub trade_away_fee_terms_base_cross_rate: Decimal,
}

/// A counterparty candidate for an order.
///
/// `order_id` is `Some` when the candidate was decoded from an order's
/// embedded candidates array and `None` when it came from the
/// standalone candidates lookup, which returns counterparties without
/// an owning order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counterparty {
    pub order_id: Option<i64>,
    pub abbreviation: String,
    pub venue: String,
    pub venue_short_code: String,
    pub default_volume_in_order: Decimal,
    pub is_account_default: bool,
    pub is_credit_permitted: bool,
    pub is_owner_permitted: bool,
    pub ranking_by_value: i64,
    pub num_child_orders: i64,
}

/// The result of a netting or splitting operation: the generated parent
/// order plus the ordered child orders it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentChildrenResults {
    pub parent_order_id: i64,
    pub child_order_ids: Vec<i64>,
}

/// One cash exposure eligible for conversion into a trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashToTradeExposure {
    pub cash_details_id: i64,
    pub account_number: String,
    pub ccy: String,
    pub exposure_amount: Decimal,
    pub exposure_amount_usd: Decimal,
    pub value_date: NaiveDate,
    pub order_type: Option<String>,
}

/// One staged child order of a split batch, as listed by the
/// split-order stage detail function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOrderStagesDetail {
    pub split_order_stages_id: i64,
    pub batch_id: i64,
    pub parent_order_id: i64,
    /// Zero in the staging table marks a stage not yet tied to an order.
    pub order_id: Option<i64>,
    pub oms_number: Option<String>,
    pub order_type: String,
    pub trade_date: NaiveDate,
    pub account: String,
    pub ccy_pair: String,
    pub ccy_dealt: String,
    pub near_side: String,
    pub far_side: Option<String>,
    pub near_quantity: Decimal,
    pub near_value_date: NaiveDate,
    pub far_quantity: Option<Decimal>,
    pub far_value_date: Option<NaiveDate>,
    pub user_id: i64,
    pub user_email: Option<String>,
    pub order_source: Option<String>,
    pub execution_type: Option<String>,
}

/// Execution-type lookup result, merged from two independent rule
/// queries. Either query may return no row, in which case its fields
/// stay `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionTypeData {
    pub execution_type: Option<String>,
    pub dealt_quantity_usd: Option<Decimal>,
    pub expected_custodian_slippage: Option<Decimal>,
    pub trade_away_fee_usd: Option<Decimal>,
}
