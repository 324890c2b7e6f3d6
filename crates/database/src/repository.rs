//! The stored-function call catalogue.
//!
//! Each method follows the same shape: borrow one pooled connection,
//! prepare the call's fixed SQL text, bind the positional parameters,
//! execute, and map the result rows into domain entities. The borrowed
//! connection returns to the pool when it drops, on every exit path —
//! prepare failure, execution failure, mapping failure or success —
//! so no stage can leak it.
//!
//! The SQL texts are the wire contract with the `bfx` stored
//! functions: function names, parameter order and types, and result
//! column shapes must match them exactly. Identifier batches travel as
//! `int4[]`, matching what the functions declare.

use crate::error::{DbError, acquire_error, execution_error, mapping_error};
use crate::mapper::{self, column, scalar};
use crate::statement;
use chrono::NaiveDate;
use core_types::{
    CashToTradeExposure, Counterparty, ExecutionTypeData, Order, ParentChildrenResults,
    SplitOrderStagesDetail,
};
use rust_decimal::Decimal;
use sqlx::Statement as _;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tracing::debug;

const UPDATE_NETTING_ALGO: &str = "select bfx.fn_update_order_netting_algo($1,$2);";
const UPSERT_ORDER_STATE_AND_EVENT: &str =
    "select bfx.fn_upsert_order_state_and_event($1,$2,$3,$4,$5,$6);";
const LOCK_ORDERS: &str = "select fn_lock_orders($1,$2);";
const UNLOCK_ORDERS: &str = "select fn_unlock_orders($1,$2);";
const GET_ORDER_DETAILS_ARRAY: &str = "select * from fn_get_order_details_array($1);";
const GET_COUNTERPARTY_CANDIDATES: &str = "select * from fn_get_counterparty_candidates($1);";
const INSERT_NET_ORDER_ALL: &str = "select * from fn_insert_net_order_all ($1,$2,$3)";
const ACCEPT_NET_ORDER_BATCH: &str = "select * from fn_accept_net_order_batch ($1,$2)";
const RULES_GET_NETTING_CODE: &str = "select * from fn_rules_get_netting_code ($1,$2,$3,$4);";
const CLEAR_NET_ORDERS: &str = "select fn_clear_net_orders ($1,$2,$3);";
const INSERT_ORDER_BANKS: &str = "select bfx.fn_insert_order_banks($1,$2,$3);";
const GET_CASH_EXPOSURES: &str = "select * from bfx.fn_get_cash_exposures ($1);";
const INSERT_CASH_TO_TRADE_STAGES: &str =
    "select * from bfx.fn_insert_cash_to_trade_stages_from_corticon ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10);";
const INSERT_ORDER_FROM_CASH_EXPOSURE: &str =
    "select * from bfx.fn_insert_order_from_cash_exposure ($1);";
const RULES_GET_EXECUTION_TYPE: &str = "select * from bfx.fn_rules_get_execution_type($1,$2,$3,$4);";
const GET_ACCOUNT_TRADEAWAY_COMPONENTS: &str =
    "select * from bfx.fn_get_account_tradeaway_components($1,$2,$3,$4,$5);";
const SPLIT_ORDER_BATCH_ID: &str = "select * from nextval('split_order_batch_seq');";
const INSERT_SPLIT_ORDER_STAGES: &str = "select * from bfx.fn_insert_split_order_stages ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19);";
const GET_SPLIT_ORDER_STAGES_DETAIL: &str =
    "select * from bfx.fn_get_split_order_stages_detail ($1);";
const UPDATE_SPLIT_ORDER_STAGES_EXECUTION_TYPE: &str =
    "select * from bfx.fn_update_split_order_stages_execution_type ($1,$2);";
const ACCEPT_SPLIT_ORDER_BATCH: &str = "select * from fn_accept_split_order_batch ($1);";
const CLEAR_SPLIT_ORDERS: &str = "select * from fn_clear_split_orders ($1,$2,$3);";
const UPDATE_ORDER_EXECUTION_TYPE: &str = "select * from bfx.fn_update_order_execution_type ($1,$2)";
const UPDATE_ORDER_COUNTERPARTY_SELECTION_ACTION_CODE: &str =
    "select * from bfx.fn_update_order_counterparty_selection_action_code ($1,$2)";

/// One staged child order to insert into a split batch. The field
/// order mirrors the positional parameters of
/// `bfx.fn_insert_split_order_stages`.
#[derive(Debug, Clone)]
pub struct SplitOrderStageInsert<'a> {
    pub batch_id: i64,
    pub parent_order_id: i64,
    /// `None` is written as zero, marking a stage without an order yet.
    pub order_id: Option<i64>,
    pub oms_number: &'a str,
    pub order_type: &'a str,
    pub trade_date: NaiveDate,
    pub account: &'a str,
    pub ccy_pair: &'a str,
    pub ccy_dealt: &'a str,
    pub near_side: &'a str,
    pub far_side: Option<&'a str>,
    pub near_quantity: Decimal,
    pub near_value_date: NaiveDate,
    pub far_quantity: Option<Decimal>,
    pub far_value_date: Option<NaiveDate>,
    pub user_id: i64,
    pub user_email: &'a str,
    pub order_source: &'a str,
    pub execution_type: &'a str,
}

/// High-level interface to the `bfx` stored functions.
///
/// Holds a shared connection pool; each call borrows one connection
/// for its whole duration and never shares it. The repository itself
/// is cheap to clone and safe to use from many tasks concurrently.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: PgPool,
    statement_logging: bool,
}

impl OrderRepository {
    /// Creates a new `OrderRepository` over a shared connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            statement_logging: false,
        }
    }

    /// Enables debug logging of every statement before execution.
    pub fn statement_logging(mut self, enabled: bool) -> Self {
        self.statement_logging = enabled;
        self
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, DbError> {
        self.pool.acquire().await.map_err(acquire_error)
    }

    fn trace(&self, sql: &str) {
        if self.statement_logging {
            debug!(sql, "executing stored function");
        }
    }

    /// Stamps the chosen netting algorithm onto a batch of orders.
    pub async fn update_netting_algo(
        &self,
        order_ids: &[i64],
        netting_algo: &str,
    ) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, UPDATE_NETTING_ALGO).await?;
        self.trace(UPDATE_NETTING_ALGO);
        let row = stmt
            .query()
            .bind(int4_ids(order_ids))
            .bind(netting_algo)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    /// Moves a batch of orders to a new state and records the driving
    /// event. The target state is chosen by the function itself when
    /// `target_order_state` is `None`.
    pub async fn upsert_order_state_and_event(
        &self,
        order_ids: &[i64],
        target_order_state: Option<&str>,
        event_short_code: &str,
        event_source: &str,
        user_id: i64,
        label: &str,
    ) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, UPSERT_ORDER_STATE_AND_EVENT).await?;
        self.trace(UPSERT_ORDER_STATE_AND_EVENT);
        let row = stmt
            .query()
            .bind(int4_ids(order_ids))
            .bind(target_order_state)
            .bind(event_short_code)
            .bind(event_source)
            .bind(user_id as i32)
            .bind(label)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    pub async fn lock_orders(&self, order_ids: &[i64], user_id: i64) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, LOCK_ORDERS).await?;
        self.trace(LOCK_ORDERS);
        let row = stmt
            .query()
            .bind(int4_ids(order_ids))
            .bind(user_id as i32)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    pub async fn unlock_orders(&self, order_ids: &[i64], user_id: i64) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, UNLOCK_ORDERS).await?;
        self.trace(UNLOCK_ORDERS);
        let row = stmt
            .query()
            .bind(int4_ids(order_ids))
            .bind(user_id as i32)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    /// Fetches full order details for a batch of orders, rebuilding the
    /// leg/account/counterparty graph from the embedded composite
    /// arrays. An empty id batch yields an empty list.
    pub async fn order_details(&self, order_ids: &[i64]) -> Result<Vec<Order>, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, GET_ORDER_DETAILS_ARRAY).await?;
        self.trace(GET_ORDER_DETAILS_ARRAY);
        let rows = stmt
            .query()
            .bind(int4_ids(order_ids))
            .fetch_all(&mut *conn)
            .await
            .map_err(execution_error)?;
        rows.iter()
            .map(|row| mapper::order_from_row(row).map_err(mapping_error))
            .collect()
    }

    /// Lists the candidate counterparties for one order.
    pub async fn counterparty_candidates(
        &self,
        order_id: i64,
    ) -> Result<Vec<Counterparty>, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, GET_COUNTERPARTY_CANDIDATES).await?;
        self.trace(GET_COUNTERPARTY_CANDIDATES);
        let rows = stmt
            .query()
            .bind(order_id as i32)
            .fetch_all(&mut *conn)
            .await
            .map_err(execution_error)?;
        rows.iter()
            .map(|row| mapper::counterparty_from_candidate_row(row).map_err(mapping_error))
            .collect()
    }

    /// Nets a batch of orders into one parent order. The function
    /// returns exactly one row: the parent plus its children.
    pub async fn insert_net_order_all(
        &self,
        order_ids: &[i64],
        user_id: i64,
        timezone: &str,
    ) -> Result<ParentChildrenResults, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, INSERT_NET_ORDER_ALL).await?;
        self.trace(INSERT_NET_ORDER_ALL);
        let row = stmt
            .query()
            .bind(int4_ids(order_ids))
            .bind(user_id as i32)
            .bind(timezone)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        mapper::parent_children_from_row(&row).map_err(mapping_error)
    }

    /// Accepts the named net groups of a netting batch, yielding one
    /// parent/children result per accepted group.
    pub async fn accept_net_order_batch(
        &self,
        batch_id: i64,
        net_group_ids: &[i64],
    ) -> Result<Vec<ParentChildrenResults>, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, ACCEPT_NET_ORDER_BATCH).await?;
        self.trace(ACCEPT_NET_ORDER_BATCH);
        let rows = stmt
            .query()
            .bind(batch_id as i32)
            .bind(int4_ids(net_group_ids))
            .fetch_all(&mut *conn)
            .await
            .map_err(execution_error)?;
        rows.iter()
            .map(|row| mapper::parent_children_from_row(row).map_err(mapping_error))
            .collect()
    }

    /// Rule lookup for the netting action code; `None` when the rules
    /// produce nothing for this combination.
    pub async fn netting_code(
        &self,
        execution_type: &str,
        ccy_dealt: &str,
        order_type: &str,
        dealt_quantity: Decimal,
    ) -> Result<Option<String>, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, RULES_GET_NETTING_CODE).await?;
        self.trace(RULES_GET_NETTING_CODE);
        let row = stmt
            .query()
            .bind(execution_type)
            .bind(ccy_dealt)
            .bind(order_type)
            .bind(dealt_quantity)
            .fetch_optional(&mut *conn)
            .await
            .map_err(execution_error)?;
        match row {
            Some(row) => scalar(&row).map_err(mapping_error),
            None => Ok(None),
        }
    }

    pub async fn clear_net_orders(
        &self,
        net_order_ids: &[i64],
        user_id: i64,
        timezone: &str,
    ) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, CLEAR_NET_ORDERS).await?;
        self.trace(CLEAR_NET_ORDERS);
        let row = stmt
            .query()
            .bind(int4_ids(net_order_ids))
            .bind(user_id as i32)
            .bind(timezone)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    /// Attaches a counterparty/venue pair to an order.
    pub async fn insert_order_banks(
        &self,
        order_id: i64,
        bank_abbreviation: &str,
        venue_short_code: &str,
    ) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, INSERT_ORDER_BANKS).await?;
        self.trace(INSERT_ORDER_BANKS);
        let row = stmt
            .query()
            .bind(order_id as i32)
            .bind(bank_abbreviation)
            .bind(venue_short_code)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    /// Fetches the cash exposures eligible for conversion into trades.
    pub async fn cash_to_trade_exposures(
        &self,
        cash_details_ids: &[i64],
    ) -> Result<Vec<CashToTradeExposure>, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, GET_CASH_EXPOSURES).await?;
        self.trace(GET_CASH_EXPOSURES);
        let rows = stmt
            .query()
            .bind(int4_ids(cash_details_ids))
            .fetch_all(&mut *conn)
            .await
            .map_err(execution_error)?;
        rows.iter()
            .map(|row| mapper::cash_exposure_from_row(row).map_err(mapping_error))
            .collect()
    }

    /// Stages a cash exposure for conversion into a trade; returns the
    /// new stage id.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_cash_to_trade_stages(
        &self,
        cash_details_id: i64,
        account_number: &str,
        order_type: &str,
        near_value_date: NaiveDate,
        ccy_pair: &str,
        base_ccy: &str,
        terms_ccy: &str,
        dealt_ccy: &str,
        execution_type: &str,
        target_value_date_tenor: &str,
    ) -> Result<i64, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, INSERT_CASH_TO_TRADE_STAGES).await?;
        self.trace(INSERT_CASH_TO_TRADE_STAGES);
        let row = stmt
            .query()
            .bind(cash_details_id as i32)
            .bind(account_number)
            .bind(order_type)
            .bind(near_value_date)
            .bind(ccy_pair)
            .bind(base_ccy)
            .bind(terms_ccy)
            .bind(dealt_ccy)
            .bind(execution_type)
            .bind(target_value_date_tenor)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    /// Creates an order directly from a cash exposure; returns the new
    /// order id.
    pub async fn insert_order_from_cash_exposure(
        &self,
        cash_details_id: i64,
    ) -> Result<i64, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, INSERT_ORDER_FROM_CASH_EXPOSURE).await?;
        self.trace(INSERT_ORDER_FROM_CASH_EXPOSURE);
        let row = stmt
            .query()
            .bind(cash_details_id as i32)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    /// Execution-type lookup for one account/currency/quantity
    /// combination. Two independent rule queries run on the same
    /// borrowed connection and their columns merge into one result;
    /// either query may yield no row, leaving its fields unset.
    #[allow(clippy::too_many_arguments)]
    pub async fn execution_type_data(
        &self,
        account: &str,
        ccy_pair: &str,
        ccy_base: &str,
        ccy_term: &str,
        ccy_dealt: &str,
        quantity: Decimal,
        order_type: &str,
    ) -> Result<ExecutionTypeData, DbError> {
        let mut conn = self.acquire().await?;
        let mut data = ExecutionTypeData::default();

        let stmt = statement::prepare(&mut conn, RULES_GET_EXECUTION_TYPE).await?;
        self.trace(RULES_GET_EXECUTION_TYPE);
        let row = stmt
            .query()
            .bind(account)
            .bind(ccy_dealt)
            .bind(quantity)
            .bind(order_type)
            .fetch_optional(&mut *conn)
            .await
            .map_err(execution_error)?;
        if let Some(row) = &row {
            data.execution_type = column(row, "lut_execution_type").map_err(mapping_error)?;
            data.dealt_quantity_usd =
                column(row, "lut_dealt_quantity_usd").map_err(mapping_error)?;
        }

        let stmt = statement::prepare(&mut conn, GET_ACCOUNT_TRADEAWAY_COMPONENTS).await?;
        self.trace(GET_ACCOUNT_TRADEAWAY_COMPONENTS);
        let row = stmt
            .query()
            .bind(account)
            .bind(ccy_pair)
            .bind(ccy_base)
            .bind(ccy_term)
            .bind(ccy_dealt)
            .fetch_optional(&mut *conn)
            .await
            .map_err(execution_error)?;
        if let Some(row) = &row {
            data.expected_custodian_slippage =
                column(row, "expected_custodian_slippage").map_err(mapping_error)?;
            data.trade_away_fee_usd = column(row, "tradeaway_fee_usd").map_err(mapping_error)?;
        }

        Ok(data)
    }

    /// Draws the next split-order batch id from its sequence.
    pub async fn split_order_batch_id(&self) -> Result<i64, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, SPLIT_ORDER_BATCH_ID).await?;
        self.trace(SPLIT_ORDER_BATCH_ID);
        let row = stmt
            .query()
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    /// Stages one child order of a split batch; returns the stage id.
    pub async fn insert_split_order_stages(
        &self,
        stage: &SplitOrderStageInsert<'_>,
    ) -> Result<i64, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, INSERT_SPLIT_ORDER_STAGES).await?;
        self.trace(INSERT_SPLIT_ORDER_STAGES);
        let row = stmt
            .query()
            .bind(stage.batch_id as i32)
            .bind(stage.parent_order_id as i32)
            .bind(stage.order_id.unwrap_or(0) as i32)
            .bind(stage.oms_number)
            .bind(stage.order_type)
            .bind(stage.trade_date)
            .bind(stage.account)
            .bind(stage.ccy_pair)
            .bind(stage.ccy_dealt)
            .bind(stage.near_side)
            .bind(stage.far_side)
            .bind(stage.near_quantity)
            .bind(stage.near_value_date)
            .bind(stage.far_quantity)
            .bind(stage.far_value_date)
            .bind(stage.user_id as i32)
            .bind(stage.user_email)
            .bind(stage.order_source)
            .bind(stage.execution_type)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    /// Lists the staged child orders of a split batch.
    pub async fn split_order_stages_detail(
        &self,
        batch_id: i64,
    ) -> Result<Vec<SplitOrderStagesDetail>, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, GET_SPLIT_ORDER_STAGES_DETAIL).await?;
        self.trace(GET_SPLIT_ORDER_STAGES_DETAIL);
        let rows = stmt
            .query()
            .bind(batch_id as i32)
            .fetch_all(&mut *conn)
            .await
            .map_err(execution_error)?;
        rows.iter()
            .map(|row| mapper::split_stage_detail_from_row(row).map_err(mapping_error))
            .collect()
    }

    pub async fn update_split_order_stages_execution_type(
        &self,
        split_order_stages_id: i64,
        execution_type: &str,
    ) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, UPDATE_SPLIT_ORDER_STAGES_EXECUTION_TYPE).await?;
        self.trace(UPDATE_SPLIT_ORDER_STAGES_EXECUTION_TYPE);
        let row = stmt
            .query()
            .bind(split_order_stages_id as i32)
            .bind(execution_type)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    pub async fn accept_split_order_batch(&self, batch_id: i64) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, ACCEPT_SPLIT_ORDER_BATCH).await?;
        self.trace(ACCEPT_SPLIT_ORDER_BATCH);
        let row = stmt
            .query()
            .bind(batch_id as i32)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    pub async fn clear_split_orders(
        &self,
        user_id: i64,
        parent_order_id: i64,
        timezone: &str,
    ) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, CLEAR_SPLIT_ORDERS).await?;
        self.trace(CLEAR_SPLIT_ORDERS);
        let row = stmt
            .query()
            .bind(parent_order_id as i32)
            .bind(user_id as i32)
            .bind(timezone)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    pub async fn update_order_execution_type(
        &self,
        order_ids: &[i64],
        execution_type: &str,
    ) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt = statement::prepare(&mut conn, UPDATE_ORDER_EXECUTION_TYPE).await?;
        self.trace(UPDATE_ORDER_EXECUTION_TYPE);
        let row = stmt
            .query()
            .bind(int4_ids(order_ids))
            .bind(execution_type)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }

    pub async fn update_order_counterparty_selection_action_code(
        &self,
        order_id: i64,
        counterparty_selection_action_code: &str,
    ) -> Result<bool, DbError> {
        let mut conn = self.acquire().await?;
        let stmt =
            statement::prepare(&mut conn, UPDATE_ORDER_COUNTERPARTY_SELECTION_ACTION_CODE).await?;
        self.trace(UPDATE_ORDER_COUNTERPARTY_SELECTION_ACTION_CODE);
        let row = stmt
            .query()
            .bind(order_id as i32)
            .bind(counterparty_selection_action_code)
            .fetch_one(&mut *conn)
            .await
            .map_err(execution_error)?;
        scalar(&row).map_err(mapping_error)
    }
}

/// Narrows domain ids to the `int4[]` the stored functions declare.
fn int4_ids(ids: &[i64]) -> Vec<i32> {
    ids.iter().map(|id| *id as i32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int4_ids_narrows_in_order() {
        assert_eq!(int4_ids(&[1, 2, 300]), vec![1, 2, 300]);
        assert!(int4_ids(&[]).is_empty());
    }

    #[test]
    fn every_statement_placeholder_count_matches_its_binds() {
        // The SQL texts are the wire contract; a drifting placeholder
        // count would only surface at runtime against a live database.
        let expectations = [
            (UPDATE_NETTING_ALGO, 2),
            (UPSERT_ORDER_STATE_AND_EVENT, 6),
            (LOCK_ORDERS, 2),
            (UNLOCK_ORDERS, 2),
            (GET_ORDER_DETAILS_ARRAY, 1),
            (GET_COUNTERPARTY_CANDIDATES, 1),
            (INSERT_NET_ORDER_ALL, 3),
            (ACCEPT_NET_ORDER_BATCH, 2),
            (RULES_GET_NETTING_CODE, 4),
            (CLEAR_NET_ORDERS, 3),
            (INSERT_ORDER_BANKS, 3),
            (GET_CASH_EXPOSURES, 1),
            (INSERT_CASH_TO_TRADE_STAGES, 10),
            (INSERT_ORDER_FROM_CASH_EXPOSURE, 1),
            (RULES_GET_EXECUTION_TYPE, 4),
            (GET_ACCOUNT_TRADEAWAY_COMPONENTS, 5),
            (SPLIT_ORDER_BATCH_ID, 0),
            (INSERT_SPLIT_ORDER_STAGES, 19),
            (GET_SPLIT_ORDER_STAGES_DETAIL, 1),
            (UPDATE_SPLIT_ORDER_STAGES_EXECUTION_TYPE, 2),
            (ACCEPT_SPLIT_ORDER_BATCH, 1),
            (CLEAR_SPLIT_ORDERS, 3),
            (UPDATE_ORDER_EXECUTION_TYPE, 2),
            (UPDATE_ORDER_COUNTERPARTY_SELECTION_ACTION_CODE, 2),
        ];
        for (sql, expected) in expectations {
            let placeholders = sql.matches('$').count();
            assert_eq!(placeholders, expected, "placeholder count drifted in {sql}");
        }
    }
}
