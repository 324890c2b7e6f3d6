//! Row-to-entity mapping.
//!
//! Every call family has a fixed recipe: read the scalar columns, and
//! for each embedded composite-array column decode its tokens into
//! child entities that carry a back-reference to their parent. Mapping
//! never retries or skips: the first malformed row or token aborts the
//! whole call with a `MappingError` and no partial entity escapes.

use crate::composite::{self, bool_field, decimal_field, i64_field, str_field};
use crate::error::MappingError;
use chrono::NaiveDate;
use core_types::{
    CashToTradeExposure, Counterparty, Leg, LegAccount, LegKind, Order, ParentChildrenResults,
    SplitOrderStagesDetail, TradeAwayComponent,
};
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::PgRow;

/// Positional schema of one leg-account token:
/// 0 account base currency, 1 is nettable, 2 account number,
/// 3 dealt quantity, 4 has counterparty credit restrictions,
/// 5 has owner counterparty restrictions, 6 min nettable value in USD,
/// 7 side, 8 expected custodian slippage, 9 trade-away fee USD,
/// 10 fee USD/terms cross rate, 11 fee terms/base cross rate.
pub(crate) const LEG_ACCOUNT_FIELDS: usize = 12;

/// Positional schema of one counterparty-candidate token:
/// 0 bank id, 1 bank abbreviation, 2 venue id, 3 venue short code,
/// 4 counterparty venue, 5 volume in order, 6 is account default,
/// 7 is credit permitted, 8 is owner permitted, 9 ranking by value,
/// 10 child-order count. Fields 0 and 2 are internal keys and are not
/// carried into the entity.
pub(crate) const COUNTERPARTY_FIELDS: usize = 11;

/// The scalar slice of one order-details row, separated from the
/// composite-array columns so assembly stays a pure function.
#[derive(Debug, Clone)]
pub(crate) struct OrderScalars {
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
    pub num_legs: i64,
    pub near: LegScalars,
    pub far: Option<LegScalars>,
    pub max_rfq_group_size: i64,
    pub split_action_code: Option<String>,
    pub split_overhang_action: Option<String>,
    pub split_target_volume: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub(crate) struct LegScalars {
    pub side: String,
    pub buy_sell_base: String,
    pub value_date: NaiveDate,
    pub dealt_quantity: Decimal,
    pub dealt_quantity_usd: Decimal,
    pub account_count: i64,
}

pub(crate) fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, MappingError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name).map_err(|source| MappingError::Column {
        column: name.to_string(),
        source,
    })
}

/// Reads a single-column scalar result (e.g. a stored function's
/// boolean or bigint return value).
pub(crate) fn scalar<'r, T>(row: &'r PgRow) -> Result<T, MappingError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(0).map_err(|source| MappingError::Column {
        column: "#0".to_string(),
        source,
    })
}

/// Maps one order-details row, composite arrays included.
pub(crate) fn order_from_row(row: &PgRow) -> Result<Order, MappingError> {
    let num_legs = i64::from(column::<i32>(row, "num_legs")?);

    let near = LegScalars {
        side: column(row, "near_side")?,
        buy_sell_base: column(row, "near_buy_sell_base")?,
        value_date: column(row, "near_value_date")?,
        dealt_quantity: column(row, "near_dealt_quantity")?,
        dealt_quantity_usd: column(row, "near_dealt_quantity_usd")?,
        account_count: column(row, "near_leg_account_count")?,
    };

    // Far-leg columns are only read when the order is a swap; on an
    // outright they are null and must not populate anything.
    let (far, far_tokens) = if num_legs == 2 {
        let far = LegScalars {
            side: column(row, "far_side")?,
            buy_sell_base: column(row, "far_buy_sell_base")?,
            value_date: column(row, "far_value_date")?,
            dealt_quantity: column(row, "far_dealt_quantity")?,
            dealt_quantity_usd: column(row, "far_dealt_quantity_usd")?,
            account_count: column(row, "far_leg_account_count")?,
        };
        (Some(far), column::<Vec<String>>(row, "far_accounts_array")?)
    } else {
        (None, Vec::new())
    };

    let scalars = OrderScalars {
        order_id: i64::from(column::<i32>(row, "order_id")?),
        oms_number: column(row, "oms_number")?,
        order_type: column(row, "order_type")?,
        order_sub_type: column(row, "order_sub_type")?,
        order_sub_status: column(row, "order_sub_status")?,
        input_user_email: column(row, "input_user_email")?,
        order_source: column(row, "order_source")?,
        trade_date: column(row, "trade_date")?,
        ccy_pair: column(row, "ccy_pair")?,
        ccy_base: column(row, "ccy_base")?,
        base_is_restricted: column(row, "base_is_restricted")?,
        ccy_term: column(row, "ccy_term")?,
        term_is_restricted: column(row, "term_is_restricted")?,
        ccy_dealt: column(row, "ccy_dealt")?,
        dealt_is_base: column(row, "dealt_is_base")?,
        ccy_contra: column(row, "ccy_contra")?,
        counterparty_selection_action_code: column(row, "counterparty_selection_action_code")?,
        execution_type: column(row, "execution_type")?,
        num_legs,
        near,
        far,
        max_rfq_group_size: i64::from(column::<i32>(row, "max_rfq_groupsize")?),
        split_action_code: column(row, "split_action_code")?,
        split_overhang_action: column(row, "split_overhang_action")?,
        split_target_volume: column(row, "split_target_volume")?,
    };

    let near_tokens: Vec<String> = column(row, "near_accounts_array")?;
    let counterparty_tokens: Vec<String> = column(row, "counterparty_candidates_array")?;

    assemble_order(scalars, &near_tokens, &far_tokens, &counterparty_tokens)
}

/// Builds the full order graph from its scalar slice and decoded
/// composite tokens. Pure, so the leg/back-reference wiring is
/// testable without a live row.
pub(crate) fn assemble_order(
    scalars: OrderScalars,
    near_tokens: &[String],
    far_tokens: &[String],
    counterparty_tokens: &[String],
) -> Result<Order, MappingError> {
    if (scalars.num_legs == 2) != scalars.far.is_some() {
        return Err(MappingError::LegShape {
            num_legs: scalars.num_legs,
        });
    }

    let order_id = scalars.order_id;
    let near_leg = assemble_leg(order_id, LegKind::Near, scalars.near, near_tokens)?;
    let far_leg = scalars
        .far
        .map(|far| assemble_leg(order_id, LegKind::Far, far, far_tokens))
        .transpose()?;

    let counterparties = counterparty_tokens
        .iter()
        .map(|token| counterparty_from_token(order_id, token))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Order {
        order_id,
        oms_number: scalars.oms_number,
        order_type: scalars.order_type,
        order_sub_type: scalars.order_sub_type,
        order_sub_status: scalars.order_sub_status,
        input_user_email: scalars.input_user_email,
        order_source: scalars.order_source,
        trade_date: scalars.trade_date,
        ccy_pair: scalars.ccy_pair,
        ccy_base: scalars.ccy_base,
        base_is_restricted: scalars.base_is_restricted,
        ccy_term: scalars.ccy_term,
        term_is_restricted: scalars.term_is_restricted,
        ccy_dealt: scalars.ccy_dealt,
        dealt_is_base: scalars.dealt_is_base,
        ccy_contra: scalars.ccy_contra,
        counterparty_selection_action_code: scalars.counterparty_selection_action_code,
        execution_type: scalars.execution_type,
        num_legs: scalars.num_legs,
        near_leg,
        far_leg,
        max_rfq_group_size: scalars.max_rfq_group_size,
        split_action_code: scalars.split_action_code,
        split_overhang_action: scalars.split_overhang_action,
        split_target_volume: scalars.split_target_volume,
        counterparties,
    })
}

fn assemble_leg(
    order_id: i64,
    kind: LegKind,
    scalars: LegScalars,
    tokens: &[String],
) -> Result<Leg, MappingError> {
    let accounts = tokens
        .iter()
        .map(|token| leg_account_from_token(order_id, kind, token))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Leg {
        kind,
        side: scalars.side,
        buy_sell_base: scalars.buy_sell_base,
        value_date: scalars.value_date,
        dealt_quantity: scalars.dealt_quantity,
        dealt_quantity_usd: scalars.dealt_quantity_usd,
        account_count: scalars.account_count,
        accounts,
    })
}

/// Decodes one leg-account token, building the account together with
/// the trade-away component it owns.
pub(crate) fn leg_account_from_token(
    order_id: i64,
    leg: LegKind,
    token: &str,
) -> Result<LegAccount, MappingError> {
    let fields = composite::decode(token, LEG_ACCOUNT_FIELDS)?;

    Ok(LegAccount {
        order_id,
        leg,
        account_base_ccy: str_field(&fields, 0),
        is_nettable: bool_field(&fields, 1),
        account_number: str_field(&fields, 2),
        dealt_quantity: decimal_field(&fields, 3)?,
        has_counterparty_credit_restrictions: bool_field(&fields, 4),
        has_owner_counterparty_restrictions: bool_field(&fields, 5),
        min_nettable_amount_usd: decimal_field(&fields, 6)?,
        side: str_field(&fields, 7),
        trade_away: TradeAwayComponent {
            expected_custodian_slippage: decimal_field(&fields, 8)?,
            trade_away_fee_usd: decimal_field(&fields, 9)?,
            trade_away_fee_usd_terms_cross_rate: decimal_field(&fields, 10)?,
            trade_away_fee_terms_base_cross_rate: decimal_field(&fields, 11)?,
        },
    })
}

/// Decodes one counterparty-candidate token attached to an order.
pub(crate) fn counterparty_from_token(
    order_id: i64,
    token: &str,
) -> Result<Counterparty, MappingError> {
    let fields = composite::decode(token, COUNTERPARTY_FIELDS)?;

    Ok(Counterparty {
        order_id: Some(order_id),
        abbreviation: str_field(&fields, 1),
        venue: str_field(&fields, 4),
        venue_short_code: str_field(&fields, 3),
        default_volume_in_order: decimal_field(&fields, 5)?,
        is_account_default: bool_field(&fields, 6),
        is_credit_permitted: bool_field(&fields, 7),
        is_owner_permitted: bool_field(&fields, 8),
        ranking_by_value: i64_field(&fields, 9)?,
        num_child_orders: i64_field(&fields, 10)?,
    })
}

/// Maps one row of the standalone counterparty-candidates lookup. This
/// shape has no owning order and reports no child-order count.
pub(crate) fn counterparty_from_candidate_row(row: &PgRow) -> Result<Counterparty, MappingError> {
    Ok(Counterparty {
        order_id: None,
        abbreviation: column(row, "bank_abbreviation")?,
        venue: column(row, "counterparty_venue")?,
        venue_short_code: column(row, "venue_short_code")?,
        default_volume_in_order: column(row, "volume_in_order")?,
        is_account_default: column(row, "is_account_default")?,
        is_credit_permitted: column(row, "is_credit_permitted")?,
        is_owner_permitted: column(row, "is_owner_permitted")?,
        ranking_by_value: column(row, "ranking_by_value")?,
        num_child_orders: 0,
    })
}

/// Maps one netting/splitting result row: the generated parent order
/// plus the ordered child orders it covers. The row must already be
/// positioned; this reads it and nothing else.
pub(crate) fn parent_children_from_row(row: &PgRow) -> Result<ParentChildrenResults, MappingError> {
    let parent: i32 = column(row, "parent_order_id")?;
    let children: Vec<i32> = column(row, "child_order_ids")?;

    Ok(ParentChildrenResults {
        parent_order_id: i64::from(parent),
        child_order_ids: children.into_iter().map(i64::from).collect(),
    })
}

pub(crate) fn cash_exposure_from_row(row: &PgRow) -> Result<CashToTradeExposure, MappingError> {
    Ok(CashToTradeExposure {
        cash_details_id: i64::from(column::<i32>(row, "cash_details_id")?),
        account_number: column(row, "account_no")?,
        ccy: column(row, "ccy")?,
        exposure_amount: column(row, "exposure_amount")?,
        exposure_amount_usd: column(row, "exposure_amount_usd")?,
        value_date: column(row, "value_date")?,
        order_type: column(row, "order_type")?,
    })
}

pub(crate) fn split_stage_detail_from_row(
    row: &PgRow,
) -> Result<SplitOrderStagesDetail, MappingError> {
    // An order_id of zero marks a stage not yet tied to a real order
    // (the insert writes zero for a null order id).
    let order_id = i64::from(column::<i32>(row, "order_id")?);

    Ok(SplitOrderStagesDetail {
        split_order_stages_id: column(row, "split_order_stages_id")?,
        batch_id: column(row, "batch_id")?,
        parent_order_id: i64::from(column::<i32>(row, "parent_order_id")?),
        order_id: (order_id != 0).then_some(order_id),
        oms_number: column(row, "oms_number")?,
        order_type: column(row, "order_type")?,
        trade_date: column(row, "trade_date")?,
        account: column(row, "account")?,
        ccy_pair: column(row, "ccy_pair")?,
        ccy_dealt: column(row, "ccy_dealt")?,
        near_side: column(row, "near_side")?,
        far_side: column(row, "far_side")?,
        near_quantity: column(row, "near_quantity")?,
        near_value_date: column(row, "near_value_date")?,
        far_quantity: column(row, "far_quantity")?,
        far_value_date: column(row, "far_value_date")?,
        user_id: i64::from(column::<i32>(row, "user_id")?),
        user_email: column(row, "user_email")?,
        order_source: column(row, "order_source")?,
        execution_type: column(row, "execution_type")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn account_token() -> String {
        "{USD,true,ACC1,100.50,false,true,5000.00,BUY,1.1,2.2,3.3,4.4}".to_string()
    }

    fn counterparty_token() -> String {
        "{7,BANKA,3,VEN,BankA London,250000.00,true,true,false,1,4}".to_string()
    }

    fn leg_scalars() -> LegScalars {
        LegScalars {
            side: "B".to_string(),
            buy_sell_base: "BUY".to_string(),
            value_date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            dealt_quantity: dec!(1000000),
            dealt_quantity_usd: dec!(1000000),
            account_count: 1,
        }
    }

    fn order_scalars(num_legs: i64) -> OrderScalars {
        OrderScalars {
            order_id: 42,
            oms_number: Some("OMS-1".to_string()),
            order_type: Some("SPOT".to_string()),
            order_sub_type: None,
            order_sub_status: Some("STAGED".to_string()),
            input_user_email: None,
            order_source: Some("OMS".to_string()),
            trade_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            ccy_pair: "EURUSD".to_string(),
            ccy_base: "EUR".to_string(),
            base_is_restricted: false,
            ccy_term: "USD".to_string(),
            term_is_restricted: false,
            ccy_dealt: "EUR".to_string(),
            dealt_is_base: true,
            ccy_contra: "USD".to_string(),
            counterparty_selection_action_code: None,
            execution_type: Some("RFQ".to_string()),
            num_legs,
            near: leg_scalars(),
            far: (num_legs == 2).then(leg_scalars),
            max_rfq_group_size: 5,
            split_action_code: None,
            split_overhang_action: None,
            split_target_volume: None,
        }
    }

    #[test]
    fn single_leg_order_has_no_far_leg() {
        let order = assemble_order(order_scalars(1), &[account_token()], &[], &[]).unwrap();
        assert_eq!(order.num_legs, 1);
        assert!(order.far_leg.is_none());
        assert_eq!(order.near_leg.accounts.len(), 1);
    }

    #[test]
    fn two_leg_order_populates_both_legs() {
        let order = assemble_order(
            order_scalars(2),
            &[account_token()],
            &[account_token(), account_token()],
            &[],
        )
        .unwrap();
        let far = order.far_leg.as_ref().unwrap();
        assert_eq!(far.kind, LegKind::Far);
        assert_eq!(far.accounts.len(), 2);
        assert!(far.accounts.iter().all(|a| a.leg == LegKind::Far));
        assert_eq!(order.near_leg.accounts[0].leg, LegKind::Near);
    }

    #[test]
    fn leg_shape_mismatch_is_rejected() {
        let mut scalars = order_scalars(2);
        scalars.far = None;
        let err = assemble_order(scalars, &[], &[], &[]).unwrap_err();
        assert!(matches!(err, MappingError::LegShape { num_legs: 2 }));
    }

    #[test]
    fn leg_account_owns_its_trade_away_component() {
        let account = leg_account_from_token(42, LegKind::Near, &account_token()).unwrap();
        assert_eq!(account.order_id, 42);
        assert_eq!(account.account_base_ccy, "USD");
        assert!(account.is_nettable);
        assert_eq!(account.account_number, "ACC1");
        assert_eq!(account.dealt_quantity, dec!(100.50));
        assert!(!account.has_counterparty_credit_restrictions);
        assert!(account.has_owner_counterparty_restrictions);
        assert_eq!(account.min_nettable_amount_usd, dec!(5000.00));
        assert_eq!(account.side, "BUY");
        assert_eq!(account.trade_away.expected_custodian_slippage, dec!(1.1));
        assert_eq!(account.trade_away.trade_away_fee_usd, dec!(2.2));
        assert_eq!(account.trade_away.trade_away_fee_usd_terms_cross_rate, dec!(3.3));
        assert_eq!(account.trade_away.trade_away_fee_terms_base_cross_rate, dec!(4.4));
    }

    #[test]
    fn counterparties_back_reference_their_order() {
        let order = assemble_order(
            order_scalars(1),
            &[account_token()],
            &[],
            &[counterparty_token(), counterparty_token()],
        )
        .unwrap();
        assert_eq!(order.counterparties.len(), 2);
        assert!(
            order
                .counterparties
                .iter()
                .all(|c| c.order_id == Some(order.order_id))
        );
    }

    #[test]
    fn counterparty_token_positions_map_to_the_documented_schema() {
        let cpty = counterparty_from_token(42, &counterparty_token()).unwrap();
        assert_eq!(cpty.abbreviation, "BANKA");
        assert_eq!(cpty.venue_short_code, "VEN");
        assert_eq!(cpty.venue, "BankA London");
        assert_eq!(cpty.default_volume_in_order, dec!(250000.00));
        assert!(cpty.is_account_default);
        assert!(cpty.is_credit_permitted);
        assert!(!cpty.is_owner_permitted);
        assert_eq!(cpty.ranking_by_value, 1);
        assert_eq!(cpty.num_child_orders, 4);
    }

    #[test]
    fn malformed_account_token_aborts_the_whole_order() {
        let truncated = "{USD,true,ACC1".to_string();
        let result = assemble_order(order_scalars(1), &[truncated], &[], &[]);
        assert!(matches!(
            result,
            Err(MappingError::Delimiters { .. })
        ));
    }

    #[test]
    fn wrong_field_count_aborts_the_whole_order() {
        let short = "{USD,true,ACC1,100.50}".to_string();
        let result = assemble_order(
            order_scalars(1),
            &[account_token(), short],
            &[],
            &[counterparty_token()],
        );
        assert!(matches!(
            result,
            Err(MappingError::FieldCount {
                expected: LEG_ACCOUNT_FIELDS,
                actual: 4
            })
        ));
    }

    #[test]
    fn unparseable_decimal_in_token_is_a_field_error() {
        let bad = "{USD,true,ACC1,not-a-number,false,true,5000.00,BUY,1.1,2.2,3.3,4.4}";
        let err = leg_account_from_token(1, LegKind::Near, bad).unwrap_err();
        assert!(matches!(err, MappingError::Field { index: 3, .. }));
    }
}
