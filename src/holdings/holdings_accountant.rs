use rust_decimal::Decimal;

use super::holdings_errors::{HoldingError, Result};

/// The open position of one account in one asset: total share quantity and
/// the dollar cost of the currently-held shares (weighted-average method).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionState {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

/// Result of applying a sell to a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellOutcome {
    pub state: PositionState,
    pub realized_pnl: Decimal,
}

impl PositionState {
    pub fn new(quantity: Decimal, cost_basis: Decimal) -> Self {
        Self {
            quantity,
            cost_basis,
        }
    }

    /// Weighted-average cost per share; defined as 0 at zero quantity.
    pub fn average_price(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            self.cost_basis / self.quantity
        } else {
            Decimal::ZERO
        }
    }
}

/// Applies a purchase: the new shares join the position at their full cost,
/// shifting the weighted average.
pub fn apply_buy(state: PositionState, quantity: Decimal, price: Decimal) -> Result<PositionState> {
    if quantity <= Decimal::ZERO {
        return Err(HoldingError::InvalidQuantity);
    }

    Ok(PositionState {
        quantity: state.quantity + quantity,
        cost_basis: state.cost_basis + quantity * price,
    })
}

/// Applies a sale: cost basis is scaled down proportionally to the fraction
/// of the position removed, so the average cost of the remaining shares is
/// unchanged. Realized P&L is measured against that average cost.
pub fn apply_sell(state: PositionState, quantity: Decimal, price: Decimal) -> Result<SellOutcome> {
    if quantity <= Decimal::ZERO {
        return Err(HoldingError::InvalidQuantity);
    }
    if state.quantity < quantity {
        return Err(HoldingError::InsufficientShares);
    }

    // Selling the entire position releases the exact remaining cost basis,
    // so a full exit always lands on quantity == 0, cost_basis == 0.
    let cost_removed = if quantity == state.quantity {
        state.cost_basis
    } else {
        quantity * state.average_price()
    };

    let realized_pnl = quantity * price - cost_removed;

    Ok(SellOutcome {
        state: PositionState {
            quantity: state.quantity - quantity,
            cost_basis: state.cost_basis - cost_removed,
        },
        realized_pnl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn buy_into_empty_position() {
        let state = apply_buy(PositionState::default(), dec!(10), dec!(175.50)).unwrap();
        assert_eq!(state.quantity, dec!(10));
        assert_eq!(state.cost_basis, dec!(1755.00));
        assert_eq!(state.average_price(), dec!(175.50));
    }

    #[test]
    fn buys_accumulate_weighted_average() {
        let state = apply_buy(PositionState::default(), dec!(10), dec!(100)).unwrap();
        let state = apply_buy(state, dec!(10), dec!(200)).unwrap();
        assert_eq!(state.quantity, dec!(20));
        assert_eq!(state.cost_basis, dec!(3000));
        assert_eq!(state.average_price(), dec!(150));
    }

    #[test]
    fn sell_realizes_pnl_against_average_cost() {
        // quantity 50 at total cost 7500 => avg 150
        let state = PositionState::new(dec!(50), dec!(7500.00));
        let outcome = apply_sell(state, dec!(20), dec!(200.00)).unwrap();
        assert_eq!(outcome.realized_pnl, dec!(1000.00));
        assert_eq!(outcome.state.quantity, dec!(30));
        assert_eq!(outcome.state.cost_basis, dec!(4500.00));
    }

    #[test]
    fn sell_leaves_remaining_average_cost_unchanged() {
        let state = PositionState::new(dec!(3), dec!(10));
        let before = state.average_price();
        let outcome = apply_sell(state, dec!(1), dec!(99)).unwrap();
        assert_eq!(outcome.state.average_price(), before);
    }

    #[test]
    fn full_exit_zeroes_the_position() {
        // 10 / 3 has a non-terminating average; the full exit must still
        // release the exact cost basis.
        let state = PositionState::new(dec!(3), dec!(10));
        let outcome = apply_sell(state, dec!(3), dec!(5)).unwrap();
        assert_eq!(outcome.state.quantity, Decimal::ZERO);
        assert_eq!(outcome.state.cost_basis, Decimal::ZERO);
        assert_eq!(outcome.realized_pnl, dec!(15) - dec!(10));
    }

    #[test]
    fn oversell_is_rejected() {
        let state = PositionState::new(dec!(10), dec!(1000));
        let err = apply_sell(state, dec!(10.0001), dec!(100)).unwrap_err();
        assert!(matches!(err, HoldingError::InsufficientShares));
    }

    #[test]
    fn zero_quantity_trade_is_rejected() {
        assert!(matches!(
            apply_buy(PositionState::default(), Decimal::ZERO, dec!(1)),
            Err(HoldingError::InvalidQuantity)
        ));
        assert!(matches!(
            apply_sell(PositionState::new(dec!(1), dec!(1)), Decimal::ZERO, dec!(1)),
            Err(HoldingError::InvalidQuantity)
        ));
    }

    #[test]
    fn average_price_is_zero_at_zero_quantity() {
        assert_eq!(PositionState::default().average_price(), Decimal::ZERO);
    }

    #[test]
    fn losing_sell_produces_negative_pnl() {
        let state = PositionState::new(dec!(10), dec!(2000)); // avg 200
        let outcome = apply_sell(state, dec!(5), dec!(150)).unwrap();
        assert_eq!(outcome.realized_pnl, dec!(-250));
        assert_eq!(outcome.state.cost_basis, dec!(1000));
    }
}
