//! Entry/exit signal port trait.
//!
//! The simulation driver asks a `SignalPort` when to trade; the port never
//! touches the portfolio itself.

use crate::domain::indicator::IndicatorType;
use crate::domain::position::OpenTrade;
use crate::domain::strategy::{BarContext, EntrySignal};

pub trait SignalPort {
    /// Indicators the driver must precompute before the first bar.
    fn indicators(&self) -> Vec<IndicatorType>;

    /// `Some` to request a long entry at this bar's close.
    fn should_enter(&self, ctx: &BarContext<'_>) -> Option<EntrySignal>;

    /// `true` to close the open trade at this bar's close.
    fn should_exit(&self, ctx: &BarContext<'_>, trade: &OpenTrade) -> bool;
}
