//! Discounted-cash-flow arithmetic: growth estimation, cost of capital,
//! FCF projection, and intrinsic-value discounting.
//!
//! Everything here is a pure function of its inputs. No I/O, no state — the
//! orchestrator resolves all scalars before calling in.

pub mod capital;
pub mod growth;
pub mod intrinsic;
pub mod projection;

pub use capital::{cost_of_equity, wacc};
pub use growth::{estimate_growth, DEFAULT_GROWTH_RATE};
pub use intrinsic::{
    discount, equity_value, per_share_value, DiscountedValue, DEFAULT_PERPETUITY_GROWTH,
};
pub use projection::{project_fcf, DEFAULT_HORIZON_YEARS};
