//! Indicator engine: rolling and recursive indicators aligned to a series,
//! plus the signal bundle read off the latest bar.
//!
//! Every column has exactly one entry per bar. Positions without enough
//! history are `None`; indicators that cannot be computed at all are absent.

pub mod engine;
pub mod error;
pub mod momentum;
pub mod set;
pub mod signals;
pub mod trend;
pub mod volume;
pub mod window;

pub use engine::{IndicatorEngine, IndicatorParams};
pub use error::IndicatorError;
pub use momentum::{kdj, macd, rsi};
pub use set::{IndicatorSet, Value};
pub use signals::{KdjSignal, MaSignal, MacdSignal, PricePosition, PriceSnapshot, RsiSignal, Signals, derive_latest_signals};
pub use trend::{boll, ema, ma};
pub use volume::{obv, volume_ma};
