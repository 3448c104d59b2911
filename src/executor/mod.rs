//! Scenario execution engine.
//!
//! A scenario moves through `Built -> Dispatched -> Classified -> Reported`.
//! No retries happen here; transport failures end as `Error`, wrong status
//! codes as `Fail`.

mod dispatch;
mod runner;
mod scenario;
pub mod sweep;

pub use dispatch::{DispatchError, DispatchRequest, DispatchResponse, Dispatcher};
pub use runner::{classify, ScenarioExecutor, ScenarioPhase};
pub use scenario::{Payload, ResponseCheck, Scenario, Verdict};
pub use sweep::FieldSweep;
