// Tenant-gated automation dispatch: rows the acting principal may not
// automate are filtered out before any automation runs

pub mod dispatcher;
pub mod error;
pub mod traits;

pub use dispatcher::{AutomationDispatcher, AutomationSettings, DispatchReport};
pub use error::{AutomationError, AutomationFailure};
pub use traits::{Automation, AutomationContext};
