pub mod pay_period;
pub mod session;

pub use pay_period::{BillingCycle, BillingPolicy, PayPeriod};
pub use session::Session;
