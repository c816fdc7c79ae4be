//! carewatch-dispatch
//!
//! Best-effort side effects of a scored assessment: in-app notification,
//! doctor alert, and reviewer email. The [`dispatcher::Dispatcher`] decides
//! which fire from the [`table::DecisionTable`] and runs each one as an
//! independent background task; failures are logged and never propagate.

pub mod channels;
pub mod dispatcher;
pub mod email;
pub mod error;
pub mod http;
pub mod smtp;
pub mod table;
