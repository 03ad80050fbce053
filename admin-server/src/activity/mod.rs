//! Activity log (best-effort side channel)
//!
//! Handlers call [`ActivityLogService::record`], which never blocks and never
//! fails the request. [`ActivityWorker`] drains the channel into SurrealDB.

mod meta;
mod service;
mod worker;

pub use meta::RequestMeta;
pub use service::ActivityLogService;
pub use worker::ActivityWorker;
