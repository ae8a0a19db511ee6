mod ledger;
mod status;

pub use ledger::{app, ledger_routes};
pub use status::status_routes;
