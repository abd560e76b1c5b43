pub mod dashboard;
pub mod orders;
pub mod sla;
pub mod stats;
pub mod tickets;

pub use dashboard::{build_order_dashboard, build_ticket_dashboard, OrderDashboard, TicketDashboard};
pub use sla::{classify_sla, threshold_hours, SlaOutcome, SlaStatus};
pub use tickets::extract_email_domain;
