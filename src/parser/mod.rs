pub mod columns;
pub mod deserializers;
pub mod orders;
pub mod pipeline;
pub mod tickets;
pub mod types;

pub use orders::{parse_orders_csv, parse_orders_reader};
pub use pipeline::ParseOutput;
pub use tickets::{parse_tickets_csv, parse_tickets_reader};
pub use types::{OrderRecord, ParseWarning, TicketRecord};
