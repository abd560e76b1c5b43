pub mod html;
pub mod text;

pub use html::{render_order_dashboard, render_ticket_dashboard};
pub use text::{order_summary, ticket_summary};
