//! Admin services.
//!
//! Each service borrows the record store (and, for AI features, a text
//! generator) and is cheap to construct per operation.

pub mod dashboard;
pub mod inbox;
pub mod orders;
pub mod outreach;
pub mod products;
pub mod reports;
pub mod settings;

pub use dashboard::{BatchCard, Dashboard, DashboardService};
pub use inbox::{Conversation, InboxService};
pub use orders::{ManualOrder, OrderAdminService};
pub use outreach::{Customer, CustomerMatch, OutreachService, SmsInvite};
pub use products::ProductAdminService;
pub use reports::{MonthlyReportPage, ReportService};
pub use settings::{SettingsService, ShopDetails};
