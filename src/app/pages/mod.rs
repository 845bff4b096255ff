//! Console pages.

mod contacts;
mod dashboard;
mod events;
mod login;
mod records;
mod team;

pub use contacts::Contacts;
pub use dashboard::Dashboard;
pub use events::Events;
pub use login::Login;
pub use records::{use_records, RecordsScreen};
pub use team::Team;
