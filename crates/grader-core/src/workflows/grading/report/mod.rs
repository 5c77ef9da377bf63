mod builder;
pub mod export;
mod summary;
pub mod views;

pub use builder::build_view_model;
pub use summary::{aggregate, percentage_of, tier_for_percentage, tier_of, SummaryStats};
pub use views::ViewModel;
