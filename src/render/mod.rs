pub mod context;
pub mod layout;
pub mod overlays;
pub mod statistics_view;
