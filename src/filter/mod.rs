//! Sidebar filter controls and the global filter stage.

pub mod controls;
pub mod engine;

pub use controls::{
    DateRange, FilterBounds, FilterSelection, SelectionError, StrikeRange, DEFAULT_STRIKE_STEP,
};
pub use engine::apply_filters;
