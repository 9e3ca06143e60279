//! The Takana Juo page: section schedules and static content

pub mod content;
pub mod sections;

pub use sections::page;
