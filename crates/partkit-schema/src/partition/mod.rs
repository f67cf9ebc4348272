mod builder;
mod calendar;
mod definition;
pub mod dialect;
mod info;
mod maintenance;

pub use builder::*;
pub use calendar::*;
pub use definition::*;
pub use dialect::{AlterTableDialect, CalendarBuckets, DialectStrategy, Granularity, PartitionOfDialect};
pub use info::*;
pub use maintenance::{MaintenanceOp, MaintenanceReport, render as render_maintenance};
