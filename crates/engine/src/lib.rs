pub use commands::{ExpenseNewCmd, ExpenseUpdateCmd, TripNewCmd, TripUpdateCmd};
pub use error::EngineError;
pub use expenses::Expense;
pub use ops::{
    Engine, EngineBuilder, SpendDifferences, TripComparison, TripSpendSummary, TripStatistics,
};
pub use reports::Report;
pub use trips::{Trip, TripStatus, duration_days, ranges_overlap};

mod commands;
mod error;
mod expenses;
mod ops;
mod reports;
mod trips;

type ResultEngine<T> = Result<T, EngineError>;
