pub mod check;
pub mod context;
pub mod extract;
pub mod run;
