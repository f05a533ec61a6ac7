pub mod add;
pub mod calendar;
pub mod category;
pub mod delete;
pub mod done;
pub mod edit;
pub mod list;
