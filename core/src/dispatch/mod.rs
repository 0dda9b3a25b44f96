//! Background Task Dispatcher (spec §4.5)

pub mod dispatcher;

pub use dispatcher::{Dispatcher, Task, TaskHandler};
