//! Side-effect boundaries the engine talks to but does not implement.

pub mod email;

pub use email::{
    BudgetExceededEmail, BudgetWarningEmail, EmailDispatchError, EmailNotification, EmailSender,
    IncomeAllocatedEmail, NullEmailSender, SpendingActivityEmail,
};
