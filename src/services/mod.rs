pub mod formatter;
pub mod session;
pub mod submission;
pub mod validator;
