//! Data models for Shelfmark

pub mod book;
pub mod book_return;
pub mod borrow_record;
pub mod fine;
pub mod submission;
pub mod user;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use book_return::{BookReturn, BookReturnDetails};
pub use borrow_record::{BorrowRecord, NewBorrowRecord};
pub use fine::Fine;
pub use submission::Submission;
pub use user::{Role, User, UserClaims};
