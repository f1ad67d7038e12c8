pub mod author;
pub mod category;
pub mod comment;
pub mod location;
pub mod post;
