mod token;

pub use token::{get_token, health};
