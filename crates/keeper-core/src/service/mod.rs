pub mod checks;
pub mod cipher;
pub mod session;
pub mod token;
pub mod vault;
