pub mod links;
pub mod origin;
pub mod predicate;
pub mod record;
pub mod term;
