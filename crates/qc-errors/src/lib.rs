pub mod constraint;
pub mod details;
pub mod domain;
pub mod sqlstate;

pub mod prelude {
    pub use crate::constraint::{classify, ConstraintCategory};
    pub use crate::details::ErrorDetails;
    pub use crate::domain::DomainError;
    pub use crate::sqlstate::translate;
}
