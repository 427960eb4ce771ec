//! mathcoach-core: answer normalization, grading, and the tutor service.
//!
//! The answer engine ([`answer`] and [`equivalence`]) is pure and stateless.
//! Everything that talks to a model or a store goes through the traits in
//! [`traits`] and [`store`].

pub mod answer;
pub mod equivalence;
pub mod error;
pub mod model;
pub mod progress;
pub mod prompt;
pub mod store;
pub mod traits;
pub mod tutor;

pub use answer::{parse_answer, parse_numeric, Notation, ParsedAnswer, RawAnswer};
pub use equivalence::{is_nearly_equal, ABS_EPSILON, REL_EPSILON};
pub use error::{ProviderError, TutorError};
