//! Place and user operations over the store, plus request validation.

mod places;
mod users;
mod validation;

pub use places::*;
pub use users::*;
pub use validation::{body_to_map, text, FieldRule, Format, RequestValidator};
pub use validation::{CREATE_PLACE_RULES, LOGIN_RULES, SIGNUP_RULES, UPDATE_PLACE_RULES};
