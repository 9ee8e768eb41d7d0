//! Helpers shared by check implementations.

pub mod suppress;
pub mod syntax;

#[doc(inline)]
pub use suppress::{check_allow_with_reason, missing_reason_violation, AllowCheck};
#[doc(inline)]
pub use syntax::{has_allow_attr, has_cfg_test, has_test_attr, path_to_string};
