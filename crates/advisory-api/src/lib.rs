pub mod federation;
pub mod support;

pub use federation::{role_arn, HttpCredentialFederator};
pub use support::HttpAdvisorySource;
