pub mod verifier;

pub use verifier::SubmissionVerifier;
