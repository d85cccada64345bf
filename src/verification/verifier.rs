use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    models::{AddressClaim, GrantsError, InputType, Result},
    resolver::{checksum, parse_literal_address, AddressResolver},
};

/// Re-checks addresses that arrive with form submissions. The client's
/// resolution is never trusted; the server repeats it and compares.
pub struct SubmissionVerifier {
    resolver: Arc<AddressResolver>,
}

impl SubmissionVerifier {
    pub fn new(resolver: Arc<AddressResolver>) -> Self {
        Self { resolver }
    }

    /// Returns the checksummed address the server agrees on.
    pub async fn verify(&self, claim: &AddressClaim) -> Result<String> {
        let claimed = claim.address.trim();

        let verified = match claim.input_type {
            InputType::Address => {
                let address = parse_literal_address(claimed)
                    .ok_or_else(|| GrantsError::InvalidAddress(claimed.to_string()))?;

                let input = claim.input.trim();
                if !input.is_empty() && !input.eq_ignore_ascii_case(claimed) {
                    return Err(GrantsError::VerificationFailed(
                        "Submitted address does not match the entered address".to_string()
                    ));
                }

                checksum(&address)
            }
            InputType::Ens => {
                let result = self.resolver.resolve(&claim.input).await;

                if !result.success || result.input_type != InputType::Ens {
                    warn!("Server could not resolve claimed name {:?}", claim.input);
                    return Err(GrantsError::VerificationFailed(format!(
                        "Could not resolve {}: {}",
                        claim.input.trim(),
                        result.error.as_deref().unwrap_or("not an ENS name")
                    )));
                }

                let resolved = result.address.unwrap_or_default();
                if !resolved.eq_ignore_ascii_case(claimed) {
                    warn!("Claimed {} for {} but server resolved {}", claimed, claim.input.trim(), resolved);
                    return Err(GrantsError::VerificationFailed(
                        "Resolved address does not match the submitted address".to_string()
                    ));
                }

                resolved
            }
            InputType::Invalid => {
                return Err(GrantsError::VerificationFailed(
                    "Submission carries an invalid address input".to_string()
                ));
            }
        };

        info!("Verified submitted address {}", verified);
        Ok(verified)
    }
}
