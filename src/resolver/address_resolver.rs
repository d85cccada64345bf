use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    chains::{race_timeout, EnsApiClient, FallbackRpcClient, NameApi, NameRpc, Timed},
    config::{ResolverSettings, Settings},
    models::{
        InputType, ResolutionResult, Result, EMPTY_INPUT, ENS_NAME_NOT_FOUND,
        INVALID_ADDRESS_FORMAT,
    },
    resolver::{
        address::{checksum, parse_literal_address},
        avatar::AvatarPolicy,
        name::normalize_name,
    },
};

#[derive(Debug, Clone, Copy)]
pub struct ResolverTimeouts {
    pub fast_path: Duration,
    pub slow_path: Duration,
    pub avatar: Duration,
}

impl From<&ResolverSettings> for ResolverTimeouts {
    fn from(settings: &ResolverSettings) -> Self {
        Self {
            fast_path: settings.fast_path_timeout(),
            slow_path: settings.slow_path_timeout(),
            avatar: settings.avatar_timeout(),
        }
    }
}

/// Turns free text into a checksummed address. Literal addresses never touch
/// the network; dotted names go to the HTTP API first and to RPC only when
/// that comes back empty.
pub struct AddressResolver {
    api: Arc<dyn NameApi>,
    rpc: Arc<dyn NameRpc>,
    avatars: AvatarPolicy,
    timeouts: ResolverTimeouts,
}

impl AddressResolver {
    pub fn new(api: Arc<dyn NameApi>, rpc: Arc<dyn NameRpc>, settings: &ResolverSettings) -> Self {
        Self {
            api,
            rpc,
            avatars: AvatarPolicy::new(settings.avatar_allowlist.iter().cloned()),
            timeouts: ResolverTimeouts::from(settings),
        }
    }

    /// Build the resolver with the real HTTP and RPC clients.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api = Arc::new(EnsApiClient::new(&settings.resolver)?);
        let rpc = Arc::new(FallbackRpcClient::new(&settings.rpc)?);
        Ok(Self::new(api, rpc, &settings.resolver))
    }

    pub fn timeouts(&self) -> ResolverTimeouts {
        self.timeouts
    }

    pub async fn resolve(&self, input: &str) -> ResolutionResult {
        let input = input.trim();

        if input.is_empty() {
            return ResolutionResult::failed(EMPTY_INPUT, InputType::Invalid);
        }

        if let Some(address) = parse_literal_address(input) {
            return ResolutionResult::resolved(checksum(&address), None, InputType::Address);
        }

        if !input.contains('.') {
            return ResolutionResult::failed(INVALID_ADDRESS_FORMAT, InputType::Invalid);
        }

        self.resolve_name(input).await
    }

    async fn resolve_name(&self, input: &str) -> ResolutionResult {
        let name = match normalize_name(input) {
            Ok(name) => name,
            Err(e) => {
                debug!("Rejected name {:?}: {}", input, e);
                return ResolutionResult::failed(e.to_string(), InputType::Ens);
            }
        };

        if let Some((address, avatar)) = self.fast_path(&name).await {
            info!("Resolved {} to {} via API", name, address);
            return ResolutionResult::resolved(address, avatar, InputType::Ens);
        }

        debug!("Fast path missed for {}, falling back to RPC", name);

        match self.slow_path(&name).await {
            Some((address, avatar)) => {
                info!("Resolved {} to {} via RPC", name, address);
                ResolutionResult::resolved(address, avatar, InputType::Ens)
            }
            None => ResolutionResult::failed(ENS_NAME_NOT_FOUND, InputType::Ens),
        }
    }

    /// Address lookup and avatar check in parallel, each under its own timer.
    async fn fast_path(&self, name: &str) -> Option<(String, Option<String>)> {
        let (address, avatar) = futures::future::join(
            race_timeout(self.timeouts.fast_path, self.api.lookup_address(name)),
            race_timeout(self.timeouts.fast_path, self.api.check_avatar(name)),
        ).await;

        let address = match address {
            Timed::Completed(Ok(Some(raw))) => match parse_literal_address(raw.trim()) {
                Some(address) if !address.is_zero() => address,
                _ => {
                    warn!("Resolution API returned malformed address {:?} for {}", raw, name);
                    return None;
                }
            },
            Timed::Completed(Ok(None)) => return None,
            Timed::Completed(Err(e)) => {
                warn!("Resolution API failed for {}: {}", name, e);
                return None;
            }
            Timed::TimedOut => {
                warn!("Resolution API timed out for {}", name);
                return None;
            }
        };

        let avatar = match avatar {
            Timed::Completed(Ok(url)) => url,
            Timed::Completed(Err(e)) => {
                debug!("Avatar check failed for {}: {}", name, e);
                None
            }
            Timed::TimedOut => None,
        };

        Some((checksum(&address), self.safe_avatar(avatar)))
    }

    /// RPC lookup bounded by the slow-path limit as a whole. The avatar gets
    /// whatever is left of it, capped at the avatar limit.
    async fn slow_path(&self, name: &str) -> Option<(String, Option<String>)> {
        let started = Instant::now();

        let address = match race_timeout(self.timeouts.slow_path, self.rpc.resolve_name(name)).await {
            Timed::Completed(Ok(Some(address))) if !address.is_zero() => address,
            Timed::Completed(Ok(_)) => {
                debug!("{} has no address on chain", name);
                return None;
            }
            Timed::Completed(Err(e)) => {
                warn!("RPC resolution failed for {}: {}", name, e);
                return None;
            }
            Timed::TimedOut => {
                warn!("RPC resolution timed out for {}", name);
                return None;
            }
        };

        let remaining = self.timeouts.slow_path.saturating_sub(started.elapsed());
        let avatar_limit = self.timeouts.avatar.min(remaining);

        let avatar = match race_timeout(avatar_limit, self.rpc.resolve_avatar(name)).await {
            Timed::Completed(Ok(url)) => url,
            Timed::Completed(Err(e)) => {
                debug!("RPC avatar lookup failed for {}: {}", name, e);
                None
            }
            Timed::TimedOut => {
                debug!("RPC avatar lookup timed out for {}", name);
                None
            }
        };

        Some((checksum(&address), self.safe_avatar(avatar)))
    }

    fn safe_avatar(&self, avatar: Option<String>) -> Option<String> {
        avatar.filter(|url| {
            let safe = self.avatars.is_safe(url);
            if !safe {
                debug!("Dropping avatar from disallowed host: {}", url);
            }
            safe
        })
    }
}
