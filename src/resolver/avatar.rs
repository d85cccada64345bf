use reqwest::Url;

/// Image hosts an avatar may be served from.
pub const DEFAULT_AVATAR_HOSTS: &[&str] = &[
    "metadata.ens.domains",
    "euc.li",
    "ipfs.io",
    "cloudflare-ipfs.com",
    "arweave.net",
    "nft-cdn.alchemy.com",
    "i.seadn.io",
    "i.imgur.com",
];

/// Allow-list check for avatar URLs pulled out of name records.
#[derive(Debug, Clone)]
pub struct AvatarPolicy {
    allowed_hosts: Vec<String>,
}

impl Default for AvatarPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_AVATAR_HOSTS.iter().map(|h| h.to_string()))
    }
}

impl AvatarPolicy {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_hosts: hosts
                .into_iter()
                .map(|h| h.into().trim().trim_end_matches('.').to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn is_safe(&self, url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        if parsed.scheme() != "https" {
            return false;
        }

        let host = match parsed.host_str() {
            Some(host) => host.trim_end_matches('.').to_lowercase(),
            None => return false,
        };

        self.allowed_hosts.iter().any(|allowed| {
            host == *allowed || host.ends_with(&format!(".{}", allowed))
        })
    }
}

/// Check `url` against the default allow-list.
pub fn is_avatar_safe(url: &str) -> bool {
    AvatarPolicy::default().is_safe(url)
}
