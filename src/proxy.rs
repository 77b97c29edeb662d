use anyhow::Result;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyProtocol {
    Http,
    Socks4,
    Socks5,
}

impl ProxyProtocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyProtocol::Http => "http",
            ProxyProtocol::Socks4 => "socks4",
            ProxyProtocol::Socks5 => "socks5",
        }
    }
}

impl FromStr for ProxyProtocol {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(ProxyProtocol::Http),
            "socks4" => Ok(ProxyProtocol::Socks4),
            "socks5" => Ok(ProxyProtocol::Socks5),
            other => Err(anyhow::anyhow!("Unsupported proxy protocol: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
}

/// Egress route for one account's RPC traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    pub protocol: ProxyProtocol,
    pub host: String,
    pub port: u16,
    pub credentials: Option<ProxyCredentials>,
}

fn proxy_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:(http|socks4|socks5)://)?(?:([^:@]+):([^@]+)@)?([^:@/]+):(\d+)$")
            .expect("proxy pattern is valid")
    })
}

impl FromStr for ProxyDescriptor {
    type Err = anyhow::Error;

    /// Accepts `[protocol://][user:pass@]host:port` and the short
    /// `protocol:host:port` form. Protocol defaults to http.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(cap) = proxy_regex().captures(s) {
            let protocol = match cap.get(1) {
                Some(m) => m.as_str().parse()?,
                None => ProxyProtocol::Http,
            };
            let credentials = match (cap.get(2), cap.get(3)) {
                (Some(user), Some(pass)) => Some(ProxyCredentials {
                    username: user.as_str().to_string(),
                    password: pass.as_str().to_string(),
                }),
                _ => None,
            };
            return Ok(Self {
                protocol,
                host: cap[4].to_string(),
                port: parse_port(&cap[5], s)?,
                credentials,
            });
        }

        match s.split(':').collect::<Vec<_>>().as_slice() {
            [protocol, host, port] if !host.is_empty() => Ok(Self {
                protocol: protocol.parse()?,
                host: host.to_string(),
                port: parse_port(port, s)?,
                credentials: None,
            }),
            _ => Err(anyhow::anyhow!("Invalid proxy format: {}", s)),
        }
    }
}

fn parse_port(port: &str, line: &str) -> Result<u16> {
    port.parse::<u16>()
        .map_err(|_| anyhow::anyhow!("Invalid proxy port in {}", line))
}

impl ProxyDescriptor {
    fn endpoint(&self) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}://{}:{}",
            self.protocol.scheme(),
            self.host,
            self.port
        ))?)
    }

    /// Proxy URL with percent-encoded credentials.
    pub fn to_url(&self) -> Result<Url> {
        let mut url = self.endpoint()?;
        if let Some(creds) = &self.credentials {
            url.set_username(&creds.username)
                .map_err(|_| anyhow::anyhow!("Proxy {} cannot carry a username", self))?;
            url.set_password(Some(&creds.password))
                .map_err(|_| anyhow::anyhow!("Proxy {} cannot carry a password", self))?;
        }
        Ok(url)
    }

    pub fn to_reqwest_proxy(&self) -> Result<reqwest::Proxy> {
        match (&self.protocol, &self.credentials) {
            // HTTP proxies authenticate through the Proxy-Authorization header
            (ProxyProtocol::Http, Some(creds)) => Ok(reqwest::Proxy::all(self.endpoint()?)?
                .basic_auth(&creds.username, &creds.password)),
            _ => Ok(reqwest::Proxy::all(self.to_url()?)?),
        }
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.credentials {
            Some(creds) => write!(
                f,
                "{}://{}:***@{}:{}",
                self.protocol.scheme(),
                creds.username,
                self.host,
                self.port
            ),
            None => write!(f, "{}://{}:{}", self.protocol.scheme(), self.host, self.port),
        }
    }
}

/// Round-robin proxy for the account at `index`.
pub fn assign_proxy(proxies: &[ProxyDescriptor], index: usize) -> Option<&ProxyDescriptor> {
    if proxies.is_empty() {
        None
    } else {
        proxies.get(index % proxies.len())
    }
}
