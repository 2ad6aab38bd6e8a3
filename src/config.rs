use serde::{self, Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Clusters the pub/sub service accepts.
pub const PUSHER_CLUSTERS: &[&str] = &[
    "mt1", "us2", "us3", "eu", "ap1", "ap2", "ap3", "ap4", "sa1",
];

const DEFAULT_CLUSTER: &str = "mt1";
const DEFAULT_CHANNEL: &str = "private-foundry-roll-dice";
const DEFAULT_EVENT_CAPACITY: usize = 64;
const DEFAULT_LOCAL_USER: &str = "local";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("toml parsing error: {0}")]
    TomlParsingError(#[from] toml::de::Error),

    #[error("invalid authorization endpoint: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("unknown pusher cluster: {0}")]
    UnknownCluster(String),
}

pub fn read_config<P: Into<PathBuf>>(config_path: P) -> Result<Config, ConfigError> {
    let config_path = config_path.into();
    let config = {
        let contents = fs::read_to_string(&config_path)?;
        deserialize_config(&contents)?
    };

    Ok(config)
}

fn deserialize_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// The "pusher" section: credentials for the pub/sub service and the
/// channel authorization endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct PusherConfig {
    app_key: Option<String>,
    cluster: Option<String>,
    authorization_endpoint: Option<String>,

    /// Authorization user name sent to the endpoint.
    user: Option<String>,

    /// Authorization token for that user.
    token: Option<String>,
}

/// The "irc" section: where relayed rolls go.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct IrcConfig {
    /// The active channel of the game. Public rolls go here.
    channel: Option<String>,

    /// Nickname of the GM. GM rolls are sent to this nick.
    gm_nickname: Option<String>,
}

/// The "relay" section.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct RelayConfig {
    channel: Option<String>,
    event_capacity: Option<usize>,

    /// User id chat messages must come from to be relayed.
    user: Option<String>,

    /// Speaker alias used for chat lines read by the relay binary.
    alias: Option<String>,
}

/// Settings the relay needs to address IRC.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IrcSettings {
    pub channel: String,
    pub gm_nickname: String,
}

impl IrcSettings {
    pub fn new(channel: &str, gm_nickname: &str) -> IrcSettings {
        IrcSettings {
            channel: channel.to_owned(),
            gm_nickname: gm_nickname.to_owned(),
        }
    }

    /// Both the channel and GM nick must be set for rolls to be relayed.
    pub fn is_complete(&self) -> bool {
        !self.channel.is_empty() && !self.gm_nickname.is_empty()
    }
}

/// Represents the toml config file for the relay. Sections are not
/// directly accessible; the config provides methods that handle default
/// values.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pusher: PusherConfig,
    #[serde(default)]
    irc: IrcConfig,
    relay: Option<RelayConfig>,
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        let cluster = self.pusher_cluster();
        if !PUSHER_CLUSTERS.contains(&cluster) {
            return Err(ConfigError::UnknownCluster(cluster.to_owned()));
        }

        self.authorization_endpoint()?;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn pusher_app_key(&self) -> &str {
        self.pusher.app_key.as_deref().unwrap_or("")
    }

    /// The pusher cluster, defaulting to mt1.
    #[inline]
    #[must_use]
    pub fn pusher_cluster(&self) -> &str {
        self.pusher
            .cluster
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CLUSTER)
    }

    #[inline]
    #[must_use]
    pub fn pusher_user(&self) -> &str {
        self.pusher.user.as_deref().unwrap_or("")
    }

    #[inline]
    #[must_use]
    pub fn pusher_token(&self) -> &str {
        self.pusher.token.as_deref().unwrap_or("")
    }

    /// The channel authorization endpoint, if one is configured.
    pub fn authorization_endpoint(&self) -> Result<Option<Url>, ConfigError> {
        match self.pusher.authorization_endpoint.as_deref() {
            Some(endpoint) if !endpoint.is_empty() => Ok(Some(Url::parse(endpoint)?)),
            _ => Ok(None),
        }
    }

    pub fn irc(&self) -> IrcSettings {
        IrcSettings {
            channel: self.irc.channel.clone().unwrap_or_default(),
            gm_nickname: self.irc.gm_nickname.clone().unwrap_or_default(),
        }
    }

    /// Name of the private channel rolls are exchanged on.
    #[inline]
    #[must_use]
    pub fn relay_channel(&self) -> &str {
        self.relay
            .as_ref()
            .and_then(|r| r.channel.as_deref())
            .unwrap_or(DEFAULT_CHANNEL)
    }

    /// How many undelivered events each listener may fall behind.
    #[inline]
    #[must_use]
    pub fn event_capacity(&self) -> usize {
        self.relay
            .as_ref()
            .and_then(|r| r.event_capacity)
            .filter(|&c| c > 0)
            .unwrap_or(DEFAULT_EVENT_CAPACITY)
    }

    #[inline]
    #[must_use]
    pub fn relay_user(&self) -> &str {
        self.relay
            .as_ref()
            .and_then(|r| r.user.as_deref())
            .unwrap_or(DEFAULT_LOCAL_USER)
    }

    /// Speaker alias, falling back to the relay user.
    #[inline]
    #[must_use]
    pub fn relay_alias(&self) -> &str {
        self.relay
            .as_ref()
            .and_then(|r| r.alias.as_deref())
            .unwrap_or_else(|| self.relay_user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Write;

    const FULL_CONFIG: &str = indoc! {r##"
        [pusher]
        app_key = "abc123"
        cluster = "eu"
        authorization_endpoint = "https://example.com/app.php/wsauth"
        user = "kefka"
        token = "secret"

        [irc]
        channel = "#returners"
        gm_nickname = "gm"

        [relay]
        channel = "private-test"
        event_capacity = 16
        user = "user-1"
        alias = "Terra"
    "##};

    #[test]
    fn full_config_test() {
        let cfg = deserialize_config(FULL_CONFIG).expect("config should parse");
        assert_eq!("abc123", cfg.pusher_app_key());
        assert_eq!("eu", cfg.pusher_cluster());
        assert_eq!("kefka", cfg.pusher_user());
        assert_eq!("secret", cfg.pusher_token());
        assert_eq!(
            "https://example.com/app.php/wsauth",
            cfg.authorization_endpoint().unwrap().unwrap().as_str()
        );
        assert_eq!(IrcSettings::new("#returners", "gm"), cfg.irc());
        assert_eq!("private-test", cfg.relay_channel());
        assert_eq!(16, cfg.event_capacity());
        assert_eq!("user-1", cfg.relay_user());
        assert_eq!("Terra", cfg.relay_alias());
    }

    #[test]
    fn empty_config_uses_defaults_test() {
        let cfg = deserialize_config("").expect("config should parse");
        assert_eq!("mt1", cfg.pusher_cluster());
        assert_eq!("", cfg.pusher_app_key());
        assert!(cfg.authorization_endpoint().unwrap().is_none());
        assert!(!cfg.irc().is_complete());
        assert_eq!("private-foundry-roll-dice", cfg.relay_channel());
        assert_eq!(64, cfg.event_capacity());
        assert_eq!("local", cfg.relay_user());
        assert_eq!("local", cfg.relay_alias());
    }

    #[test]
    fn unknown_cluster_test() {
        let result = deserialize_config("[pusher]\ncluster = \"moon1\"\n");
        assert!(matches!(result, Err(ConfigError::UnknownCluster(c)) if c == "moon1"));
    }

    #[test]
    fn bad_endpoint_test() {
        let result = deserialize_config("[pusher]\nauthorization_endpoint = \"not a url\"\n");
        assert!(matches!(result, Err(ConfigError::UrlParseError(_))));
    }

    #[test]
    fn read_config_from_file_test() {
        let mut file = tempfile::NamedTempFile::new().expect("could not create temp file");
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();
        let cfg = read_config(file.path()).expect("config should load");
        assert_eq!("#returners", cfg.irc().channel);
    }

    #[test]
    fn missing_file_test() {
        let result = read_config("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
