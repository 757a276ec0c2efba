use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};

use crate::error::{MetricsError, Result};

pub const DEFAULT_SERVER: &str = "puppet";
pub const DEFAULT_PORT: u16 = 8140;
pub const DEFAULT_INTERVAL_SECS: u64 = 3;
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const USER_CONFDIR: &str = ".puppetlabs/etc/puppet";
const SYSTEM_CONFDIR: &str = "/etc/puppetlabs/puppet";

/// Certificate material used for client authentication against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cacert: PathBuf,
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Connection settings shared by every metric source.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server: String,
    pub port: u16,
    pub tls: TlsFiles,
    pub use_proxy: bool,
    pub timeout: Duration,
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.server, self.port)
    }
}

/// Values given explicitly on the command line. They win over anything
/// found on disk.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub cacert: Option<PathBuf>,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub no_proxy: bool,
}

/// Locations of the Puppet settings file and the SSL directory, both for
/// the per-user installation and the system-wide one.
#[derive(Debug, Clone)]
pub struct PuppetPaths {
    user_confdir: Option<PathBuf>,
    system_confdir: PathBuf,
    user: String,
    certname: String,
}

impl PuppetPaths {
    /// Detect paths for the current user and host
    pub fn detect() -> Result<Self> {
        let user = current_user()
            .ok_or_else(|| MetricsError::config("Can't determine your username"))?;
        let certname = fqdn().unwrap_or_else(|| "localhost".to_string());

        Ok(Self {
            user_confdir: dirs::home_dir().map(|home| home.join(USER_CONFDIR)),
            system_confdir: PathBuf::from(SYSTEM_CONFDIR),
            user,
            certname,
        })
    }

    /// `certname` names the system-wide agent certificate, normally the
    /// host's fully qualified name.
    pub fn new<P, Q>(user_confdir: Option<P>, system_confdir: Q, user: &str, certname: &str) -> Self
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        Self {
            user_confdir: user_confdir.map(Into::into),
            system_confdir: system_confdir.into(),
            user: user.to_string(),
            certname: certname.to_string(),
        }
    }

    pub fn certname(&self) -> &str {
        &self.certname
    }

    fn candidates(&self, user_rel: &str, system_rel: &str) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(2);
        if let Some(ref dir) = self.user_confdir {
            paths.push(dir.join(user_rel));
        }
        paths.push(self.system_confdir.join(system_rel));
        paths
    }

    pub fn puppet_conf_candidates(&self) -> Vec<PathBuf> {
        self.candidates("puppet.conf", "puppet.conf")
    }

    pub fn cacert_candidates(&self) -> Vec<PathBuf> {
        self.candidates("ssl/certs/ca.pem", "ssl/certs/ca.pem")
    }

    pub fn cert_candidates(&self) -> Vec<PathBuf> {
        self.candidates(
            &format!("ssl/certs/{}.pem", self.user),
            &format!("ssl/certs/{}.pem", self.certname),
        )
    }

    pub fn key_candidates(&self) -> Vec<PathBuf> {
        self.candidates(
            &format!("ssl/private_keys/{}.pem", self.user),
            &format!("ssl/private_keys/{}.pem", self.certname),
        )
    }

    /// Build the server configuration from overrides, `puppet.conf` and the
    /// conventional certificate locations.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<ServerConfig> {
        let settings = match first_usable(&self.puppet_conf_candidates(), "Puppet settings") {
            Some(path) => read_puppet_settings(&path)?,
            None => PuppetSettings::default(),
        };

        let server = overrides
            .server
            .clone()
            .or(settings.server)
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        log::info!("Using puppetserver {}", server);

        // An explicit certname in puppet.conf names the agent certificate
        let paths = match settings.certname {
            Some(certname) => Self {
                certname,
                ..self.clone()
            },
            None => self.clone(),
        };
        paths.resolve_tls(overrides).map(|tls| ServerConfig {
            server,
            port: overrides.port.unwrap_or(DEFAULT_PORT),
            tls,
            use_proxy: !overrides.no_proxy,
            timeout: HTTP_TIMEOUT,
        })
    }

    fn resolve_tls(&self, overrides: &ConfigOverrides) -> Result<TlsFiles> {
        Ok(TlsFiles {
            cacert: pick_file(
                overrides.cacert.as_deref(),
                &self.cacert_candidates(),
                "CA certificate",
            )?,
            cert: pick_file(
                overrides.cert.as_deref(),
                &self.cert_candidates(),
                "client certificate",
            )?,
            key: pick_file(overrides.key.as_deref(), &self.key_candidates(), "client key")?,
        })
    }
}

/// A file is usable when it is a regular file we are allowed to open
pub fn is_usable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

fn first_usable(candidates: &[PathBuf], description: &str) -> Option<PathBuf> {
    for path in candidates {
        if is_usable_file(path) {
            log::info!("{} {} is readable", description, path.display());
            return Some(path.clone());
        }
        log::info!(
            "{} {} is not readable or does not exist",
            description,
            path.display()
        );
    }
    None
}

fn pick_file(explicit: Option<&Path>, candidates: &[PathBuf], description: &str) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if is_usable_file(path) {
            return Ok(path.to_path_buf());
        }
        return Err(MetricsError::config(format!(
            "{} {} is not readable or does not exist",
            description,
            path.display()
        )));
    }

    first_usable(candidates, description)
        .ok_or_else(|| MetricsError::config(format!("No usable {} found", description)))
}

/// Agent settings read from `puppet.conf`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuppetSettings {
    pub server: Option<String>,
    pub certname: Option<String>,
}

/// Read the agent settings from `puppet.conf`. Each is looked up in the
/// `[agent]` section first, falling back to `[main]` which the agent
/// inherits from.
pub fn read_puppet_settings(path: &Path) -> Result<PuppetSettings> {
    let settings = config::Config::builder()
        .add_source(config::File::new(
            &path.to_string_lossy(),
            config::FileFormat::Ini,
        ))
        .build()
        .map_err(|e| MetricsError::config(format!("Failed to read {}: {}", path.display(), e)))?;

    Ok(PuppetSettings {
        server: agent_setting(&settings, path, "server")?,
        certname: agent_setting(&settings, path, "certname")?,
    })
}

fn agent_setting(settings: &config::Config, path: &Path, name: &str) -> Result<Option<String>> {
    for section in ["agent", "main"] {
        let key = format!("{}.{}", section, name);
        match settings.get_string(&key) {
            Ok(value) if !value.trim().is_empty() => return Ok(Some(value.trim().to_string())),
            Ok(_) | Err(config::ConfigError::NotFound(_)) => {}
            Err(e) => {
                return Err(MetricsError::config(format!(
                    "Invalid {} in {}: {}",
                    key,
                    path.display(),
                    e
                )))
            }
        }
    }

    Ok(None)
}

/// Login name, looked up the way Puppet tooling does: `LOGNAME`, `USER`,
/// `LNAME` and `USERNAME` first, then the account owning this process.
fn current_user() -> Option<String> {
    login_name_from(|var| std::env::var(var).ok()).or_else(process_owner)
}

fn login_name_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    ["LOGNAME", "USER", "LNAME", "USERNAME"]
        .into_iter()
        .filter_map(lookup)
        .find(|name| !name.is_empty())
}

fn process_owner() -> Option<String> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        false,
        ProcessRefreshKind::nothing().with_user(UpdateKind::Always),
    );
    let uid = system.process(pid)?.user_id()?.clone();

    let users = Users::new_with_refreshed_list();
    users.get_user_by_id(&uid).map(|user| user.name().to_string())
}

/// Fully qualified name of this host, the default Puppet certname
fn fqdn() -> Option<String> {
    let host = System::host_name().filter(|name| !name.is_empty())?;
    let canonical = canonical_name(&host);
    Some(qualify(host, canonical))
}

/// Prefer whichever name is dotted, the resolver's canonical one first.
/// Without a dotted name the plain host name is kept.
fn qualify(host: String, canonical: Option<String>) -> String {
    match canonical {
        Some(name) if name.contains('.') => name,
        _ => host,
    }
}

#[cfg(unix)]
fn canonical_name(host: &str) -> Option<String> {
    let hints = dns_lookup::AddrInfoHints {
        flags: libc::AI_CANONNAME,
        ..dns_lookup::AddrInfoHints::default()
    };

    match dns_lookup::getaddrinfo(Some(host), None, Some(hints)) {
        Ok(mut addrs) => addrs.find_map(|addr| addr.ok().and_then(|addr| addr.canonname)),
        Err(e) => {
            log::info!("Cannot resolve {}: {:?}", host, e);
            None
        }
    }
}

#[cfg(not(unix))]
fn canonical_name(_host: &str) -> Option<String> {
    None
}
