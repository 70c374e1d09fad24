//! Connect-option normalization.
//!
//! The historical client derived these defaults in a mutable base class; here
//! it is a free function so every driver shares one deterministic rule set.

use crate::error::{DriverError, Result};
use crate::types::{
    ConnectDriverOpts, ConnectOpts, ConnectSshOpts, ConnectionProfile, PortField,
};

const DEFAULT_SSH_PORT: u16 = 22;

fn port_or(port: Option<&PortField>, fallback: u16) -> u16 {
    port.map_or(fallback, |p| p.as_number(fallback))
}

fn string_or_empty(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

/// Derives the normalized backend wire options from a stored profile.
///
/// Rules, applied deterministically:
/// - missing strings become `""`
/// - `driver_opts.port` is always numeric; missing or unparseable → `0`
/// - `ssh_opts` is `None` (wire `null`) whenever `use_ssh` is false
/// - under SSH, a missing SSH port defaults to `22`
///
/// Fails with [`DriverError::Config`] only when the profile names no driver.
pub fn connect_opts(profile: &ConnectionProfile) -> Result<ConnectOpts> {
    let driver = profile
        .driver_name
        .ok_or_else(|| DriverError::Config("connection profile has no driver".to_string()))?;

    let opts = &profile.driver_opts;
    let driver_opts = ConnectDriverOpts {
        driver: driver.as_str().to_string(),
        host: string_or_empty(opts.host.as_ref()),
        port: port_or(opts.port.as_ref(), 0),
        user: string_or_empty(opts.user.as_ref()),
        password: string_or_empty(opts.password.as_ref()),
        filepath: string_or_empty(opts.filepath.as_ref()),
        database: opts.database.clone(),
    };

    let ssh_opts = if profile.use_ssh {
        let ssh = profile.ssh_opts.clone().unwrap_or_default();
        Some(ConnectSshOpts {
            host: string_or_empty(ssh.host.as_ref()),
            port: port_or(ssh.port.as_ref(), DEFAULT_SSH_PORT),
            user: string_or_empty(ssh.user.as_ref()),
            password: string_or_empty(ssh.password.as_ref()),
            keyfile: ssh.keyfile,
        })
    } else {
        None
    };

    Ok(ConnectOpts {
        use_ssh: profile.use_ssh,
        driver_opts,
        ssh_opts,
    })
}
