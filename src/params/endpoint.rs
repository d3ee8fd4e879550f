//! Connection endpoint composition for host lists.
//!
//! Hosts come from the inventory either bare (`10.0.0.1`) or already carrying
//! a port (`10.0.0.1:5671`). Positions are kept as given: downstream modules
//! zip these lists with other per-host lists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Migration transport family picked alongside the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Ssh,
    Tls,
}

impl Transport {
    pub fn select(tls: bool) -> Self {
        if tls { Transport::Tls } else { Transport::Ssh }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Ssh => f.write_str("ssh"),
            Transport::Tls => f.write_str("tls"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedEndpoints {
    pub endpoints: Vec<String>,
    pub transport: Transport,
}

/// Append `default_port` to every host that does not already name a port.
pub fn compose(hosts: &[String], default_port: u16) -> Vec<String> {
    hosts
        .iter()
        .map(|host| {
            if host.contains(':') {
                host.clone()
            } else {
                format!("{}:{}", host, default_port)
            }
        })
        .collect()
}

pub fn compose_with_transport(hosts: &[String], default_port: u16, tls: bool) -> ComposedEndpoints {
    ComposedEndpoints {
        endpoints: compose(hosts, default_port),
        transport: Transport::select(tls),
    }
}

/// Build an oslo.messaging style URL over already composed endpoints:
/// `rabbit://user:pass@h1:p,user:pass@h2:p/?ssl=0`.
pub fn transport_url(
    scheme: &str,
    user: &str,
    password: &str,
    endpoints: &[String],
    ssl: bool,
) -> String {
    let hosts: Vec<String> = endpoints
        .iter()
        .map(|ep| format!("{}:{}@{}", user, password, ep))
        .collect();
    format!("{}://{}/?ssl={}", scheme, hosts.join(","), u8::from(ssl))
}
