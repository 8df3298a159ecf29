//! nmap XML (`-oX -`) parsing: service versions of open ports and the best
//! OS guess.
//!
//! ```rust
//! use recon_core::adapters::parse_nmap_xml;
//!
//! let xml = r#"<nmaprun><host><ports>
//!   <port protocol="tcp" portid="22">
//!     <state state="open"/>
//!     <service name="ssh" product="OpenSSH" version="8.9p1"/>
//!   </port>
//! </ports></host></nmaprun>"#;
//!
//! let scan = parse_nmap_xml(xml).unwrap();
//! assert_eq!(scan.services[0].port, 22);
//! assert_eq!(scan.services[0].product.as_deref(), Some("OpenSSH"));
//! ```

use std::collections::HashSet;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Version detection result for one open port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Port number.
    pub port: u16,
    /// Service name (`http`, `ssh`, ...).
    pub service: Option<String>,
    /// Product name.
    pub product: Option<String>,
    /// Product version.
    pub version: Option<String>,
    /// Extra version detail.
    pub extrainfo: Option<String>,
}

/// Best operating system match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsMatch {
    /// OS description as nmap names it.
    pub name: String,
    /// Confidence in percent.
    pub accuracy: Option<u8>,
}

/// What a deep nmap scan contributes to a port report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NmapScan {
    /// Open ports with service details, in output order.
    pub services: Vec<ServiceInfo>,
    /// First `osmatch`, if OS detection produced one.
    pub os: Option<OsMatch>,
}

/// Parse nmap XML output.
///
/// Only ports whose state is `open` are kept; a port listed by several
/// host entries (`--resolve-all`) is reported once. Empty input yields an
/// empty scan.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the XML is malformed.
pub fn parse_nmap_xml(xml: &str) -> Result<NmapScan> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut scan = NmapScan::default();
    let mut buf = Vec::new();
    let mut seen = HashSet::new();

    // State for the <port> element being read
    let mut current: Option<ServiceInfo> = None;
    let mut open = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => match e.local_name().as_ref() {
                b"port" => {
                    current = attr(&e, b"portid")?
                        .and_then(|id| id.parse().ok())
                        .map(|port| ServiceInfo {
                            port,
                            ..ServiceInfo::default()
                        });
                    open = false;
                },
                b"state" => open = attr(&e, b"state")?.as_deref() == Some("open"),
                b"service" => {
                    if let Some(service) = current.as_mut() {
                        service.service = attr(&e, b"name")?;
                        service.product = attr(&e, b"product")?;
                        service.version = attr(&e, b"version")?;
                        service.extrainfo = attr(&e, b"extrainfo")?;
                    }
                },
                b"osmatch" if scan.os.is_none() => {
                    if let Some(name) = attr(&e, b"name")? {
                        let accuracy = attr(&e, b"accuracy")?.and_then(|a| a.parse().ok());
                        scan.os = Some(OsMatch { name, accuracy });
                    }
                },
                _ => {},
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"port" => {
                if let Some(service) = current.take() {
                    if open && seen.insert(service.port) {
                        scan.services.push(service);
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Parse(format!("nmap XML parse error: {e}"))),
            _ => {},
        }
        buf.clear();
    }

    Ok(scan)
}

/// Unescaped value of attribute `key`, `None` when absent or empty.
fn attr(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| Error::Parse(format!("nmap XML attribute: {e}")))?;
        if attribute.key.local_name().as_ref() == key {
            let value = attribute
                .unescape_value()
                .map_err(|e| Error::Parse(format!("nmap XML attribute: {e}")))?;
            return Ok(Some(value.into_owned()).filter(|v| !v.is_empty()));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::disallowed_macros,
    clippy::unnecessary_wraps
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEEP_SCAN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<nmaprun scanner="nmap" args="nmap -Pn -sV -O -p 22,80,443 -oX - example.com">
  <host starttime="1700000000">
    <status state="up" reason="user-set"/>
    <address addr="93.184.216.34" addrtype="ipv4"/>
    <ports>
      <port protocol="tcp" portid="22">
        <state state="open" reason="syn-ack"/>
        <service name="ssh" product="OpenSSH" version="8.9p1 Ubuntu 3ubuntu0.6" extrainfo="Ubuntu Linux; protocol 2.0" method="table" conf="10">
          <cpe>cpe:/a:openbsd:openssh:8.9p1</cpe>
        </service>
      </port>
      <port protocol="tcp" portid="80">
        <state state="open" reason="syn-ack"/>
        <service name="http" product="nginx" version="1.18.0" method="table" conf="10"/>
        <script id="http-title" output="Example &amp; Co"/>
      </port>
      <port protocol="tcp" portid="443">
        <state state="filtered" reason="no-response"/>
        <service name="https" method="table" conf="3"/>
      </port>
    </ports>
    <os>
      <osmatch name="Linux 5.0 - 5.14" accuracy="95" line="1">
        <osclass type="general purpose" vendor="Linux" osfamily="Linux" accuracy="95"/>
      </osmatch>
      <osmatch name="Linux 4.15" accuracy="90" line="2"/>
    </os>
  </host>
</nmaprun>
"#;

    #[test]
    fn test_open_ports_with_versions() {
        let scan = parse_nmap_xml(DEEP_SCAN).unwrap();
        assert_eq!(
            scan.services,
            vec![
                ServiceInfo {
                    port: 22,
                    service: Some("ssh".into()),
                    product: Some("OpenSSH".into()),
                    version: Some("8.9p1 Ubuntu 3ubuntu0.6".into()),
                    extrainfo: Some("Ubuntu Linux; protocol 2.0".into()),
                },
                ServiceInfo {
                    port: 80,
                    service: Some("http".into()),
                    product: Some("nginx".into()),
                    version: Some("1.18.0".into()),
                    extrainfo: None,
                },
            ]
        );
    }

    #[test]
    fn test_first_os_match_wins() {
        let scan = parse_nmap_xml(DEEP_SCAN).unwrap();
        assert_eq!(
            scan.os,
            Some(OsMatch {
                name: "Linux 5.0 - 5.14".into(),
                accuracy: Some(95),
            })
        );
    }

    #[test]
    fn test_port_seen_on_two_addresses_is_reported_once() {
        let host = r#"<host><ports><port portid="80"><state state="open"/><service name="http"/></port></ports></host>"#;
        let xml = format!("<nmaprun>{host}{host}</nmaprun>");
        let scan = parse_nmap_xml(&xml).unwrap();
        assert_eq!(scan.services.len(), 1);
        assert!(scan.os.is_none());
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(parse_nmap_xml("").unwrap(), NmapScan::default());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = parse_nmap_xml("<nmaprun><host></ports></nmaprun>").unwrap_err();
        assert_eq!(err.category(), "parse");
    }
}
