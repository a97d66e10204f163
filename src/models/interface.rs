use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Link status of an interface, as reported by `show interfaces status`.
///
/// Values the switch may grow in future releases map to [LinkStatus::Unknown]
/// rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Disabled,
    Connected,
    Errdisabled,
    Notconnect,
    #[serde(other)]
    Unknown,
}

impl LinkStatus {
    /// Single-character code used in the report's State column.
    pub fn status_char(&self) -> char {
        match self {
            LinkStatus::Disabled => 'D',
            LinkStatus::Connected => 'C',
            LinkStatus::Errdisabled => 'E',
            LinkStatus::Notconnect => '-',
            LinkStatus::Unknown => 'U',
        }
    }
}

/// One entry of the `show interfaces status` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStatus {
    pub link_status: LinkStatus,
    #[serde(default)]
    pub description: String,
    pub interface_type: String,
    #[serde(default)]
    pub bandwidth: u64,
}

/// Envelope of the `show interfaces status` response: a map from interface
/// name to [InterfaceStatus], in the server's key order.
#[derive(Debug, Deserialize)]
pub struct ShowInterfacesStatus {
    #[serde(rename = "interfaceStatuses")]
    interface_statuses: serde_json::Map<String, Value>,
}

impl ShowInterfacesStatus {
    /// Decode each entry, preserving the response's iteration order.
    pub fn into_entries(self) -> Result<Vec<(String, InterfaceStatus)>> {
        let mut entries = Vec::with_capacity(self.interface_statuses.len());
        for (name, value) in self.interface_statuses {
            let status: InterfaceStatus = serde_json::from_value(value)?;
            entries.push((name, status));
        }
        Ok(entries)
    }
}

/// Envelope shared by the per-interface commands (`show interfaces <name>`
/// and `show interfaces <name> transceiver dom`): a map from interface name
/// to a command-specific object.
#[derive(Debug, Deserialize)]
pub struct InterfaceMap {
    #[serde(default)]
    interfaces: serde_json::Map<String, Value>,
}

impl InterfaceMap {
    /// Decode the entry for `name`, or `None` if the server did not include
    /// one.
    pub fn entry<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.interfaces.get(name) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Like [InterfaceMap::entry], but treats a missing entry as a malformed
    /// response.
    pub fn require<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        self.entry(name)?.ok_or_else(|| {
            Error::InvalidResponse(format!("no data for interface {} in response", name))
        })
    }
}

/// Per-interface part of the `transceiver dom` response. `parameters` is
/// absent when the port has no DDM-capable optic.
#[derive(Debug, Deserialize)]
pub struct TransceiverDom {
    #[serde(default)]
    pub parameters: Option<DomParameters>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomParameters {
    pub tx_power: DomChannels,
    pub rx_power: DomChannels,
}

/// Per-lane readings of one DOM parameter, keyed by lane identifier in the
/// server's key order.
#[derive(Debug, Deserialize)]
pub struct DomChannels {
    #[serde(default)]
    pub channels: serde_json::Map<String, Value>,
}

impl DomChannels {
    pub fn lane(&self, lane: &str) -> Option<f64> {
        self.channels.get(lane).and_then(Value::as_f64)
    }
}

/// Per-interface part of the `show interfaces <name>` response. Only the
/// fields the report consumes are modeled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDetail {
    #[serde(default)]
    pub line_protocol_status: String,
    #[serde(default)]
    pub interface_statistics: InterfaceStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStatistics {
    #[serde(default)]
    pub out_bits_rate: f64,
    #[serde(default)]
    pub in_bits_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_status_known_values() {
        for (raw, expected) in [
            ("\"disabled\"", 'D'),
            ("\"connected\"", 'C'),
            ("\"errdisabled\"", 'E'),
            ("\"notconnect\"", '-'),
        ] {
            let status: LinkStatus = serde_json::from_str(raw).expect("failed to parse");
            assert_eq!(status.status_char(), expected);
        }
    }

    #[test]
    fn test_link_status_unhandled_value() {
        let status: LinkStatus =
            serde_json::from_str("\"connecting\"").expect("failed to parse");
        assert_eq!(status, LinkStatus::Unknown);
        assert_eq!(status.status_char(), 'U');
    }

    #[test]
    fn test_status_entries_preserve_order() {
        let raw = r#"{
            "interfaceStatuses": {
                "Ethernet3/72": {
                    "linkStatus": "connected",
                    "description": "sflow:eno33np0",
                    "interfaceType": "10GBASE-LR",
                    "bandwidth": 10000000000
                },
                "Ethernet1": {
                    "linkStatus": "notconnect",
                    "description": "",
                    "interfaceType": "Not Present",
                    "bandwidth": 0
                }
            }
        }"#;
        let parsed: ShowInterfacesStatus = serde_json::from_str(raw).expect("failed to parse");
        let entries = parsed.into_entries().expect("failed to decode entries");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "Ethernet3/72");
        assert_eq!(entries[0].1.link_status, LinkStatus::Connected);
        assert_eq!(entries[0].1.bandwidth, 10_000_000_000);
        assert_eq!(entries[1].0, "Ethernet1");
        assert_eq!(entries[1].1.interface_type, "Not Present");
    }

    #[test]
    fn test_dom_without_parameters() {
        let raw = r#"{"interfaces": {"Ethernet1": {"some": "junk"}}}"#;
        let map: InterfaceMap = serde_json::from_str(raw).expect("failed to parse");
        let dom: TransceiverDom = map
            .require("Ethernet1")
            .expect("failed to decode dom entry");
        assert!(dom.parameters.is_none());
    }

    #[test]
    fn test_dom_lane_lookup() {
        let raw = r#"{
            "parameters": {
                "txPower": {"channels": {"1": 0.81, "2": -1.02}},
                "rxPower": {"channels": {"1": -1.73}}
            }
        }"#;
        let dom: TransceiverDom = serde_json::from_str(raw).expect("failed to parse");
        let params = dom.parameters.expect("expected parameters");
        assert_eq!(params.tx_power.lane("1"), Some(0.81));
        assert_eq!(params.rx_power.lane("1"), Some(-1.73));
        assert_eq!(params.rx_power.lane("2"), None);
    }

    #[test]
    fn test_detail_defaults() {
        let raw = r#"{"lineProtocolStatus": "up"}"#;
        let detail: InterfaceDetail = serde_json::from_str(raw).expect("failed to parse");
        assert_eq!(detail.line_protocol_status, "up");
        assert_eq!(detail.interface_statistics.out_bits_rate, 0.0);
    }
}
