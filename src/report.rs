//! The brief interface report itself: filtering, per-interface lookups and
//! fixed-width row formatting.

use std::io::Write;

use regex::Regex;

use crate::{Connection, LinkStatus, Result};

/// Two header lines plus a separating blank line, printed before any row.
const HEADER: &str = "Interface State/ Description                  Type              TX/RX                             TX/RX signal power, dBm
          Proto                                               load, %       Lane 1       Lane 2       Lane 3       Lane 4

";

/// Placeholder for a missing tx/rx pair, in both the load and power columns.
const NO_DATA: &str = "-/-";

/// Interface type of dot1q sub-interfaces, which are never reported.
const SUBINTERFACE_TYPE: &str = "dot1q-encapsulation";

/// Produces the one-line-per-interface report on a [Connection].
///
/// One `show interfaces status` round trip drives the loop; each surviving
/// Ethernet or Port-Channel interface costs up to two more round trips, for
/// transceiver DOM data and live statistics. Round trips are strictly
/// sequential, and any command failure aborts the whole report.
pub struct Reporter<'a> {
    connection: &'a mut Connection,
    filter: Regex,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter over `connection`. `filter` is matched against
    /// each interface's name and description; compile it case-insensitively
    /// to get the usual operator-friendly behavior.
    pub fn new(connection: &'a mut Connection, filter: Regex) -> Self {
        Reporter { connection, filter }
    }

    /// Fetch everything and write the report to `out`.
    ///
    /// The header goes out after the initial status fetch succeeds, even if
    /// no interface survives filtering.
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let entries = self.connection.show_interfaces_status().await?;
        out.write_all(HEADER.as_bytes())?;

        for (if_name, status) in entries {
            if status.interface_type == SUBINTERFACE_TYPE {
                continue;
            }
            if !self.filter.is_match(&status.description) && !self.filter.is_match(&if_name) {
                continue;
            }

            let short_name = shorten_name(&if_name);
            let description = truncate_description(&status.description);

            let mut if_type = status.interface_type.clone();
            if short_name.starts_with("Po") {
                if_type = lag_label(status.bandwidth);
            }
            if if_type.starts_with("Not Present") || if_type.starts_with("Unknown") {
                if_type = "N/A".to_owned();
            }

            let mut power = String::new();
            let mut load = NO_DATA.to_owned();
            let mut proto = 'D';
            if short_name.starts_with("Et") && if_type != "N/A" {
                power = self.format_power(&if_name).await?;
            }
            if (short_name.starts_with("Et") || short_name.starts_with("Po")) && if_type != "N/A" {
                let (l, p) = self
                    .format_load(&if_name, status.bandwidth, status.link_status)
                    .await?;
                load = l;
                proto = p;
            }

            writeln!(
                out,
                "{:<9} {:<6} {:<28} {:<15} {:>7}  {:<40}",
                short_name,
                format!("{}/{}", status.link_status.status_char(), proto),
                description,
                if_type,
                load,
                power,
            )?;
        }
        Ok(())
    }

    /// Per-lane TX/RX signal power for `if_name`, one right-aligned
    /// `tx/rx` pair of 11 columns per lane, lanes separated by two spaces.
    /// Lanes come out in the order the server listed them.
    async fn format_power(&mut self, if_name: &str) -> Result<String> {
        let params = match self.connection.show_transceiver_dom(if_name).await? {
            Some(params) => params,
            // no DDM data on this port
            None => return Ok(format!("{:>11}", NO_DATA)),
        };
        let mut lanes: Vec<String> = Vec::with_capacity(4);
        for lane in params.rx_power.channels.keys() {
            if let (Some(tx), Some(rx)) = (params.tx_power.lane(lane), params.rx_power.lane(lane))
            {
                lanes.push(format!("{:>11}", format!("{:.1}/{:.1}", tx, rx)));
            }
        }
        Ok(lanes.join("  "))
    }

    /// TX/RX load of `if_name` in percent of its bandwidth, plus the
    /// protocol status character. Load is only computed for connected
    /// interfaces; everything else renders the placeholder.
    async fn format_load(
        &mut self,
        if_name: &str,
        bandwidth: u64,
        link_status: LinkStatus,
    ) -> Result<(String, char)> {
        let detail = self.connection.show_interface(if_name).await?;
        let proto = if detail.line_protocol_status == "up" {
            'U'
        } else {
            'D'
        };
        if link_status != LinkStatus::Connected {
            return Ok((NO_DATA.to_owned(), proto));
        }
        let stats = detail.interface_statistics;
        let tx = (100.0 * stats.out_bits_rate / bandwidth as f64) as i64;
        let rx = (100.0 * stats.in_bits_rate / bandwidth as f64) as i64;
        Ok((format!("{}/{}", tx, rx), proto))
    }
}

/// Strip the verbose middles out of an interface name: `Ethernet3/72`
/// becomes `Et3/72`, `Port-Channel10` becomes `Po10`.
pub fn shorten_name(if_name: &str) -> String {
    if_name
        .replace("hernet", "")
        .replace("rt-Channel", "")
        .replace("agement", "")
}

/// Cut a long description down to 24 characters plus an ellipsis marker.
///
/// Truncation needs at least 3 characters past the 24-column mark, so 25
/// and 26 character descriptions pass through unchanged.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() < 27 {
        return description.to_owned();
    }
    let mut cut: String = description.chars().take(24).collect();
    cut.push_str("...");
    cut
}

/// Synthesized type label of an aggregate interface, from its bandwidth.
pub fn lag_label(bandwidth: u64) -> String {
    format!("LAG-{}G", bandwidth / 1_000_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_name() {
        assert_eq!(shorten_name("Ethernet3/72"), "Et3/72");
        assert_eq!(shorten_name("Ethernet1"), "Et1");
        assert_eq!(shorten_name("Port-Channel10"), "Po10");
        assert_eq!(shorten_name("Management1"), "Man1");
        assert_eq!(shorten_name("Vlan100"), "Vlan100");
    }

    #[test]
    fn test_truncate_description_boundaries() {
        let exact = "123456789012345678901234";
        assert_eq!(exact.len(), 24);
        assert_eq!(truncate_description(exact), exact);

        // one or two characters over the mark still fit
        let over_one = "1234567890123456789012345";
        assert_eq!(truncate_description(over_one), over_one);
        let over_two = "12345678901234567890123456";
        assert_eq!(truncate_description(over_two), over_two);

        let over_three = "123456789012345678901234567";
        assert_eq!(
            truncate_description(over_three),
            "123456789012345678901234...",
        );

        let long = "connection to the upstream peering switch";
        assert_eq!(truncate_description(long), "connection to the upstre...");
    }

    #[test]
    fn test_truncate_description_empty() {
        assert_eq!(truncate_description(""), "");
    }

    #[test]
    fn test_lag_label() {
        assert_eq!(lag_label(20_000_000_000), "LAG-20G");
        assert_eq!(lag_label(10_000_000_000), "LAG-10G");
        // integer truncation
        assert_eq!(lag_label(1_500_000_000), "LAG-1G");
        assert_eq!(lag_label(0), "LAG-0G");
    }
}
