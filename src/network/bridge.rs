//! Address of the host side of the container bridge

/// Default bridge interface created by the container runtime
pub const DEFAULT_BRIDGE: &str = "docker0";

/// Arguments for `ip` listing the IPv4 addresses of `iface`, one per line
pub fn ip_args(iface: &str) -> Vec<String> {
    ["-4", "-o", "addr", "show", "dev", iface]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Extract the first IPv4 address from `ip -4 -o addr show` output.
///
/// Also accepts the older `ifconfig` form `inet addr:172.17.0.1`.
pub fn parse_inet_address(output: &str) -> Option<String> {
    let mut tokens = output.split_whitespace();
    while let Some(token) = tokens.next() {
        if token != "inet" {
            continue;
        }
        let value = tokens.next()?;
        let value = value.strip_prefix("addr:").unwrap_or(value);
        let address = value.split('/').next().unwrap_or(value);
        if !address.is_empty() {
            return Some(address.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip_output() {
        let out = "5: docker0    inet 172.17.0.1/16 brd 172.17.255.255 scope global docker0\\       valid_lft forever preferred_lft forever\n";
        assert_eq!(parse_inet_address(out).as_deref(), Some("172.17.0.1"));
    }

    #[test]
    fn test_parse_ifconfig_output() {
        let out = "docker0   Link encap:Ethernet\n          inet addr:172.17.42.1  Bcast:0.0.0.0  Mask:255.255.0.0\n";
        assert_eq!(parse_inet_address(out).as_deref(), Some("172.17.42.1"));
    }

    #[test]
    fn test_parse_no_address() {
        assert_eq!(parse_inet_address(""), None);
        assert_eq!(parse_inet_address("3: docker0 inet6 fe80::1/64"), None);
    }

    #[test]
    fn test_ip_args() {
        assert_eq!(ip_args("br0").join(" "), "-4 -o addr show dev br0");
    }
}
