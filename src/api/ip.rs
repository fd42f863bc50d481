//! Local address discovery.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Returns the address this host would use to reach the outside world.
///
/// Connecting a UDP socket only selects a route; no packet is sent. Falls
/// back to `127.0.0.1` on hosts without a usable route.
#[must_use]
pub fn local_ip() -> IpAddr {
    match route_probe() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::debug!("Could not determine local address, using loopback: {e}");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn route_probe() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 53))?;
    Ok(socket.local_addr()?.ip())
}
