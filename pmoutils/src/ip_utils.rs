use get_if_addrs::get_if_addrs;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Masque /24 appliqué aux adresses statiques saisies dans le formulaire.
pub const SUBNET_24: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

/// Erreur de lecture d'une adresse IPv4 saisie par l'utilisateur.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("empty address")]
    Empty,
    #[error("malformed IPv4 address: '{0}'")]
    Malformed(String),
    #[error("address {0} cannot be used as a host address")]
    NotAHost(Ipv4Addr),
}

/// Devine l'adresse IP locale de la machine.
///
/// Crée un socket UDP et le "connecte" vers `8.8.8.8:80` pour que le système
/// choisisse l'interface de sortie, puis lit l'adresse locale du socket.
/// Aucun paquet n'est émis (UDP est sans connexion).
///
/// Retourne `"127.0.0.1"` en cas d'échec.
///
/// # Examples
///
/// ```
/// let ip = pmoutils::guess_local_ip();
/// assert!(ip.parse::<std::net::IpAddr>().is_ok());
/// ```
pub fn guess_local_ip() -> String {
    match UdpSocket::bind("0.0.0.0:0") {
        Ok(socket) => {
            if socket.connect("8.8.8.8:80").is_ok() {
                if let Ok(local_addr) = socket.local_addr() {
                    return local_addr.ip().to_string();
                }
            }
            "127.0.0.1".to_string()
        }
        Err(_) => "127.0.0.1".to_string(),
    }
}

/// Première adresse IPv4 non-loopback trouvée sur les interfaces locales.
///
/// Retourne `None` si la machine n'a aucune interface IPv4 configurée
/// (ou si l'énumération des interfaces échoue).
pub fn first_ipv4() -> Option<Ipv4Addr> {
    let interfaces = get_if_addrs().ok()?;

    interfaces.into_iter().find_map(|iface| match iface.ip() {
        IpAddr::V4(ip) if !ip.is_loopback() => Some(ip),
        _ => None,
    })
}

/// Parse une adresse IPv4 d'hôte saisie par l'utilisateur.
///
/// Les espaces autour sont ignorés. Les adresses non utilisables comme hôte
/// (`0.0.0.0`, broadcast, multicast, `x.x.x.0`, `x.x.x.255`) sont refusées :
/// une adresse statique invalide doit faire échouer la configuration
/// plutôt que de retomber silencieusement sur DHCP.
pub fn parse_ipv4(text: &str) -> Result<Ipv4Addr, AddressError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AddressError::Empty);
    }

    let ip: Ipv4Addr = text
        .parse()
        .map_err(|_| AddressError::Malformed(text.to_string()))?;

    let last = ip.octets()[3];
    if ip.is_unspecified() || ip.is_broadcast() || ip.is_multicast() || last == 0 || last == 255 {
        return Err(AddressError::NotAHost(ip));
    }

    Ok(ip)
}

/// Passerelle par défaut d'une adresse : l'hôte `.1` de son /24.
pub fn default_gateway(ip: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, _] = ip.octets();
    Ipv4Addr::new(a, b, c, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_local_ip_returns_valid_ip() {
        let ip = guess_local_ip();

        // Vérifie que le résultat est parsable comme une IP
        assert!(ip.parse::<IpAddr>().is_ok(), "Should return a valid IP address");
    }

    #[test]
    fn test_first_ipv4_is_never_loopback() {
        if let Some(ip) = first_ipv4() {
            assert!(!ip.is_loopback());
        }
    }

    #[test]
    fn test_parse_ipv4_accepts_host_address() {
        assert_eq!(
            parse_ipv4(" 192.168.1.200 "),
            Ok(Ipv4Addr::new(192, 168, 1, 200))
        );
    }

    #[test]
    fn test_parse_ipv4_rejects_malformed() {
        assert_eq!(parse_ipv4(""), Err(AddressError::Empty));
        assert!(matches!(
            parse_ipv4("192.168.1"),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            parse_ipv4("192.168.1.300"),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            parse_ipv4("radio.local"),
            Err(AddressError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_ipv4_rejects_non_host() {
        assert!(matches!(parse_ipv4("0.0.0.0"), Err(AddressError::NotAHost(_))));
        assert!(matches!(
            parse_ipv4("192.168.1.255"),
            Err(AddressError::NotAHost(_))
        ));
        assert!(matches!(
            parse_ipv4("224.0.0.5"),
            Err(AddressError::NotAHost(_))
        ));
    }

    #[test]
    fn test_default_gateway() {
        let ip = Ipv4Addr::new(10, 0, 7, 42);
        assert_eq!(default_gateway(ip), Ipv4Addr::new(10, 0, 7, 1));
    }
}
