//! GeoIP lookup stage (spec §4.4 item 3). Pluggable behind a trait so the
//! `maxminddb`-backed implementation can be feature-gated without the
//! Scanner Pool depending on the concrete reader.

use std::net::IpAddr;

pub trait GeoIpProvider: Send + Sync {
    /// The country name for `ip`, or `None` if unresolvable.
    fn lookup_country(&self, ip: IpAddr) -> Option<String>;
}

#[cfg(feature = "geoip")]
pub struct MaxMindProvider {
    reader: maxminddb::Reader<Vec<u8>>,
}

#[cfg(feature = "geoip")]
impl MaxMindProvider {
    pub fn open(db_path: &str) -> crate::error::Result<Self> {
        let reader = maxminddb::Reader::open_readfile(db_path).map_err(|e| {
            crate::error::Error::DependencyMissing(format!("cannot open GeoIP database '{}': {}", db_path, e))
        })?;
        Ok(MaxMindProvider { reader })
    }
}

#[cfg(feature = "geoip")]
impl GeoIpProvider for MaxMindProvider {
    fn lookup_country(&self, ip: IpAddr) -> Option<String> {
        let city: maxminddb::geoip2::City = self.reader.lookup(ip).ok()?;
        city.country
            .and_then(|c| c.names)
            .and_then(|names| names.get("en").map(|s| s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Option<String>);
    impl GeoIpProvider for FixedProvider {
        fn lookup_country(&self, _ip: IpAddr) -> Option<String> {
            self.0.clone()
        }
    }

    #[test]
    fn provider_trait_is_object_safe() {
        let p: Box<dyn GeoIpProvider> = Box::new(FixedProvider(Some("United States".into())));
        assert_eq!(p.lookup_country("1.2.3.4".parse().unwrap()), Some("United States".to_string()));
    }
}
