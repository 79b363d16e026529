//! Region routing for inbound receivers
//!
//! Turns a raw international phone number into the region whose gateway
//! will carry it and the national-format digits that gateway expects.

use std::collections::HashSet;

use phonenumber::Mode;
use relay_shared::phone::{digits_only, mask_phone_number};

use crate::domain::entities::Region;
use crate::errors::RoutingError;
use crate::services::gateway::GatewayRegistry;

/// Outcome of a successful routing decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNumber {
    pub region: Region,
    /// National format with every non-digit removed
    pub national_number: String,
}

/// Maps phone numbers onto the set of regions that have a gateway
#[derive(Debug, Clone)]
pub struct RegionRouter {
    supported: HashSet<Region>,
}

impl RegionRouter {
    pub fn new(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            supported: regions.into_iter().collect(),
        }
    }

    /// Accept exactly the regions that have a registered gateway
    pub fn from_registry(registry: &GatewayRegistry) -> Self {
        Self::new(registry.regions())
    }

    pub fn supports(&self, region: Region) -> bool {
        self.supported.contains(&region)
    }

    /// Resolve `raw` into its region and national number.
    ///
    /// There is no default region: input without a country code is rejected
    /// as `InvalidFormat`.
    pub fn resolve(&self, raw: &str) -> Result<ResolvedNumber, RoutingError> {
        let raw = raw.trim();
        let invalid = || RoutingError::InvalidFormat {
            receiver: mask_phone_number(raw),
        };

        if raw.is_empty() {
            return Err(invalid());
        }

        let number = phonenumber::parse(None, raw).map_err(|e| {
            tracing::debug!(receiver = %mask_phone_number(raw), error = %e, "Unparseable receiver");
            invalid()
        })?;

        let code = number
            .country()
            .id()
            .map(|id| id.as_ref().to_string())
            .ok_or(RoutingError::UnsupportedRegion { region: None })?;

        let region = code
            .parse::<Region>()
            .ok()
            .filter(|region| self.supports(*region))
            .ok_or_else(|| RoutingError::UnsupportedRegion {
                region: Some(code.clone()),
            })?;

        if !phonenumber::is_valid(&number) {
            return Err(invalid());
        }

        let national_number = digits_only(&number.format().mode(Mode::National).to_string());
        if national_number.is_empty() {
            return Err(invalid());
        }

        Ok(ResolvedNumber {
            region,
            national_number,
        })
    }
}
