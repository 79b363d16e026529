//! Region to gateway lookup

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::Region;
use crate::errors::DomainError;

use super::traits::SmsGateway;

/// Gateways keyed by the region they serve
#[derive(Clone, Default)]
pub struct GatewayRegistry {
    gateways: HashMap<Region, Arc<dyn SmsGateway>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `gateway` for `region`, replacing any previous entry
    pub fn register(&mut self, region: Region, gateway: Arc<dyn SmsGateway>) {
        self.gateways.insert(region, gateway);
    }

    pub fn with(mut self, region: Region, gateway: Arc<dyn SmsGateway>) -> Self {
        self.register(region, gateway);
        self
    }

    /// Gateway for `region`, or `NotConfigured`
    pub fn get(&self, region: Region) -> Result<Arc<dyn SmsGateway>, DomainError> {
        self.gateways
            .get(&region)
            .cloned()
            .ok_or_else(|| DomainError::NotConfigured {
                region: region.to_string(),
            })
    }

    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.gateways.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }
}

impl std::fmt::Debug for GatewayRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (region, gateway) in &self.gateways {
            map.entry(&region.as_str(), &gateway.provider_name());
        }
        map.finish()
    }
}
