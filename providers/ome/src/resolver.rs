//! Device and group identifier resolution
//!
//! Translates what users write (service tags, IP expressions, group names, device
//! names, OData filters) into OME devices. Explicit identifiers that OME does not
//! know fail the resolution; IP expressions and filters that match nothing
//! resolve to an empty list.

use crate::error::ProviderError;
use crate::validators;
use ipnet::IpNet;
use ome_client::{Device, OmeApi, OmeError};
use ome_schema::DeviceInfoState;
use std::collections::BTreeMap;
use std::net::IpAddr;
use tracing::debug;

/// Device capabilities OME advertises per device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    FirmwareUpdate,
    Deployment,
    /// Compared against a compliance template; OME advertises it with the template capability
    Compliance,
}

impl Capability {
    pub fn held_by(&self, device: &Device) -> bool {
        match self {
            Capability::FirmwareUpdate => device.is_firmware_update_capable(),
            Capability::Deployment | Capability::Compliance => device.is_deployment_capable(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Capability::FirmwareUpdate => "firmware update",
            Capability::Deployment => "template deployment",
            Capability::Compliance => "configuration compliance",
        }
    }
}

/// Fail unless every device has `capability`
pub fn require_capability(devices: &[Device], capability: Capability) -> Result<(), OmeError> {
    let missing: Vec<String> = devices
        .iter()
        .filter(|d| !capability.held_by(d))
        .map(|d| {
            if d.device_service_tag.is_empty() {
                d.id.to_string()
            } else {
                d.device_service_tag.clone()
            }
        })
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(OmeError::InvalidRequest(format!(
        "devices {} are not capable of {}",
        missing.join(", "),
        capability.describe()
    )))
}

/// Which devices a resource or data source refers to. At most one kind is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSelector {
    pub device_ids: Vec<i64>,
    pub service_tags: Vec<String>,
    pub ip_expressions: Vec<String>,
    pub filter_expression: Option<String>,
    pub group_names: Vec<String>,
}

impl DeviceSelector {
    #[cfg(test)]
    pub fn by_tags(service_tags: &[String]) -> Self {
        Self {
            service_tags: service_tags.to_vec(),
            ..Default::default()
        }
    }

    /// Devices by ID or service tag, whichever is set
    pub fn by_ids_or_tags(device_ids: &[i64], service_tags: &[String]) -> Self {
        Self {
            device_ids: device_ids.to_vec(),
            service_tags: service_tags.to_vec(),
            ..Default::default()
        }
    }

    /// Nothing selected: every device
    pub fn is_empty(&self) -> bool {
        self.device_ids.is_empty()
            && self.service_tags.is_empty()
            && self.ip_expressions.is_empty()
            && self.filter_expression.as_deref().is_none_or(|f| f.trim().is_empty())
            && self.group_names.is_empty()
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        validators::at_most_one(&[
            ("device_ids", !self.device_ids.is_empty()),
            ("device_service_tags", !self.service_tags.is_empty()),
            ("ip_expressions", !self.ip_expressions.is_empty()),
            (
                "filter_expression",
                self.filter_expression.as_deref().is_some_and(|f| !f.trim().is_empty()),
            ),
            ("device_group_names", !self.group_names.is_empty()),
        ])?;
        for expression in &self.ip_expressions {
            IpExpression::parse(expression).map_err(|e| ProviderError::Validation(e.detail()))?;
        }
        Ok(())
    }
}

/// Resolve a selector to devices, de-duplicated and ordered by ID
pub async fn resolve_devices(client: &dyn OmeApi, selector: &DeviceSelector) -> Result<Vec<Device>, OmeError> {
    let mut found: BTreeMap<i64, Device> = BTreeMap::new();

    if !selector.device_ids.is_empty() {
        for id in &selector.device_ids {
            let device = client.get_device(*id).await.map_err(|e| {
                if e.is_not_found() {
                    OmeError::NotFound(format!("device with ID {} not found", id))
                } else {
                    e
                }
            })?;
            found.insert(device.id, device);
        }
    } else if !selector.service_tags.is_empty() {
        for device in devices_by_tags(client, &selector.service_tags).await? {
            found.insert(device.id, device);
        }
    } else if !selector.group_names.is_empty() {
        for device in devices_by_groups(client, &selector.group_names).await? {
            found.insert(device.id, device);
        }
    } else if !selector.ip_expressions.is_empty() {
        let expressions = selector
            .ip_expressions
            .iter()
            .map(|e| IpExpression::parse(e))
            .collect::<Result<Vec<_>, _>>()?;
        for device in client.list_devices(None).await? {
            let matched = device
                .management_ips()
                .iter()
                .filter_map(|ip| ip.parse::<IpAddr>().ok())
                .any(|ip| expressions.iter().any(|e| e.matches(ip)));
            if matched {
                found.insert(device.id, device);
            }
        }
    } else if let Some(filter) = selector.filter_expression.as_deref().filter(|f| !f.trim().is_empty()) {
        for device in client.list_devices(Some(filter)).await? {
            found.insert(device.id, device);
        }
    } else {
        for device in client.list_devices(None).await? {
            found.insert(device.id, device);
        }
    }

    debug!("Resolved {} devices", found.len());
    Ok(found.into_values().collect())
}

/// Union of devices named by name, service tag and group, ordered by ID
pub async fn resolve_firmware_targets(
    client: &dyn OmeApi,
    device_names: &[String],
    service_tags: &[String],
    group_names: &[String],
) -> Result<Vec<Device>, OmeError> {
    let mut found: BTreeMap<i64, Device> = BTreeMap::new();

    if !device_names.is_empty() {
        let all = client.list_devices(None).await?;
        for name in device_names {
            let device = all
                .iter()
                .find(|d| &d.device_name == name)
                .ok_or_else(|| OmeError::NotFound(format!("device with name {} not found", name)))?;
            found.insert(device.id, device.clone());
        }
    }
    for device in devices_by_tags(client, service_tags).await? {
        found.insert(device.id, device);
    }
    for device in devices_by_groups(client, group_names).await? {
        found.insert(device.id, device);
    }
    Ok(found.into_values().collect())
}

/// State view of a device, without inventory
pub fn device_info(device: &Device) -> DeviceInfoState {
    DeviceInfoState {
        id: device.id,
        device_service_tag: device.device_service_tag.clone(),
        device_name: device.device_name.clone(),
        model: device.model.clone(),
        device_type: device.device_type,
        management_ips: device.management_ips().into_iter().map(str::to_string).collect(),
        power_state: device.power_state,
        status: device.status,
        last_inventory_time: device.last_inventory_time.clone().unwrap_or_default(),
        device_capabilities: device.device_capabilities.clone(),
        inventory: Vec::new(),
    }
}

async fn devices_by_tags(client: &dyn OmeApi, service_tags: &[String]) -> Result<Vec<Device>, OmeError> {
    let mut devices = Vec::with_capacity(service_tags.len());
    for tag in service_tags {
        let device = client
            .get_device_by_service_tag(tag)
            .await?
            .ok_or_else(|| OmeError::NotFound(format!("device with service tag {} not found", tag)))?;
        devices.push(device);
    }
    Ok(devices)
}

async fn devices_by_groups(client: &dyn OmeApi, group_names: &[String]) -> Result<Vec<Device>, OmeError> {
    let mut devices = Vec::new();
    for name in group_names {
        let group = client
            .get_group_by_name(name)
            .await?
            .ok_or_else(|| OmeError::NotFound(format!("group {} not found", name)))?;
        devices.extend(client.get_group_devices(group.id).await?);
    }
    Ok(devices)
}

/// Parsed IP expression: CIDR, single address, dashed range or IPv4 wildcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpExpression {
    Network(IpNet),
    Single(IpAddr),
    Range(IpAddr, IpAddr),
    /// One entry per octet, `None` for `*`
    Wildcard([Option<u8>; 4]),
}

impl IpExpression {
    pub fn parse(expression: &str) -> Result<Self, OmeError> {
        let text = expression.trim();
        let invalid = || OmeError::InvalidRequest(format!("invalid IP expression: {}", expression));

        if text.contains('/') {
            return text.parse::<IpNet>().map(IpExpression::Network).map_err(|_| invalid());
        }
        if text.contains('*') {
            let octets: Vec<&str> = text.split('.').collect();
            if octets.len() != 4 {
                return Err(invalid());
            }
            let mut pattern = [None; 4];
            for (slot, octet) in pattern.iter_mut().zip(octets) {
                *slot = match octet {
                    "*" => None,
                    value => Some(value.parse::<u8>().map_err(|_| invalid())?),
                };
            }
            return Ok(IpExpression::Wildcard(pattern));
        }
        if let Some((start, end)) = text.split_once('-') {
            let start: IpAddr = start.trim().parse().map_err(|_| invalid())?;
            let end = end.trim();
            let end: IpAddr = match (start, end.parse::<u8>()) {
                (IpAddr::V4(v4), Ok(last)) => {
                    let [a, b, c, _] = v4.octets();
                    IpAddr::from([a, b, c, last])
                }
                _ => end.parse().map_err(|_| invalid())?,
            };
            if start.is_ipv4() != end.is_ipv4() || ordinal(start) > ordinal(end) {
                return Err(invalid());
            }
            return Ok(IpExpression::Range(start, end));
        }
        text.parse::<IpAddr>().map(IpExpression::Single).map_err(|_| invalid())
    }

    pub fn matches(&self, ip: IpAddr) -> bool {
        match self {
            IpExpression::Network(net) => net.contains(&ip),
            IpExpression::Single(single) => *single == ip,
            IpExpression::Range(start, end) => {
                start.is_ipv4() == ip.is_ipv4() && ordinal(*start) <= ordinal(ip) && ordinal(ip) <= ordinal(*end)
            }
            IpExpression::Wildcard(pattern) => match ip {
                IpAddr::V4(v4) => pattern
                    .iter()
                    .zip(v4.octets())
                    .all(|(want, got)| want.is_none_or(|w| w == got)),
                IpAddr::V6(_) => false,
            },
        }
    }
}

fn ordinal(ip: IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use pretty_assertions::assert_eq;

    fn ids(devices: &[Device]) -> Vec<i64> {
        devices.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_ip_expression_forms() {
        let ip = |s: &str| s.parse::<IpAddr>().unwrap();
        assert!(IpExpression::parse("10.0.0.0/24").unwrap().matches(ip("10.0.0.12")));
        assert!(!IpExpression::parse("10.0.0.0/24").unwrap().matches(ip("10.0.1.13")));
        assert!(IpExpression::parse("10.0.0.11").unwrap().matches(ip("10.0.0.11")));
        assert!(IpExpression::parse("10.0.0.10-10.0.1.20").unwrap().matches(ip("10.0.1.13")));
        assert!(IpExpression::parse("10.0.0.10-12").unwrap().matches(ip("10.0.0.12")));
        assert!(!IpExpression::parse("10.0.0.10-11").unwrap().matches(ip("10.0.0.12")));
        assert!(IpExpression::parse("10.0.*.*").unwrap().matches(ip("10.0.1.13")));
        assert!(!IpExpression::parse("10.1.*.*").unwrap().matches(ip("10.0.1.13")));
    }

    #[test]
    fn test_invalid_ip_expressions() {
        for expression in ["10.0.0", "10.0.0.300", "10.0.*", "10.0.0.20-10", "host/99", "fe80::1-10.0.0.1"] {
            assert!(
                IpExpression::parse(expression).is_err(),
                "{} should be rejected",
                expression
            );
        }
    }

    #[test]
    fn test_selector_kinds_are_exclusive() {
        let selector = DeviceSelector {
            device_ids: vec![101],
            service_tags: vec!["SVC1001".to_string()],
            ..Default::default()
        };
        let err = selector.validate().unwrap_err();
        assert!(err.to_string().contains("device_ids, device_service_tags"));
        assert!(DeviceSelector::default().validate().is_ok());
    }

    #[tokio::test]
    async fn test_resolve_by_tags_dedupes_and_sorts() {
        let mock = mock_with_servers();
        let tags = vec!["SVC1003".to_string(), "svc1001".to_string(), "SVC1003".to_string()];
        let devices = resolve_devices(&mock, &DeviceSelector::by_tags(&tags)).await.unwrap();
        assert_eq!(ids(&devices), vec![101, 103]);
    }

    #[tokio::test]
    async fn test_unknown_tag_is_not_found() {
        let mock = mock_with_servers();
        let tags = vec!["NOPE999".to_string()];
        let err = resolve_devices(&mock, &DeviceSelector::by_tags(&tags)).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.detail().contains("NOPE999"));
    }

    #[tokio::test]
    async fn test_resolve_by_ip_expression() {
        let mock = mock_with_servers();
        let selector = DeviceSelector {
            ip_expressions: vec!["10.0.0.0/24".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&resolve_devices(&mock, &selector).await.unwrap()), vec![101, 102]);

        let unmatched = DeviceSelector {
            ip_expressions: vec!["192.168.*.*".to_string()],
            ..Default::default()
        };
        assert!(resolve_devices(&mock, &unmatched).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_by_group_and_filter() {
        let mock = mock_with_servers();
        mock.add_group(create_test_group(2001, "rack-a", 1021), &[102, 103]);
        let selector = DeviceSelector {
            group_names: vec!["rack-a".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&resolve_devices(&mock, &selector).await.unwrap()), vec![102, 103]);

        mock.set_filter_result("Model eq 'PowerEdge R650'", vec![101]);
        let selector = DeviceSelector {
            filter_expression: Some("Model eq 'PowerEdge R650'".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&resolve_devices(&mock, &selector).await.unwrap()), vec![101]);
    }

    #[tokio::test]
    async fn test_empty_selector_lists_everything() {
        let mock = mock_with_servers();
        let devices = resolve_devices(&mock, &DeviceSelector::default()).await.unwrap();
        assert_eq!(ids(&devices), vec![101, 102, 103]);
    }

    #[tokio::test]
    async fn test_firmware_targets_union() {
        let mock = mock_with_servers();
        mock.add_group(create_test_group(2001, "rack-a", 1021), &[102, 103]);
        let devices = resolve_firmware_targets(
            &mock,
            &["server-svc1001".to_string()],
            &["SVC1002".to_string()],
            &["rack-a".to_string()],
        )
        .await
        .unwrap();
        assert_eq!(ids(&devices), vec![101, 102, 103]);

        let err = resolve_firmware_targets(&mock, &["missing".to_string()], &[], &[])
            .await
            .unwrap_err();
        assert!(err.detail().contains("missing"));
    }

    #[test]
    fn test_capability_check() {
        let capable = create_test_server(1, "A1", "10.0.0.1");
        let mut switch = create_test_server(2, "SW1", "10.0.0.2");
        switch.device_capabilities = vec![];
        assert!(require_capability(&[capable.clone()], Capability::Deployment).is_ok());
        let err = require_capability(&[capable, switch], Capability::FirmwareUpdate).unwrap_err();
        assert!(err.detail().contains("SW1"));
    }
}
