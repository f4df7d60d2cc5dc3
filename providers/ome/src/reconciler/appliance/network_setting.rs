//! `ome_network_setting`
//!
//! Appliance proxy, clock and session limits. Only the sections present in the
//! configuration are managed; the rest of the appliance settings are left as
//! they are. The settings cannot be removed, so delete drops them from state.

use crate::error::{ProviderError, ResultExt};
use crate::resource::{Context, Resource};
use crate::validators;
use async_trait::async_trait;
use ome_client::{ProxyConfiguration, SessionConfiguration, TimeConfiguration};
use ome_schema::{NetworkSettingState, ProxySettingState, SessionSettingState, TimeSettingState};
use tracing::{debug, info};

const STATE_ID: &str = "network_setting";
const SESSION_TYPES: [&str; 5] = ["GUI", "API", "SSH", "Serial", "UniversalTimeout"];
const MILLIS_PER_MINUTE: i64 = 60_000;

/// Reconciler for appliance network settings
#[derive(Debug, Default)]
pub struct NetworkSettingResource;

fn validate_proxy(proxy: &ProxySettingState) -> Result<(), ProviderError> {
    if !proxy.enable_proxy {
        return Ok(());
    }
    validators::not_blank("proxy.ip_address", &proxy.ip_address)?;
    if !(1..=65535).contains(&proxy.proxy_port) {
        return Err(ProviderError::Validation(
            "Attribute proxy.proxy_port must be between 1 and 65535".to_string(),
        ));
    }
    if proxy.enable_authentication {
        validators::not_blank("proxy.username", &proxy.username)?;
        validators::not_blank("proxy.password", &proxy.password)?;
    }
    Ok(())
}

fn validate_time(time: &TimeSettingState) -> Result<(), ProviderError> {
    validators::not_blank("time.time_zone", &time.time_zone)?;
    if time.enable_ntp {
        validators::not_blank("time.primary_ntp_address", &time.primary_ntp_address)?;
        if !time.system_time.is_empty() {
            return Err(ProviderError::Validation(
                "time.system_time cannot be set when enable_ntp is true".to_string(),
            ));
        }
    } else {
        validators::not_blank("time.system_time", &time.system_time)?;
        if chrono::NaiveDateTime::parse_from_str(&time.system_time, "%Y-%m-%d %H:%M:%S%.3f").is_err() {
            return Err(ProviderError::Validation(format!(
                "Attribute time.system_time must look like yyyy-MM-dd HH:mm:ss.SSS, got: {:?}",
                time.system_time
            )));
        }
    }
    Ok(())
}

fn validate_sessions(sessions: &[SessionSettingState]) -> Result<(), ProviderError> {
    validators::size_between("session", sessions, 1, SESSION_TYPES.len())?;
    let types: Vec<&str> = sessions.iter().map(|s| s.session_type.as_str()).collect();
    validators::unique("session.session_type", &types)?;
    for session in sessions {
        validators::one_of("session.session_type", &session.session_type, &SESSION_TYPES)?;
        if session.max_sessions < 0 || session.session_timeout < 0 {
            return Err(ProviderError::Validation(format!(
                "session {} limits must not be negative",
                session.session_type
            )));
        }
    }
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    Some(value.to_string()).filter(|v| !v.is_empty())
}

fn proxy_configuration(proxy: &ProxySettingState) -> ProxyConfiguration {
    ProxyConfiguration {
        ip_address: proxy.ip_address.clone(),
        port_number: proxy.proxy_port,
        enable_authentication: proxy.enable_authentication,
        enable_proxy: proxy.enable_proxy,
        ssl_check_disabled: proxy.ssl_check_disabled,
        username: proxy.username.clone(),
        password: proxy.enable_authentication.then(|| proxy.password.clone()),
    }
}

fn time_configuration(time: &TimeSettingState) -> TimeConfiguration {
    TimeConfiguration {
        time_zone: time.time_zone.clone(),
        enable_ntp: time.enable_ntp,
        primary_ntp_address: optional(&time.primary_ntp_address),
        secondary_ntp_address1: optional(&time.secondary_ntp_address1),
        secondary_ntp_address2: optional(&time.secondary_ntp_address2),
        system_time: optional(&time.system_time).filter(|_| !time.enable_ntp),
    }
}

/// Planned session limits merged into what OME reports, checked against OME's bounds
fn session_configurations(
    current: &[SessionConfiguration],
    sessions: &[SessionSettingState],
    summary: &str,
) -> Result<Vec<SessionConfiguration>, ProviderError> {
    let mut configs = Vec::with_capacity(sessions.len());
    for session in sessions {
        let mut config = current
            .iter()
            .find(|c| c.session_type == session.session_type)
            .cloned()
            .unwrap_or_else(|| SessionConfiguration {
                session_type: session.session_type.clone(),
                ..Default::default()
            });
        let timeout = session.session_timeout * MILLIS_PER_MINUTE;
        if config.max_session_timeout > 0 && !(config.min_session_timeout..=config.max_session_timeout).contains(&timeout) {
            return Err(ProviderError::failed(
                summary,
                format!(
                    "{} session timeout must be between {} and {} minutes",
                    session.session_type,
                    config.min_session_timeout / MILLIS_PER_MINUTE,
                    config.max_session_timeout / MILLIS_PER_MINUTE
                ),
            ));
        }
        if config.max_sessions_allowed > 0
            && !(config.min_sessions_allowed..=config.max_sessions_allowed).contains(&session.max_sessions)
        {
            return Err(ProviderError::failed(
                summary,
                format!(
                    "{} max_sessions must be between {} and {}",
                    session.session_type, config.min_sessions_allowed, config.max_sessions_allowed
                ),
            ));
        }
        config.max_sessions = session.max_sessions;
        config.session_timeout = timeout;
        configs.push(config);
    }
    Ok(configs)
}

impl NetworkSettingResource {
    async fn apply(&self, ctx: &Context<'_>, plan: &NetworkSettingState, summary: &str) -> Result<(), ProviderError> {
        if let Some(proxy) = &plan.proxy {
            ctx.client
                .update_proxy_configuration(&proxy_configuration(proxy))
                .await
                .or_fail(summary)?;
            info!("Applied proxy settings (enabled: {})", proxy.enable_proxy);
        }
        if let Some(time) = &plan.time {
            ctx.client
                .update_time_configuration(&time_configuration(time))
                .await
                .or_fail(summary)?;
            info!("Applied time settings (time zone {})", time.time_zone);
        }
        if let Some(sessions) = &plan.session {
            let current = ctx.client.list_session_configurations().await.or_fail(summary)?;
            let configs = session_configurations(&current, sessions, summary)?;
            ctx.client.update_session_configurations(&configs).await.or_fail(summary)?;
            info!("Applied {} session settings", configs.len());
        }
        Ok(())
    }

    /// Sections of `base` as OME reports them; secrets and the set clock come from `base`
    async fn observe(
        &self,
        ctx: &Context<'_>,
        base: &NetworkSettingState,
        summary: &str,
    ) -> Result<NetworkSettingState, ProviderError> {
        let mut state = NetworkSettingState {
            id: STATE_ID.to_string(),
            ..Default::default()
        };
        if let Some(known) = &base.proxy {
            let proxy = ctx.client.get_proxy_configuration().await.or_fail(summary)?;
            state.proxy = Some(ProxySettingState {
                enable_proxy: proxy.enable_proxy,
                ip_address: proxy.ip_address,
                proxy_port: proxy.port_number,
                enable_authentication: proxy.enable_authentication,
                username: proxy.username,
                password: known.password.clone(),
                ssl_check_disabled: proxy.ssl_check_disabled,
            });
        }
        if let Some(known) = &base.time {
            let time = ctx.client.get_time_configuration().await.or_fail(summary)?;
            state.time = Some(TimeSettingState {
                time_zone: time.time_zone,
                enable_ntp: time.enable_ntp,
                primary_ntp_address: time.primary_ntp_address.unwrap_or_default(),
                secondary_ntp_address1: time.secondary_ntp_address1.unwrap_or_default(),
                secondary_ntp_address2: time.secondary_ntp_address2.unwrap_or_default(),
                system_time: if time.enable_ntp { String::new() } else { known.system_time.clone() },
            });
        }
        if let Some(known) = &base.session {
            let current = ctx.client.list_session_configurations().await.or_fail(summary)?;
            state.session = Some(
                known
                    .iter()
                    .filter_map(|k| current.iter().find(|c| c.session_type == k.session_type))
                    .map(|c| SessionSettingState {
                        session_type: c.session_type.clone(),
                        max_sessions: c.max_sessions,
                        session_timeout: c.session_timeout / MILLIS_PER_MINUTE,
                    })
                    .collect(),
            );
        }
        Ok(state)
    }
}

#[async_trait]
impl Resource for NetworkSettingResource {
    type State = NetworkSettingState;
    const TYPE_NAME: &'static str = "ome_network_setting";

    fn validate(&self, plan: &NetworkSettingState) -> Result<(), ProviderError> {
        if plan.proxy.is_none() && plan.time.is_none() && plan.session.is_none() {
            return Err(ProviderError::Validation(
                "at least one of proxy, time, session must be specified".to_string(),
            ));
        }
        if let Some(proxy) = &plan.proxy {
            validate_proxy(proxy)?;
        }
        if let Some(time) = &plan.time {
            validate_time(time)?;
        }
        if let Some(sessions) = &plan.session {
            validate_sessions(sessions)?;
        }
        Ok(())
    }

    async fn create(&self, ctx: &Context<'_>, plan: &NetworkSettingState) -> Result<NetworkSettingState, ProviderError> {
        let summary = "Error while creation";
        self.apply(ctx, plan, summary).await?;
        self.observe(ctx, plan, summary).await
    }

    async fn read(&self, ctx: &Context<'_>, state: &NetworkSettingState) -> Result<Option<NetworkSettingState>, ProviderError> {
        self.observe(ctx, state, "Error reading").await.map(Some)
    }

    async fn update(
        &self,
        ctx: &Context<'_>,
        _state: &NetworkSettingState,
        plan: &NetworkSettingState,
    ) -> Result<NetworkSettingState, ProviderError> {
        let summary = "Error while updation";
        self.apply(ctx, plan, summary).await?;
        self.observe(ctx, plan, summary).await
    }

    async fn delete(&self, _ctx: &Context<'_>, _state: &NetworkSettingState) -> Result<(), ProviderError> {
        debug!("Network settings stay on the appliance; removing them from state only");
        Ok(())
    }
}
