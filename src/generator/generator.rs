use crate::endpoint::ConnectionEndpoint;
use crate::generator::error::{ConfigurationError, GeneratorError, GeneratorResult};
use crate::generator::types::{AppId, GeneratorConfig, GeneratorState, GeneratorTimer};
use crate::metrics::recorder;
use crate::sim::{EventId, Scheduler};
use bytes::Bytes;
use std::net::SocketAddr;
use std::time::Duration;

/// Lifecycle capability the harness drives for every simulated application.
pub trait Application<E> {
    fn start(&mut self, scheduler: &mut dyn Scheduler<E>) -> GeneratorResult<()>;

    /// Must be idempotent.
    fn stop(&mut self, scheduler: &mut dyn Scheduler<E>);

    /// Called when a timer this application scheduled fires.
    fn on_timer(&mut self, scheduler: &mut dyn Scheduler<E>);
}

/// Self-clocked constant-rate traffic source.
///
/// Emits `packet_budget` payloads of `packet_size` bytes, one every
/// `packet_size * 8 / data_rate` seconds of simulated time. At most one
/// timer is outstanding, and only while running.
pub struct TrafficGenerator<C> {
    id: AppId,
    connection: C,
    peer: SocketAddr,
    config: GeneratorConfig,
    inter_packet_delay: Duration,
    send_event: Option<EventId>,
    state: GeneratorState,
    packets_sent: u32,
}

impl<C: ConnectionEndpoint> TrafficGenerator<C> {
    pub fn configure(
        id: AppId,
        connection: C,
        peer: SocketAddr,
        config: GeneratorConfig,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let inter_packet_delay = config
            .inter_packet_delay()
            .ok_or(ConfigurationError::ZeroDataRate)?;

        Ok(Self {
            id,
            connection,
            peer,
            config,
            inter_packet_delay,
            send_event: None,
            state: GeneratorState::Idle,
            packets_sent: 0,
        })
    }

    pub fn id(&self) -> AppId {
        self.id
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn packets_sent(&self) -> u32 {
        self.packets_sent
    }

    pub fn outstanding_event(&self) -> Option<EventId> {
        self.send_event
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn inter_packet_delay(&self) -> Duration {
        self.inter_packet_delay
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// True once every packet in the budget has been handed to the connection.
    pub fn budget_exhausted(&self) -> bool {
        self.packets_sent >= self.config.packet_budget
    }

    fn emit_packet<E: From<GeneratorTimer>>(&mut self, scheduler: &mut dyn Scheduler<E>) {
        let payload = Bytes::from(vec![0u8; self.config.packet_size as usize]);
        self.connection.send(payload);
        self.packets_sent += 1;
        recorder::record_packet_sent(self.id, self.config.packet_size as u64);

        tracing::trace!(
            "App {} emitted packet {}/{} at {}",
            self.id.0,
            self.packets_sent,
            self.config.packet_budget,
            scheduler.now()
        );

        if self.packets_sent < self.config.packet_budget {
            let id = scheduler.schedule(
                self.inter_packet_delay,
                E::from(GeneratorTimer { app: self.id }),
            );
            self.send_event = Some(id);
        } else {
            self.send_event = None;
            tracing::info!(
                "App {} exhausted packet budget of {} at {}",
                self.id.0,
                self.config.packet_budget,
                scheduler.now()
            );
        }
    }
}

impl<C, E> Application<E> for TrafficGenerator<C>
where
    C: ConnectionEndpoint,
    E: From<GeneratorTimer>,
{
    fn start(&mut self, scheduler: &mut dyn Scheduler<E>) -> GeneratorResult<()> {
        if self.state != GeneratorState::Idle {
            return Err(GeneratorError::InvalidState(self.state));
        }

        let peer = self.peer;
        if let Err(e) = self
            .connection
            .bind()
            .and_then(|()| self.connection.connect(peer))
        {
            tracing::warn!("App {} failed to open connection to {}: {}", self.id.0, peer, e);
            // Start failures are fatal for the run; release a half-opened socket
            if self.connection.is_open() {
                self.connection.close();
            }
            return Err(e.into());
        }

        self.packets_sent = 0;
        self.state = GeneratorState::Running;
        tracing::info!(
            "App {} started at {}: {} x {} bytes at {} to {}",
            self.id.0,
            scheduler.now(),
            self.config.packet_budget,
            self.config.packet_size,
            self.config.data_rate,
            self.peer
        );

        self.emit_packet(scheduler);
        Ok(())
    }

    fn stop(&mut self, scheduler: &mut dyn Scheduler<E>) {
        if self.state == GeneratorState::Running {
            tracing::info!(
                "App {} stopped at {} after {} packets",
                self.id.0,
                scheduler.now(),
                self.packets_sent
            );
        }
        self.state = GeneratorState::Stopped;

        if let Some(id) = self.send_event.take() {
            scheduler.cancel(id);
        }

        if self.connection.is_open() {
            self.connection.close();
        }
    }

    fn on_timer(&mut self, scheduler: &mut dyn Scheduler<E>) {
        self.send_event = None;
        match self.state {
            GeneratorState::Running => self.emit_packet(scheduler),
            state => {
                tracing::warn!(
                    "App {} timer fired in state {:?} at {}",
                    self.id.0,
                    state,
                    scheduler.now()
                );
            }
        }
    }
}
