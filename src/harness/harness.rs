use crate::endpoint::{Outbox, SimSocket};
use crate::generator::{Application, AppId, GeneratorState, GeneratorTimer, TrafficGenerator};
use crate::harness::config::RunConfig;
use crate::harness::error::HarnessResult;
use crate::harness::link::{LinkStats, PointToPointLink};
use crate::harness::report::RunReport;
use crate::harness::sink::PacketSink;
use crate::metrics::{recorder, MetricsAggregator, TraceEvent, TraceRecorder, TraceSink};
use crate::sim::{EventId, EventQueue, Scheduler, SimTime};

/// Everything that can be dispatched on the run timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    StartApp,
    StopApp,
    Timer(GeneratorTimer),
    /// Last bit of a payload reached the sink's device
    Arrival { bytes: usize },
    /// Trace point fired by a transport model outside this crate
    Trace(TraceEvent),
}

impl From<GeneratorTimer> for SimEvent {
    fn from(timer: GeneratorTimer) -> Self {
        SimEvent::Timer(timer)
    }
}

const SENDER_APP: AppId = AppId(0);

/// Wires one generator, link, sink, and metrics aggregator onto a single
/// event queue and runs them to completion.
pub struct SimulationHarness {
    config: RunConfig,
    queue: EventQueue<SimEvent>,
    generator: TrafficGenerator<SimSocket>,
    outbox: Outbox,
    link: PointToPointLink,
    sink: PacketSink,
    metrics: MetricsAggregator,
    trace_log: Option<TraceRecorder>,
    first_emission: Option<SimTime>,
    last_emission: Option<SimTime>,
}

impl SimulationHarness {
    pub fn new(config: RunConfig) -> HarnessResult<Self> {
        config.validate()?;

        let outbox = Outbox::new();
        let socket = SimSocket::new(config.sender_addr, config.sink_addr, outbox.clone());
        let generator = TrafficGenerator::configure(
            SENDER_APP,
            socket,
            config.sink_addr,
            config.generator.clone(),
        )?;

        let mut queue = EventQueue::new();
        queue.schedule_at(config.app_start, SimEvent::StartApp);
        if let Some(stop) = config.app_stop {
            queue.schedule_at(stop, SimEvent::StopApp);
        }

        Ok(Self {
            link: PointToPointLink::new(config.link.clone()),
            sink: PacketSink::new(config.sink_addr),
            trace_log: config.record_trace.then(TraceRecorder::new),
            config,
            queue,
            generator,
            outbox,
            metrics: MetricsAggregator::new(),
            first_emission: None,
            last_emission: None,
        })
    }

    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn generator(&self) -> &TrafficGenerator<SimSocket> {
        &self.generator
    }

    pub fn metrics(&self) -> &MetricsAggregator {
        &self.metrics
    }

    pub fn sink(&self) -> &PacketSink {
        &self.sink
    }

    pub fn link_stats(&self) -> &LinkStats {
        self.link.stats()
    }

    pub fn pending_events(&self) -> usize {
        self.queue.pending_count()
    }

    /// Fire a trace point at an absolute time, as an external transport model would.
    pub fn inject_trace(&mut self, at: SimTime, event: TraceEvent) -> EventId {
        self.queue.schedule_at(at, SimEvent::Trace(event))
    }

    /// Dispatch the next event. Returns false once the queue is drained or
    /// the next event lies beyond the run ceiling.
    pub fn step(&mut self) -> HarnessResult<bool> {
        let Some(at) = self.queue.peek_time() else {
            return Ok(false);
        };

        if let Some(ceiling) = self.config.max_sim_time {
            if at > ceiling {
                tracing::debug!("Next event at {} is past the run ceiling {}", at, ceiling);
                return Ok(false);
            }
        }

        let Some((_, event)) = self.queue.pop_next() else {
            return Ok(false);
        };
        self.dispatch(event)?;
        self.flush_outbox();
        Ok(true)
    }

    /// Run until no dispatchable events remain and summarise.
    pub fn run(mut self) -> HarnessResult<RunReport> {
        tracing::info!(
            "Starting run: {} over {} link, {} delay, error rate {}",
            self.config.variant,
            self.config.link.data_rate,
            self.config.link.delay_label(),
            self.config.link.error_model.rate
        );

        while self.step()? {}
        Ok(self.finish())
    }

    fn finish(mut self) -> RunReport {
        if self.generator.state() != GeneratorState::Stopped {
            self.generator.stop(&mut self.queue);
        }

        let summary = self
            .metrics
            .compute_summary(self.config.app_start, self.sink.total_rx());
        recorder::record_run_summary(self.config.variant.label(), &summary);

        tracing::info!(
            "Run finished at {}: {} packets sent, {} bytes received, {} drops",
            self.queue.now(),
            self.generator.packets_sent(),
            self.sink.total_rx(),
            summary.drop_count
        );

        RunReport::new(
            &self.config,
            summary,
            self.generator.packets_sent(),
            self.sink.total_rx(),
            self.first_emission,
            self.last_emission,
            self.trace_log.map(TraceRecorder::into_entries).unwrap_or_default(),
        )
    }

    fn dispatch(&mut self, event: SimEvent) -> HarnessResult<()> {
        match event {
            SimEvent::StartApp => self.generator.start(&mut self.queue)?,
            SimEvent::StopApp => self.generator.stop(&mut self.queue),
            SimEvent::Timer(timer) => {
                debug_assert_eq!(timer.app, self.generator.id());
                self.generator.on_timer(&mut self.queue);
            }
            SimEvent::Arrival { bytes } => {
                let trace = if self.link.corrupts(bytes) {
                    TraceEvent::RxDrop
                } else {
                    self.sink.receive(bytes);
                    TraceEvent::RxEnd
                };
                self.fire_trace(trace);
            }
            SimEvent::Trace(trace) => self.fire_trace(trace),
        }
        Ok(())
    }

    /// Hand newly sent payloads to the link.
    fn flush_outbox(&mut self) {
        for payload in self.outbox.drain() {
            let now = self.queue.now();
            self.first_emission.get_or_insert(now);
            self.last_emission = Some(now);

            let arrival = self.link.transmit(now, payload.len());
            self.queue.schedule_at(
                arrival,
                SimEvent::Arrival {
                    bytes: payload.len(),
                },
            );
        }
    }

    fn fire_trace(&mut self, event: TraceEvent) {
        let now = self.queue.now();
        tracing::debug!("Trace {:?} at {}", event, now);
        self.metrics.on_trace(now, &event);
        if let Some(log) = self.trace_log.as_mut() {
            log.on_trace(now, &event);
        }
    }
}
