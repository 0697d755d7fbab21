use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use log::{debug, info};

use crate::config::Config;
use crate::core::sampler::{CpuSampler, MemorySampler, NetworkSampler};
use crate::core::scheduler::SampleScheduler;
use crate::core::time::Timestamp;
use crate::ctrl::{Controls, Effect};
use crate::procfs::ProcfsCounters;
use crate::triggers::Trigger;
use crate::ui::LoadGraphUI;
use crate::Error;

/// How long to wait for a trigger when no graph is sampling
const IDLE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct LoadGraphApplication {
    receiver: Receiver<Trigger>,
    source: ProcfsCounters,
    controls: Controls,
    ui: LoadGraphUI,
}

impl LoadGraphApplication {
    pub fn new(receiver: Receiver<Trigger>, config: &Config) -> Result<Self, Error> {
        let mut source = ProcfsCounters::new()?;
        let core_count = source.core_count()?;
        info!("Monitoring {} CPU core(s)", core_count);

        let graphs = build_graphs(config, core_count);
        let controls = Controls::new(graphs, config.unit_mode);
        let ui = LoadGraphUI::new()?;

        Ok(Self {
            receiver,
            source,
            controls,
            ui,
        })
    }

    pub fn run(mut self) -> Result<(), Error> {
        self.controls.set_num_bars(self.ui.num_bars()?);
        self.controls.start(&mut self.source, Timestamp::now())?;
        self.draw_ui()?;

        loop {
            let redraw = match self.receiver.recv_timeout(self.timeout()) {
                Ok(Trigger::Exit) => break,
                Ok(Trigger::Resize) => {
                    self.controls.set_num_bars(self.ui.num_bars()?);
                    true
                }
                Ok(Trigger::Input(key)) => {
                    debug!("Received input {:?}", key);
                    self.controls.interpret_input(key, &mut self.source, Timestamp::now())? == Effect::Redraw
                }
                Err(RecvTimeoutError::Timeout) => false,
                Err(e @ RecvTimeoutError::Disconnected) => return Err(Error::MpscError(e)),
            };

            let ticked = self.controls.poll(&mut self.source, Timestamp::now())?;

            if redraw || ticked {
                self.draw_ui()?;
            }
        }

        Ok(())
    }

    /// Time left before the nearest tick
    fn timeout(&self) -> Duration {
        self.controls
            .next_deadline()
            .map(|deadline| deadline.duration_since(&Timestamp::now()))
            .unwrap_or(IDLE_TIMEOUT)
    }

    fn draw_ui(&mut self) -> Result<(), Error> {
        self.ui.render(&mut self.controls).map_err(Error::UiError)
    }
}

/// Builds the CPU, memory and network graphs, in this order
fn build_graphs(config: &Config, core_count: usize) -> Vec<SampleScheduler> {
    let cpu_sampler = CpuSampler::new(core_count, config.stacked_cpu);
    let network_sampler = NetworkSampler::new(config.capacity, config.unit_mode);

    vec![
        SampleScheduler::new(Box::new(cpu_sampler), config.capacity, config.update_interval),
        SampleScheduler::new(Box::new(MemorySampler::default()), config.capacity, config.update_interval),
        SampleScheduler::new(Box::new(network_sampler), config.capacity, config.update_interval),
    ]
}
